/// Debounced sync scheduling
///
/// A single actor task owns the one and only debounce deadline. Every request
/// pushes the deadline out to `now + window`; when the deadline passes without
/// another request the sync action runs once. A burst of requests therefore
/// costs exactly one sync, and there is never more than one sync pending.
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

/// Work performed when the debounce window elapses.
pub type SyncAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug)]
enum SyncSignal {
    /// (Re)arm the timer
    Request,
    /// Stop scheduling; a pending deadline is dropped
    Shutdown,
}

/// Handle to the debounce actor.
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    signals: mpsc::UnboundedSender<SyncSignal>,
    window: Duration,
}

impl SyncScheduler {
    /// Spawns the debounce actor on `runtime`.
    pub fn spawn(runtime: &Handle, window: Duration, action: SyncAction) -> Self {
        let (signals, receiver) = mpsc::unbounded_channel();
        runtime.spawn(run_scheduler(receiver, window, action));
        Self { signals, window }
    }

    /// Asks for a sync after the debounce window, replacing any pending
    /// deadline.
    pub fn request(&self) {
        if self.signals.send(SyncSignal::Request).is_err() {
            trace!("sync requested after scheduler shutdown");
        }
    }

    /// Stops scheduling new syncs. A sync already running completes.
    pub fn shutdown(&self) {
        let _ = self.signals.send(SyncSignal::Shutdown);
    }

    /// Whether the actor is still accepting requests.
    pub fn is_running(&self) -> bool {
        !self.signals.is_closed()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

async fn run_scheduler(
    mut receiver: mpsc::UnboundedReceiver<SyncSignal>,
    window: Duration,
    action: SyncAction,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            signal = receiver.recv() => match signal {
                Some(SyncSignal::Request) => {
                    deadline = Some(Instant::now() + window);
                }
                Some(SyncSignal::Shutdown) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                action().await;
            }
        }
    }

    receiver.close();
    debug!("sync scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_action(counter: Arc<AtomicUsize>) -> SyncAction {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_sync() {
        let syncs = Arc::new(AtomicUsize::new(0));
        let scheduler = SyncScheduler::spawn(
            &Handle::current(),
            Duration::from_secs(1),
            counting_action(syncs.clone()),
        );

        for _ in 0..5 {
            scheduler.request();
            sleep(Duration::from_millis(200)).await;
        }
        // last request at t=800ms, deadline t=1800ms
        sleep(Duration::from_millis(700)).await;
        assert_eq!(syncs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(syncs.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(syncs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_sync_separately() {
        let syncs = Arc::new(AtomicUsize::new(0));
        let scheduler = SyncScheduler::spawn(
            &Handle::current(),
            Duration::from_secs(1),
            counting_action(syncs.clone()),
        );

        scheduler.request();
        sleep(Duration::from_millis(1500)).await;
        scheduler.request();
        scheduler.request();
        sleep(Duration::from_millis(1500)).await;

        assert_eq!(syncs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_pending_sync() {
        let syncs = Arc::new(AtomicUsize::new(0));
        let scheduler = SyncScheduler::spawn(
            &Handle::current(),
            Duration::from_secs(1),
            counting_action(syncs.clone()),
        );
        assert!(scheduler.is_running());
        assert_eq!(scheduler.window(), Duration::from_secs(1));

        scheduler.request();
        sleep(Duration::from_millis(100)).await;
        scheduler.shutdown();
        sleep(Duration::from_secs(3)).await;

        assert_eq!(syncs.load(Ordering::SeqCst), 0);
        assert!(!scheduler.is_running());

        // requests after shutdown are ignored
        scheduler.request();
        sleep(Duration::from_secs(3)).await;
        assert_eq!(syncs.load(Ordering::SeqCst), 0);
    }
}
