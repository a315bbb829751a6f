//! Plugin identity and namespace derivation.
//!
//! Every objective and trigger a plugin owns is prefixed with a short token
//! derived from the plugin's stable name. The token is a pure function of
//! that name, so objectives created by a previous run of the daemon stay
//! addressable after a restart without any stored mapping.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use xxhash_rust::xxh64::xxh64;

/// Length of a namespace token.
///
/// Scoreboard objective names are length-limited, so the token is kept short
/// and collisions are accepted as negligible for tens of plugins.
pub const NAMESPACE_LEN: usize = 5;

/// Stable identity of a plugin consumer.
///
/// `name` must not change between releases of the plugin: it is the input to
/// [`namespace`]. `display_name` is only used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginIdentity {
    name: String,
    display_name: String,
}

impl PluginIdentity {
    /// Creates an identity whose display name equals its stable name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
        }
    }

    /// Creates an identity with a separate human-readable display name.
    pub fn with_display_name(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }

    /// The stable name namespaces are derived from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name for log output.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Namespace token for this identity.
    pub fn namespace(&self) -> String {
        namespace(&self.name)
    }

    /// Fully qualified objective name for `logical_name` in this namespace.
    pub fn objective_name(&self, logical_name: &str) -> String {
        format!("{}_{}", self.namespace(), logical_name)
    }
}

/// Derives the namespace token for a plugin name.
///
/// XXH64 (seed 0) of the name, big-endian, low four bytes, URL-safe base64
/// without padding, first five characters.
pub fn namespace(name: &str) -> String {
    let hash = xxh64(name.as_bytes(), 0).to_be_bytes();
    let mut token = URL_SAFE_NO_PAD.encode(&hash[4..]);
    token.truncate(NAMESPACE_LEN);
    token
}
