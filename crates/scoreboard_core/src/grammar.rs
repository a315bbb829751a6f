//! Console grammar: every command the engine issues and every reply or log
//! pattern it scrapes.
//!
//! Nothing outside this module formats a scoreboard command or matches server
//! output, so adapting to a server with different console wording only
//! touches this file.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Prefix shared by every generated trigger objective.
pub const TRIGGER_PREFIX: &str = "tri_";

lazy_static! {
    /// `There are 2 tracked entity/entities: Alice, Bob`
    static ref TRACKED_PLAYERS: Regex =
        Regex::new(r"There are \d+ tracked .*?:\s?(.*)").expect("tracked players pattern");

    /// `Alice has 12 [kills]`
    static ref PLAYER_SCORE: Regex =
        Regex::new(r"^.*? has (-?\d+)").expect("player score pattern");

    /// `[12:00:00] [Server thread/INFO]: [Alice: Triggered [tri_x] (added 3 to value)]`
    ///
    /// The log prefix is one or two leading bracket groups and a colon, and may
    /// be followed by one bracketed tag. Bracket groups cannot contain `]`, so
    /// the prefix never reaches into a chat message body.
    static ref TRIGGER_FIRED: Regex = Regex::new(
        r"^(?:(?:\[[^\]]*\] ?){1,2}: ?)?(?:\[[^\]]+\] ?)?\[(\w+): ?Triggered ?\[([^\]]*)\] ?(?:\(set value to (-?\d+)\)|\(added (-?\d+) to value\))?\]"
    )
    .expect("trigger fired pattern");
}

/// Operation for `scoreboard players <op> <player> <objective> <n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOp {
    /// Overwrite the score
    Set,
    /// Increase the score
    Add,
    /// Decrease the score
    Remove,
}

impl ScoreOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreOp::Set => "set",
            ScoreOp::Add => "add",
            ScoreOp::Remove => "remove",
        }
    }
}

impl fmt::Display for ScoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trigger activation scraped from a console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerFire {
    /// Player who activated the trigger
    pub player: String,
    /// Trigger objective name
    pub trigger: String,
    /// Value set or added; 0 when the line carried none
    pub value: i32,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn add_objective(name: &str, criterion: &str, display_name: &str) -> String {
    format!("scoreboard objectives add {name} {criterion} {display_name}")
}

pub fn remove_objective(name: &str) -> String {
    format!("scoreboard objectives remove {name}")
}

pub fn set_display(slot: &str, name: &str) -> String {
    format!("scoreboard objectives setdisplay {slot} {name}")
}

pub fn list_objectives() -> &'static str {
    "scoreboard objectives list"
}

pub fn score_op(op: ScoreOp, player: &str, name: &str, count: i64) -> String {
    format!("scoreboard players {op} {player} {name} {count}")
}

pub fn get_score(player: &str, name: &str) -> String {
    format!("scoreboard players get {player} {name}")
}

pub fn list_tracked_players() -> &'static str {
    "scoreboard players list"
}

pub fn add_trigger(name: &str) -> String {
    format!("scoreboard objectives add {name} trigger")
}

/// Re-arms a trigger for every online player.
pub fn enable_trigger(name: &str) -> String {
    format!("scoreboard players enable @a {name}")
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Players listed in a `scoreboard players list` reply.
///
/// `None` when the reply does not have the expected shape (including the
/// "no tracked entities" wording).
pub fn parse_tracked_players(reply: &str) -> Option<Vec<String>> {
    let captures = TRACKED_PLAYERS.captures(reply)?;
    let players = captures
        .get(1)?
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|player| !player.is_empty())
        .map(str::to_string)
        .collect();
    Some(players)
}

/// Score value in a `scoreboard players get` reply.
pub fn parse_score(reply: &str) -> Option<i64> {
    PLAYER_SCORE
        .captures(reply)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

/// Objective names in a `scoreboard objectives list` reply.
pub fn parse_objective_list(reply: &str) -> Option<Vec<String>> {
    let (_, list) = reply.split_once(':')?;
    let names = list
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '[' || c == ']'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    Some(names)
}

/// Trigger activation carried by a console log line, if any.
pub fn parse_trigger_fire(line: &str) -> Option<TriggerFire> {
    let captures = TRIGGER_FIRED.captures(line)?;
    let player = captures.get(1)?.as_str().trim().to_string();
    let trigger = captures.get(2)?.as_str().trim().to_string();
    let value = match captures.get(3).or_else(|| captures.get(4)) {
        Some(raw) => saturating_value(raw.as_str()),
        None => 0,
    };

    Some(TriggerFire {
        player,
        trigger,
        value,
    })
}

/// Trigger values outside `i32` are clamped to the nearest bound.
fn saturating_value(raw: &str) -> i32 {
    let wide = raw.parse::<i64>().unwrap_or(if raw.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });
    let value = wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    if value != wide {
        debug!("trigger value {} out of range, clamped to {}", raw, value);
    }
    value as i32
}

/// Whether an objective name belongs to the generated-trigger family.
pub fn is_trigger_objective(name: &str) -> bool {
    name.starts_with(TRIGGER_PREFIX)
}
