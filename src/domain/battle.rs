// Battle-side domain types: the player's bullet, vote tallies and outcomes.

use std::time::Instant;

/// Whether the bullet can fire right now.
///
/// Encoding the cooldown inside the variant keeps "not loaded iff a cooldown
/// is pending" true by construction instead of by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletStatus {
    Ready,
    Cooling { until: Instant },
}

impl BulletStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The one-per-player bullet slot.
///
/// `current_target` is tracked independently of readiness: switching targets
/// redirects an already-placed vote and never requires a loaded bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletState {
    pub status: BulletStatus,
    pub current_target: Option<String>,
}

impl Default for BulletState {
    fn default() -> Self {
        Self {
            status: BulletStatus::Ready,
            current_target: None,
        }
    }
}

/// Vote tally for one fish.
///
/// In local mode `count == voters.len()` always holds. The server may report
/// an empty `voters` list on retraction while still decrementing `count`, so
/// the relationship is not an invariant once a server is involved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteInfo {
    pub count: u32,
    pub voters: Vec<String>,
}

/// How a click on a fish resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    /// First shot at a fresh target; consumes the bullet.
    Vote,
    /// Re-attack on the current target; consumes the bullet.
    Chase,
    /// Redirect the placed vote to a new target; does not need a bullet.
    Switch { previous: String },
}

/// Transient payload for elimination-animation playback.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminationNotice {
    pub fish_id: String,
    pub fish_name: String,
    pub is_ai: bool,
    pub owner_id: Option<String>,
    pub killer_names: Option<Vec<String>>,
}

/// Why a session ended in defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    AiMajority,
    TooManyHumansKilled,
    Timeout,
}

impl GameEndReason {
    pub fn from_wire(reason: &str) -> Option<Self> {
        match reason {
            "ai_majority" => Some(Self::AiMajority),
            "too_many_human_killed" => Some(Self::TooManyHumansKilled),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }
}

/// Terminal snapshot for a finished session. Created once per session when an
/// end condition fires; cleared only by an explicit reset.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub is_victory: bool,
    pub ai_remaining: u32,
    pub human_remaining: u32,
    pub mvp_player_name: Option<String>,
    pub humans_killed: Option<u32>,
    pub reason: Option<GameEndReason>,
}

/// Ephemeral on-screen notification. The store bounds the queue and expires
/// entries on a timer; no game logic reads these back.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub content: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
    Vote,
    Eliminate,
}

/// Ephemeral "+1" marker shown where a shot landed.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingDamage {
    pub id: String,
    pub fish_id: String,
    pub x: f32,
    pub y: f32,
    pub value: u32,
}
