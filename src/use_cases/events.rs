// Typed event bus payloads emitted by the store.

use crate::domain::{
    BulletState, EliminationNotice, FloatingDamage, GameItem, GamePhase, GameResult, Toast,
};

/// Everything the store announces to its subscribers.
///
/// One closed enum instead of string-keyed topics: emitter and listener agree
/// on the payload shape by construction. Every store mutator that changes
/// externally observable state emits exactly one of these, strictly after the
/// mutation is committed.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    PhaseChanged {
        old: GamePhase,
        new: GamePhase,
    },
    /// First authoritative snapshot has been applied.
    Synced,
    GameResult(GameResult),

    ItemAdded(GameItem),
    ItemRemoved {
        id: String,
    },
    ItemUpdated {
        id: String,
        item: GameItem,
    },

    VotesUpdated {
        fish_id: String,
        count: u32,
        voters: Vec<String>,
    },
    BulletChanged(BulletState),
    EliminationTriggered(EliminationNotice),
    /// Someone voted against the player's own fish.
    BeingAttacked {
        duration_ms: u64,
    },

    ToastShown(Toast),
    ToastRemoved {
        id: String,
    },
    FloatingDamageAdded(FloatingDamage),
}
