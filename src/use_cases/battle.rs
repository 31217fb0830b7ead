// Attack flow: classifies a fish click into vote / chase / switch and routes
// the resulting tally change through a mode-specific sink chosen at
// construction. In local mode the sink owns the tally; in networked mode it
// only emits commands and the server echo is authoritative.

use std::collections::HashMap;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::{BattleAction, GameOutcome, ToastKind, rules};
use crate::use_cases::store::GameStore;

/// Outbound vote intent for networked play. The net adapter turns these into
/// wire messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteCommand {
    Cast { fish_id: String, voter_id: String },
    Retract { fish_id: String, voter_id: String },
    Chase { fish_id: String, voter_id: String },
}

/// Where confirmed actions land. Exactly one implementation is wired in per
/// session; switching modes means building a new session.
pub trait ActionSink: Send {
    fn cast(&mut self, store: &mut GameStore, fish_id: &str, voter_id: &str);
    fn chase(&mut self, store: &mut GameStore, fish_id: &str, voter_id: &str);
    fn retract(&mut self, store: &mut GameStore, fish_id: &str, voter_id: &str);
    /// Drops any tally held for a fish that just got eliminated.
    fn forget(&mut self, fish_id: &str);
}

/// Offline tally. Votes accumulate in a ledger keyed by fish id and are
/// written through `update_votes`, so threshold checks run in the store
/// exactly as they would for a server echo.
#[derive(Default)]
pub struct LocalActionSink {
    ledger: HashMap<String, u32>,
}

impl LocalActionSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self, fish_id: &str) -> u32 {
        let count = self.ledger.entry(fish_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

impl ActionSink for LocalActionSink {
    fn cast(&mut self, store: &mut GameStore, fish_id: &str, voter_id: &str) {
        let count = self.bump(fish_id);
        store.update_votes(fish_id, count, vec![voter_id.to_string()]);
    }

    fn chase(&mut self, store: &mut GameStore, fish_id: &str, voter_id: &str) {
        let count = self.bump(fish_id);
        store.update_votes(fish_id, count, vec![voter_id.to_string()]);
    }

    fn retract(&mut self, store: &mut GameStore, fish_id: &str, _voter_id: &str) {
        // A fish nobody voted for has nothing to retract; stay silent.
        let Some(entry) = self.ledger.get_mut(fish_id) else {
            return;
        };
        if *entry == 0 {
            return;
        }
        *entry -= 1;
        let count = *entry;
        // Retractions report an empty voter list; count alone is decremented.
        store.update_votes(fish_id, count, Vec::new());
    }

    fn forget(&mut self, fish_id: &str) {
        self.ledger.remove(fish_id);
    }
}

/// Networked sink: forwards intents to the transport, never touches local
/// counts. `vote:update` echoes drive the store instead.
pub struct NetworkActionSink {
    commands: mpsc::UnboundedSender<VoteCommand>,
}

impl NetworkActionSink {
    pub fn new(commands: mpsc::UnboundedSender<VoteCommand>) -> Self {
        Self { commands }
    }

    fn send(&self, command: VoteCommand) {
        if self.commands.send(command).is_err() {
            warn!("vote command dropped: transport closed");
        }
    }
}

impl ActionSink for NetworkActionSink {
    fn cast(&mut self, _store: &mut GameStore, fish_id: &str, voter_id: &str) {
        self.send(VoteCommand::Cast {
            fish_id: fish_id.to_string(),
            voter_id: voter_id.to_string(),
        });
    }

    fn chase(&mut self, _store: &mut GameStore, fish_id: &str, voter_id: &str) {
        self.send(VoteCommand::Chase {
            fish_id: fish_id.to_string(),
            voter_id: voter_id.to_string(),
        });
    }

    fn retract(&mut self, _store: &mut GameStore, fish_id: &str, voter_id: &str) {
        self.send(VoteCommand::Retract {
            fish_id: fish_id.to_string(),
            voter_id: voter_id.to_string(),
        });
    }

    fn forget(&mut self, _fish_id: &str) {}
}

pub struct BattleEngine {
    sink: Box<dyn ActionSink>,
}

impl BattleEngine {
    pub fn new(sink: Box<dyn ActionSink>) -> Self {
        Self { sink }
    }

    pub fn local() -> Self {
        Self::new(Box::new(LocalActionSink::new()))
    }

    pub fn networked(commands: mpsc::UnboundedSender<VoteCommand>) -> Self {
        Self::new(Box::new(NetworkActionSink::new(commands)))
    }

    /// Handles a click on `target_id`. Returns the classified action on
    /// success, `None` on rejection (self-target, unknown fish, or a pending
    /// cooldown for the paths that need a loaded bullet).
    pub fn execute_action(
        &mut self,
        store: &mut GameStore,
        target_id: &str,
    ) -> Option<BattleAction> {
        if store.player_fish_id() == Some(target_id) {
            store.show_toast(ToastKind::Warning, "You can't target your own fish");
            return None;
        }
        let Some(target) = store.item(target_id) else {
            debug!(fish_id = target_id, "action on unknown fish ignored");
            return None;
        };
        let voter_id = store.player_id().unwrap_or("local-player").to_string();

        let action = match store.bullet().current_target {
            Some(current) if current == target_id => {
                // Re-attack on the held target needs a loaded bullet and
                // consumes it.
                if !store.bullet().status.is_ready() {
                    self.reject_cooling(store);
                    return None;
                }
                store.chase_fire();
                self.sink.chase(store, target_id, &voter_id);
                BattleAction::Chase
            }
            Some(previous) => {
                // Redirecting a placed vote is free: the bullet already
                // spent, we only move where it points.
                store.change_target(target_id);
                self.sink.retract(store, &previous, &voter_id);
                self.sink.cast(store, target_id, &voter_id);
                BattleAction::Switch { previous }
            }
            None => {
                if !store.fire_bullet(target_id) {
                    self.reject_cooling(store);
                    return None;
                }
                self.sink.cast(store, target_id, &voter_id);
                BattleAction::Vote
            }
        };

        store.add_floating_damage(target_id, target.position.x, target.position.y, 1);
        let content = match &action {
            BattleAction::Vote => format!("Voted for {}", target.name),
            BattleAction::Chase => format!("Chasing {}", target.name),
            BattleAction::Switch { .. } => format!("Switched vote to {}", target.name),
        };
        store.show_toast(ToastKind::Vote, content);

        debug!(fish_id = target_id, ?action, "battle action");
        Some(action)
    }

    fn reject_cooling(&self, store: &mut GameStore) {
        let remaining = store.cooldown_remaining(Instant::now());
        store.show_toast(
            ToastKind::Warning,
            format!("Reloading, {:.1}s left", remaining.as_secs_f32()),
        );
    }

    /// The session calls this when a fish is eliminated so the sink drops its
    /// share of the tally.
    pub fn forget(&mut self, fish_id: &str) {
        self.sink.forget(fish_id);
    }
}

/// Terminal-state check over the live item list. The humans-killed counter
/// lives in the session, not the store.
pub fn check_game_end(store: &GameStore, humans_killed: u32) -> Option<GameOutcome> {
    let items = store.items();
    let ai = items.iter().filter(|i| i.is_ai).count() as u32;
    let humans = items.len() as u32 - ai;
    rules::evaluate(ai, humans, humans_killed)
}
