// Offline session orchestrator. The session exclusively owns the store and
// applies every mutation synchronously; the caller drives time via `tick`.

use std::collections::HashSet;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::domain::{BattleAction, GameItem, GameOutcome, GameResult, ItemSeed};
use crate::use_cases::battle::{BattleEngine, check_game_end};
use crate::use_cases::events::StoreEvent;
use crate::use_cases::spawner::ImpostorSpawner;
use crate::use_cases::store::GameStore;

pub struct LocalSession {
    store: GameStore,
    engine: BattleEngine,
    events: broadcast::Receiver<StoreEvent>,
    spawner: ImpostorSpawner,
    owned: HashSet<String>,
    humans_killed: u32,
    ai_killed: u32,
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSession {
    pub fn new() -> Self {
        let mut store = GameStore::new();
        store.set_player_id("local-player");
        let events = store.subscribe();
        Self {
            store,
            engine: BattleEngine::local(),
            events,
            spawner: ImpostorSpawner::new(),
            owned: HashSet::new(),
            humans_killed: 0,
            ai_killed: 0,
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GameStore {
        &mut self.store
    }

    pub fn humans_killed(&self) -> u32 {
        self.humans_killed
    }

    pub fn ai_killed(&self) -> u32 {
        self.ai_killed
    }

    /// Adds a player-drawn fish. The first own submission becomes the
    /// protected fish the player cannot target. Submissions feed the spawner:
    /// every few drawings an impostor slips in alongside them.
    pub fn submit_drawing(&mut self, seed: ItemSeed) -> Option<String> {
        let id = self.store.add_item(ItemSeed {
            is_ai: false,
            ..seed
        })?;
        if self.store.player_fish_id().is_none() {
            self.store.set_player_fish_id(id.clone());
        }
        self.owned.insert(id.clone());
        self.react();
        if let Some(impostor) = self.spawner.on_human_submission() {
            self.spawn_impostor(impostor);
        }
        Some(id)
    }

    /// Injects an AI impostor into the tank. An overflowing AI population
    /// ends the round without any elimination, so the check runs here too.
    pub fn spawn_impostor(&mut self, seed: ItemSeed) -> Option<String> {
        let id = self.store.add_item(ItemSeed {
            is_ai: true,
            ..seed
        });
        self.react();
        self.evaluate_end();
        id
    }

    pub fn attack(&mut self, fish_id: &str) -> Option<BattleAction> {
        let action = self.engine.execute_action(&mut self.store, fish_id);
        self.react();
        action
    }

    /// Housekeeping step; also processes any elimination fallout.
    pub fn tick(&mut self, now: Instant) {
        self.store.tick(now);
        self.react();
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.engine = BattleEngine::local();
        self.spawner = ImpostorSpawner::new();
        self.owned.clear();
        self.humans_killed = 0;
        self.ai_killed = 0;
        self.store.set_player_id("local-player");
    }

    /// Consumes pending store events and applies session-level reactions.
    pub fn react(&mut self) {
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "session lagged behind the event bus");
                    continue;
                }
                Err(_) => break,
            };
            if let StoreEvent::EliminationTriggered(notice) = event {
                self.on_elimination(&notice.fish_id, notice.is_ai);
            }
        }
    }

    fn on_elimination(&mut self, fish_id: &str, is_ai: bool) {
        self.store.remove_item(fish_id);
        self.engine.forget(fish_id);
        self.owned.remove(fish_id);
        if is_ai {
            self.ai_killed += 1;
        } else {
            self.humans_killed += 1;
        }
        debug!(fish_id, is_ai, humans_killed = self.humans_killed, "eliminated");
        self.evaluate_end();
    }

    fn evaluate_end(&mut self) {
        if self.store.game_result().is_some() {
            return;
        }
        if let Some(outcome) = check_game_end(&self.store, self.humans_killed) {
            let result = build_result(&self.store, outcome, self.humans_killed);
            info!(victory = result.is_victory, "session over");
            self.store.set_game_result(result);
        }
    }
}

/// Fills a `GameResult` from an evaluated outcome and the live populations.
/// Shared by both session modes so their terminal payloads match.
pub fn build_result(store: &GameStore, outcome: GameOutcome, humans_killed: u32) -> GameResult {
    let (ai_remaining, human_remaining) = populations(&store.items());
    match outcome {
        GameOutcome::Victory => GameResult {
            is_victory: true,
            ai_remaining,
            human_remaining,
            mvp_player_name: None,
            humans_killed: Some(humans_killed),
            reason: None,
        },
        GameOutcome::Defeat(reason) => GameResult {
            is_victory: false,
            ai_remaining,
            human_remaining,
            mvp_player_name: None,
            humans_killed: Some(humans_killed),
            reason: Some(reason),
        },
    }
}

fn populations(items: &[GameItem]) -> (u32, u32) {
    let ai = items.iter().filter(|i| i.is_ai).count() as u32;
    (ai, items.len() as u32 - ai)
}
