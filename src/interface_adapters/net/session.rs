// Server-synchronized session: a select loop over net events, player input
// and the housekeeping interval. Vote counts and (normally) the terminal
// result come from the server echo; a local evaluation covers the gap so the
// offline and networked modes reach the same decisions.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{Notify, broadcast, mpsc};
use tracing::warn;

use crate::domain::Comment;
use crate::frameworks::config::TICK_INTERVAL;
use crate::interface_adapters::net::client::{LinkState, NetClient, NetConfig, NetEvent};
use crate::interface_adapters::net::dispatch::apply_net_event;
use crate::interface_adapters::protocol::{ClientMessage, CommentPayload};
use crate::use_cases::battle::{BattleEngine, VoteCommand, check_game_end};
use crate::use_cases::events::StoreEvent;
use crate::use_cases::session::build_result;
use crate::use_cases::store::GameStore;

/// Player intents fed into a running session.
#[derive(Debug)]
pub enum SessionInput {
    Attack { fish_id: String },
    Comment { item_id: String, comment: Comment },
    Shutdown,
}

pub struct NetworkedSession {
    store: GameStore,
    engine: BattleEngine,
    client: NetClient,
    net_events: mpsc::Receiver<NetEvent>,
    commands: mpsc::UnboundedReceiver<VoteCommand>,
    events: broadcast::Receiver<StoreEvent>,
    shutdown: Arc<Notify>,
    humans_killed: u32,
}

impl NetworkedSession {
    /// Opens the link and builds the session around it. The store starts
    /// empty; the first `sync:state` populates it.
    pub fn connect(config: NetConfig, player_id: impl Into<String>) -> Self {
        let mut store = GameStore::new();
        store.set_player_id(player_id);
        store.set_room_id(config.room_id.clone());
        let events = store.subscribe();

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (client, net_events) = NetClient::start(config);

        Self {
            store,
            engine: BattleEngine::networked(command_tx),
            client,
            net_events,
            commands: command_rx,
            events,
            shutdown: Arc::new(Notify::new()),
            humans_killed: 0,
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn humans_killed(&self) -> u32 {
        self.humans_killed
    }

    /// Handle for stopping the loop from another task.
    pub fn stop_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    pub fn link_state(&self) -> LinkState {
        self.client.link_state()
    }

    /// Runs until shutdown, input closure, or a terminal link failure.
    pub async fn run(&mut self, input: &mut mpsc::Receiver<SessionInput>) {
        let mut housekeeping = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    self.client.shutdown().await;
                    return;
                }

                event = self.net_events.recv() => {
                    let Some(event) = event else { return };
                    let failed = matches!(event, NetEvent::Link(LinkState::Failed));
                    apply_net_event(&mut self.store, event);
                    self.react();
                    if failed {
                        return;
                    }
                }

                intent = input.recv() => {
                    match intent {
                        Some(SessionInput::Attack { fish_id }) => {
                            self.engine.execute_action(&mut self.store, &fish_id);
                            self.forward_commands();
                            self.react();
                        }
                        Some(SessionInput::Comment { item_id, comment }) => {
                            // Comments apply on the server echo, not locally.
                            let message = ClientMessage::CommentAdd(CommentPayload {
                                item_id,
                                comment: comment.into(),
                            });
                            if let Err(e) = self.client.send(message) {
                                warn!(error = %e, "comment not sent");
                            }
                        }
                        Some(SessionInput::Shutdown) | None => {
                            self.client.shutdown().await;
                            return;
                        }
                    }
                }

                _ = housekeeping.tick() => {
                    self.store.tick(Instant::now());
                    self.react();
                }
            }
        }
    }

    fn forward_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            if let Err(e) = self.client.send(command.into()) {
                warn!(error = %e, "vote command not sent");
            }
        }
    }

    fn react(&mut self) {
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
                self.store.remove_item(&notice.fish_id);
                self.engine.forget(&notice.fish_id);
                if !notice.is_ai {
                    self.humans_killed += 1;
                }
                if self.store.game_result().is_none() {
                    if let Some(outcome) = check_game_end(&self.store, self.humans_killed) {
                        let result = build_result(&self.store, outcome, self.humans_killed);
                        self.store.set_game_result(result);
                    }
                }
            }
        }
    }
}
