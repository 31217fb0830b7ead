// Maps inbound net events onto store mutations. Stateless: whatever context
// a decision needs lives in the store already.

use tracing::{debug, info};

use crate::domain::{EliminationNotice, GameResult, ItemSeed, ToastKind};
use crate::interface_adapters::net::client::{LinkState, NetEvent};
use crate::interface_adapters::protocol::ServerMessage;
use crate::interface_adapters::reconcile;
use crate::use_cases::store::{GameStore, SyncSnapshot};

pub fn apply_net_event(store: &mut GameStore, event: NetEvent) {
    match event {
        NetEvent::Link(state) => apply_link(store, state),
        NetEvent::Server(message) => apply_server(store, message),
    }
}

fn apply_link(store: &mut GameStore, state: LinkState) {
    match state {
        LinkState::Connected => {
            // A first connect is silent; the sync toastless flow handles it.
            // Being synced already means this is a recovery.
            if store.is_synced() {
                store.show_toast(ToastKind::Success, "Reconnected");
            }
        }
        LinkState::Reconnecting { attempt } => {
            store.set_synced(false);
            store.show_toast(
                ToastKind::Warning,
                format!("Connection lost, reconnecting ({attempt})"),
            );
        }
        LinkState::Failed => {
            store.set_synced(false);
            store.show_toast(ToastKind::Error, "Connection failed");
        }
        LinkState::Connecting | LinkState::Disconnected => {}
    }
}

fn apply_server(store: &mut GameStore, message: ServerMessage) {
    match message {
        ServerMessage::SyncState(dto) => {
            debug!(items = dto.items.as_ref().map(|i| i.len()), "sync received");
            let items = dto.items.map(|wire| {
                let remote = wire.into_iter().map(reconcile::normalize).collect();
                reconcile::merge(store.items(), remote)
            });
            store.sync_state(SyncSnapshot {
                phase: dto.phase.as_deref().map(reconcile::map_phase),
                room_id: dto.room_id,
                ai_count: dto.ai_count,
                turbidity: dto.turbidity,
                theme: dto.theme.map(reconcile::convert_theme),
                items,
            });
            store.set_synced(true);
        }
        ServerMessage::ItemAdd(wire) => {
            let item = reconcile::normalize(wire);
            store.add_item(ItemSeed::from(item));
        }
        ServerMessage::ItemRemove(payload) => {
            store.remove_item(&payload.item_id);
        }
        ServerMessage::VoteUpdate(dto) => {
            store.update_votes(&dto.fish_id, dto.count, dto.voters);
        }
        ServerMessage::VoteReceived(payload) => {
            if store.player_fish_id() == Some(payload.fish_id.as_str()) {
                store.being_attacked();
                store.show_toast(ToastKind::Warning, "Your fish is under attack!");
            }
        }
        ServerMessage::FishEliminate(dto) => {
            info!(fish_id = %dto.fish_id, is_ai = dto.is_ai, "elimination");
            let kind = if dto.is_ai {
                ToastKind::Success
            } else {
                ToastKind::Error
            };
            let content = if dto.is_ai {
                format!("{} was an impostor!", dto.fish_name)
            } else {
                format!("{} was a real drawing...", dto.fish_name)
            };
            store.trigger_elimination(EliminationNotice {
                fish_id: dto.fish_id,
                fish_name: dto.fish_name,
                is_ai: dto.is_ai,
                owner_id: dto.fish_owner_id,
                killer_names: dto.killer_names,
            });
            store.show_toast(kind, content);
        }
        ServerMessage::GameVictory(dto) => {
            store.set_game_result(GameResult {
                is_victory: true,
                ai_remaining: dto.ai_remaining,
                human_remaining: dto.human_remaining,
                mvp_player_name: dto.mvp_name,
                humans_killed: None,
                reason: None,
            });
        }
        ServerMessage::GameDefeat(dto) => {
            store.set_game_result(GameResult {
                is_victory: false,
                ai_remaining: dto.ai_remaining,
                human_remaining: dto.human_remaining,
                mvp_player_name: None,
                humans_killed: dto.human_killed,
                reason: dto
                    .reason
                    .as_deref()
                    .and_then(crate::domain::GameEndReason::from_wire),
            });
        }
        ServerMessage::CommentAdd(payload) => {
            store.add_comment(&payload.item_id, payload.comment.into());
        }
    }
}
