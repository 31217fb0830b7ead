// Single owner of all session state. Every externally observable change is
// announced on the typed event bus, strictly after the mutation commits.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{
    BulletState, BulletStatus, Comment, EliminationNotice, FloatingDamage, GameItem, GamePhase,
    GameResult, ItemPatch, ItemSeed, Toast, ToastKind, VoteInfo, rules,
};
use crate::domain::theme::ThemeConfig;
use crate::frameworks::config::{
    ATTACK_WARNING_DURATION, COOLDOWN_DURATION, ELIMINATION_THRESHOLD, EVENT_CHANNEL_CAPACITY,
    FLOATING_DAMAGE_DURATION, MAX_FLOATING_DAMAGES, MAX_TOASTS, TOAST_DURATION,
};
use crate::use_cases::events::StoreEvent;

/// Authoritative snapshot fields applied on `sync_state`. Absent fields leave
/// the current value untouched.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
    pub phase: Option<GamePhase>,
    pub room_id: Option<String>,
    pub ai_count: Option<u32>,
    pub turbidity: Option<f32>,
    pub theme: Option<ThemeConfig>,
    /// Already merged item list (remote wins on conflict, local survives on
    /// absence); replaces the store's list wholesale.
    pub items: Option<Vec<GameItem>>,
}

struct ToastEntry {
    toast: Toast,
    expires_at: Instant,
}

struct DamageEntry {
    damage: FloatingDamage,
    expires_at: Instant,
}

/// The game-state store. Explicitly constructed and passed to every consumer;
/// nothing else holds a mutable reference to session state.
pub struct GameStore {
    events: broadcast::Sender<StoreEvent>,

    phase: GamePhase,
    room_id: Option<String>,
    theme: Option<ThemeConfig>,
    is_synced: bool,

    items: Vec<GameItem>,
    ai_count: u32,
    turbidity: f32,

    bullet: BulletState,
    votes: HashMap<String, VoteInfo>,
    player_id: Option<String>,
    player_fish_id: Option<String>,
    elimination_threshold: u32,

    game_result: Option<GameResult>,
    elimination: Option<EliminationNotice>,

    toasts: VecDeque<ToastEntry>,
    toast_seq: u64,
    damages: VecDeque<DamageEntry>,
    damage_seq: u64,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            events,
            phase: GamePhase::Lobby,
            room_id: None,
            theme: None,
            is_synced: false,
            items: Vec::new(),
            ai_count: 0,
            turbidity: 0.0,
            bullet: BulletState::default(),
            votes: HashMap::new(),
            player_id: None,
            player_fish_id: None,
            elimination_threshold: ELIMINATION_THRESHOLD,
            game_result: None,
            elimination: None,
            toasts: VecDeque::new(),
            toast_seq: 0,
            damages: VecDeque::new(),
            damage_seq: 0,
        }
    }

    /// Subscribes a new listener to the event bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // Nobody listening is fine; the store does not depend on observers.
        let _ = self.events.send(event);
    }

    // ---- Accessors -------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn theme(&self) -> Option<ThemeConfig> {
        self.theme.clone()
    }

    pub fn is_synced(&self) -> bool {
        self.is_synced
    }

    pub fn items(&self) -> Vec<GameItem> {
        self.items.clone()
    }

    pub fn item(&self, item_id: &str) -> Option<GameItem> {
        self.items.iter().find(|i| i.id == item_id).cloned()
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn ai_count(&self) -> u32 {
        self.ai_count
    }

    pub fn human_count(&self) -> u32 {
        self.items.iter().filter(|i| !i.is_ai).count() as u32
    }

    pub fn turbidity(&self) -> f32 {
        self.turbidity
    }

    pub fn bullet(&self) -> BulletState {
        self.bullet.clone()
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn player_fish_id(&self) -> Option<&str> {
        self.player_fish_id.as_deref()
    }

    pub fn vote_count(&self, fish_id: &str) -> u32 {
        self.votes.get(fish_id).map(|v| v.count).unwrap_or(0)
    }

    pub fn voters(&self, fish_id: &str) -> Vec<String> {
        self.votes
            .get(fish_id)
            .map(|v| v.voters.clone())
            .unwrap_or_default()
    }

    pub fn vote_info(&self, fish_id: &str) -> VoteInfo {
        self.votes.get(fish_id).cloned().unwrap_or_default()
    }

    pub fn game_result(&self) -> Option<GameResult> {
        self.game_result.clone()
    }

    pub fn elimination(&self) -> Option<EliminationNotice> {
        self.elimination.clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.iter().map(|t| t.toast.clone()).collect()
    }

    pub fn floating_damages(&self) -> Vec<FloatingDamage> {
        self.damages.iter().map(|d| d.damage.clone()).collect()
    }

    pub fn elimination_threshold(&self) -> u32 {
        self.elimination_threshold
    }

    // ---- Session identity and phase --------------------------------------

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        let old = self.phase;
        self.phase = phase;
        self.emit(StoreEvent::PhaseChanged { old, new: phase });
    }

    pub fn set_room_id(&mut self, room_id: impl Into<String>) {
        self.room_id = Some(room_id.into());
    }

    pub fn set_theme(&mut self, theme: ThemeConfig) {
        self.theme = Some(theme);
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.is_synced = synced;
        if synced {
            self.emit(StoreEvent::Synced);
        }
    }

    pub fn set_player_id(&mut self, player_id: impl Into<String>) {
        self.player_id = Some(player_id.into());
    }

    pub fn set_player_fish_id(&mut self, fish_id: impl Into<String>) {
        self.player_fish_id = Some(fish_id.into());
    }

    pub fn set_elimination_threshold(&mut self, threshold: u32) {
        self.elimination_threshold = threshold;
    }

    // ---- Items -----------------------------------------------------------

    /// Adds a new item, filling missing fields with randomized defaults.
    /// Inserting an id that already exists is a silent no-op (no event), so
    /// echoed wire adds are idempotent. Returns the assigned id on insert.
    pub fn add_item(&mut self, seed: ItemSeed) -> Option<String> {
        if let Some(id) = seed.id.as_deref() {
            if self.items.iter().any(|i| i.id == id) {
                debug!(item_id = id, "duplicate item ignored");
                return None;
            }
        }

        let item = seed.materialize();
        let id = item.id.clone();
        let is_ai = item.is_ai;
        self.items.push(item.clone());

        if is_ai {
            self.ai_count += 1;
            self.turbidity = rules::turbidity(self.ai_count);
        }

        self.emit(StoreEvent::ItemAdded(item));
        Some(id)
    }

    pub fn remove_item(&mut self, item_id: &str) {
        let Some(index) = self.items.iter().position(|i| i.id == item_id) else {
            return;
        };
        let item = self.items.remove(index);

        if item.is_ai {
            self.ai_count = self.ai_count.saturating_sub(1);
            self.turbidity = rules::turbidity(self.ai_count);
        }

        // A removed fish takes its tally with it.
        self.votes.remove(item_id);

        self.emit(StoreEvent::ItemRemoved {
            id: item_id.to_string(),
        });
    }

    pub fn update_item(&mut self, item_id: &str, patch: ItemPatch) {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return;
        };
        if let Some(position) = patch.position {
            item.position = position;
        }
        if let Some(velocity) = patch.velocity {
            item.velocity = velocity;
        }
        if let Some(rotation) = patch.rotation {
            item.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            item.scale = scale;
        }
        if let Some(flip_x) = patch.flip_x {
            item.flip_x = flip_x;
        }
        if let Some(comments) = patch.comments {
            item.comments = comments;
        }
        let snapshot = item.clone();
        self.emit(StoreEvent::ItemUpdated {
            id: item_id.to_string(),
            item: snapshot,
        });
    }

    pub fn add_comment(&mut self, item_id: &str, comment: Comment) {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return;
        };
        item.comments.push(comment);
        let snapshot = item.clone();
        self.emit(StoreEvent::ItemUpdated {
            id: item_id.to_string(),
            item: snapshot,
        });
    }

    // ---- Bullet ----------------------------------------------------------

    /// Consumes the bullet against `target_id`. Fails (no mutation, no event)
    /// while a cooldown is pending.
    pub fn fire_bullet(&mut self, target_id: &str) -> bool {
        if !self.bullet.status.is_ready() {
            return false;
        }
        self.bullet = BulletState {
            status: BulletStatus::Cooling {
                until: Instant::now() + COOLDOWN_DURATION,
            },
            current_target: Some(target_id.to_string()),
        };
        self.emit(StoreEvent::BulletChanged(self.bullet.clone()));
        true
    }

    pub fn reload_bullet(&mut self) {
        self.bullet.status = BulletStatus::Ready;
        self.emit(StoreEvent::BulletChanged(self.bullet.clone()));
    }

    /// Redirects the placed vote to a new target without touching readiness.
    /// Returns the previous target.
    pub fn change_target(&mut self, new_target_id: &str) -> Option<String> {
        let old = self
            .bullet
            .current_target
            .replace(new_target_id.to_string());
        self.emit(StoreEvent::BulletChanged(self.bullet.clone()));
        old
    }

    /// Re-attack on the current target: restarts the cooldown, leaves the
    /// tally to `update_votes`.
    pub fn chase_fire(&mut self) {
        self.bullet.status = BulletStatus::Cooling {
            until: Instant::now() + COOLDOWN_DURATION,
        };
        self.emit(StoreEvent::BulletChanged(self.bullet.clone()));
    }

    /// Fraction of the cooldown elapsed, 1.0 when ready.
    pub fn cooldown_progress(&self, now: Instant) -> f32 {
        match self.bullet.status {
            BulletStatus::Ready => 1.0,
            BulletStatus::Cooling { until } => {
                let remaining = until.saturating_duration_since(now);
                1.0 - remaining.as_secs_f32() / COOLDOWN_DURATION.as_secs_f32()
            }
        }
    }

    /// Time left until the bullet reloads; zero when ready.
    pub fn cooldown_remaining(&self, now: Instant) -> Duration {
        match self.bullet.status {
            BulletStatus::Ready => Duration::ZERO,
            BulletStatus::Cooling { until } => until.saturating_duration_since(now),
        }
    }

    // ---- Votes and eliminations ------------------------------------------

    /// Overwrites the tally for `fish_id` wholesale and announces it. This is
    /// the single authoritative point where a tally becomes an elimination:
    /// reaching the threshold synthesizes the elimination event here and
    /// nowhere else.
    pub fn update_votes(&mut self, fish_id: &str, count: u32, voters: Vec<String>) {
        self.votes.insert(
            fish_id.to_string(),
            VoteInfo {
                count,
                voters: voters.clone(),
            },
        );
        self.emit(StoreEvent::VotesUpdated {
            fish_id: fish_id.to_string(),
            count,
            voters,
        });

        if count >= self.elimination_threshold {
            if let Some(item) = self.item(fish_id) {
                self.trigger_elimination(EliminationNotice {
                    fish_id: item.id,
                    fish_name: item.name,
                    is_ai: item.is_ai,
                    owner_id: None,
                    killer_names: None,
                });
            }
        }
    }

    pub fn clear_votes(&mut self, fish_id: &str) {
        self.votes.remove(fish_id);
    }

    pub fn trigger_elimination(&mut self, notice: EliminationNotice) {
        self.elimination = Some(notice.clone());
        self.emit(StoreEvent::EliminationTriggered(notice));
    }

    /// Clears the transient elimination payload once animation playback ends.
    pub fn clear_elimination(&mut self) {
        self.elimination = None;
    }

    // ---- Results ---------------------------------------------------------

    pub fn set_game_result(&mut self, result: GameResult) {
        self.game_result = Some(result.clone());
        // The phase moves with the result; listeners get one event for both.
        self.phase = GamePhase::Gameover;
        self.emit(StoreEvent::GameResult(result));
    }

    pub fn clear_game_result(&mut self) {
        self.game_result = None;
    }

    pub fn being_attacked(&mut self) {
        self.emit(StoreEvent::BeingAttacked {
            duration_ms: ATTACK_WARNING_DURATION.as_millis() as u64,
        });
    }

    // ---- Ephemeral UI queues ---------------------------------------------

    pub fn show_toast(&mut self, kind: ToastKind, content: impl Into<String>) -> String {
        self.show_toast_for(kind, content, TOAST_DURATION)
    }

    pub fn show_toast_for(
        &mut self,
        kind: ToastKind,
        content: impl Into<String>,
        duration: Duration,
    ) -> String {
        self.toast_seq += 1;
        let toast = Toast {
            id: format!("toast_{}", self.toast_seq),
            kind,
            content: content.into(),
            duration_ms: duration.as_millis() as u64,
        };
        self.toasts.push_back(ToastEntry {
            toast: toast.clone(),
            expires_at: Instant::now() + duration,
        });
        let evicted = if self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front()
        } else {
            None
        };
        let id = toast.id.clone();
        self.emit(StoreEvent::ToastShown(toast));
        // Overflow eviction is announced like any other removal, keeping
        // event-driven views in step with `toasts()`.
        if let Some(entry) = evicted {
            self.emit(StoreEvent::ToastRemoved { id: entry.toast.id });
        }
        id
    }

    pub fn remove_toast(&mut self, toast_id: &str) {
        let Some(index) = self.toasts.iter().position(|t| t.toast.id == toast_id) else {
            return;
        };
        self.toasts.remove(index);
        self.emit(StoreEvent::ToastRemoved {
            id: toast_id.to_string(),
        });
    }

    pub fn add_floating_damage(&mut self, fish_id: &str, x: f32, y: f32, value: u32) -> String {
        self.damage_seq += 1;
        let damage = FloatingDamage {
            id: format!("damage_{}", self.damage_seq),
            fish_id: fish_id.to_string(),
            x,
            y,
            value,
        };
        self.damages.push_back(DamageEntry {
            damage: damage.clone(),
            expires_at: Instant::now() + FLOATING_DAMAGE_DURATION,
        });
        if self.damages.len() > MAX_FLOATING_DAMAGES {
            self.damages.pop_front();
        }
        let id = damage.id.clone();
        self.emit(StoreEvent::FloatingDamageAdded(damage));
        id
    }

    // ---- Housekeeping ----------------------------------------------------

    /// Periodic maintenance driven by the session loop: reloads the bullet
    /// once the cooldown elapses and expires timed UI entries.
    pub fn tick(&mut self, now: Instant) {
        if let BulletStatus::Cooling { until } = self.bullet.status {
            if now >= until {
                self.reload_bullet();
            }
        }

        let expired: Vec<String> = self
            .toasts
            .iter()
            .filter(|t| now >= t.expires_at)
            .map(|t| t.toast.id.clone())
            .collect();
        for id in expired {
            self.remove_toast(&id);
        }

        self.damages.retain(|d| now < d.expires_at);
    }

    // ---- Synchronization and reset ---------------------------------------

    /// Applies an authoritative snapshot. Phase changes go through
    /// `set_phase` so listeners observe the transition; the rest is silent,
    /// and the follow-up `set_synced(true)` announces snapshot arrival.
    pub fn sync_state(&mut self, snapshot: SyncSnapshot) {
        if let Some(room_id) = snapshot.room_id {
            self.room_id = Some(room_id);
        }
        if let Some(theme) = snapshot.theme {
            self.theme = Some(theme);
        }
        if let Some(ai_count) = snapshot.ai_count {
            self.ai_count = ai_count;
        }
        if let Some(turbidity) = snapshot.turbidity {
            self.turbidity = turbidity;
        }
        if let Some(phase) = snapshot.phase {
            self.set_phase(phase);
        }
        if let Some(items) = snapshot.items {
            self.items = items;
        }
    }

    /// Returns the session to its initial state. The only way out of
    /// `Gameover`.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Lobby;
        self.room_id = None;
        self.theme = None;
        self.is_synced = false;
        self.items.clear();
        self.ai_count = 0;
        self.turbidity = 0.0;
        self.bullet = BulletState::default();
        self.votes.clear();
        self.game_result = None;
        self.elimination = None;
        self.toasts.clear();
        self.damages.clear();
        self.elimination_threshold = ELIMINATION_THRESHOLD;
    }
}
