// Domain layer: core game entities and pure rules.

pub mod battle;
pub mod item;
pub mod phase;
pub mod rules;
pub mod theme;

pub use battle::{
    BattleAction, BulletState, BulletStatus, EliminationNotice, FloatingDamage, GameEndReason,
    GameResult, Toast, ToastKind, VoteInfo,
};
pub use item::{Comment, GameItem, ItemPatch, ItemSeed, Position, Velocity, generate_item_id};
pub use phase::GamePhase;
pub use rules::GameOutcome;
pub use theme::{ThemeAiSettings, ThemeAssets, ThemeConfig, ThemeGameRules};
