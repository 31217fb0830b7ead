// Use cases layer: application workflows for the game client.

pub mod battle;
pub mod events;
pub mod session;
pub mod spawner;
pub mod store;

pub use battle::{ActionSink, BattleEngine, VoteCommand, check_game_end};
pub use events::StoreEvent;
pub use session::LocalSession;
pub use spawner::ImpostorSpawner;
pub use store::{GameStore, SyncSnapshot};
