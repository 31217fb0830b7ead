pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use interface_adapters::net::{LinkState, NetConfig, NetworkedSession, SessionInput};
pub use use_cases::{GameStore, LocalSession, StoreEvent};
