// Network adapter modules: transport, inbound dispatch, session controller.

pub mod client;
pub mod dispatch;
pub mod session;

pub use client::{LinkState, NetClient, NetConfig, NetEvent};
pub use session::{NetworkedSession, SessionInput};
