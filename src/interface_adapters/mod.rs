// Interface adapters: wire protocol, reconciliation and network handling.

pub mod clients;
pub mod net;
pub mod protocol;
pub mod reconcile;
