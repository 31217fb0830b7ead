// Frameworks layer: runtime configuration.

pub mod config;
