/// TOML and environment configuration.
pub mod config;

pub use config::BridgeConfig;
