pub mod casino;
pub mod config;
pub mod roster;

pub use config::{ConfigError, ScenarioConfig, SessionContext};
pub use roster::Profile;
