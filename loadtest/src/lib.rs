//! Vegas casino virtual-user scenario.
//!
//! [Scenario] plays one session (slots, dice, blackjack deal) against a
//! [Harness]. [Engine] runs many virtual users concurrently over HTTP through
//! [LocalHarness].

pub mod engine;
pub mod harness;
pub mod local;
pub mod metrics;
pub mod scenario;

pub use engine::{Engine, EngineConfig};
pub use harness::{ExitStatus, Harness, RequestSpec, TransactionStatus};
pub use local::LocalHarness;
pub use metrics::{RunMetrics, RunSnapshot};
pub use scenario::{correlation_id, run_iteration, IterationReport, Scenario, StatusPolicy};
use thiserror::Error;
use vegas_types::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("payload encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("client error: {0}")]
    Client(#[from] vegas_client::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
