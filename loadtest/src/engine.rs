//! Many virtual users, one tokio task each.

use crate::local::LocalHarness;
use crate::metrics::{log_summary, RunMetrics, RunSnapshot};
use crate::scenario::{Scenario, StatusPolicy};
use crate::{Error, Result};
use futures::future::join_all;
use rand::{rngs::StdRng, SeedableRng};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vegas_client::Client;
use vegas_types::{roster::profile_for, ScenarioConfig};

/// Largest accepted think-time multiplier.
pub const MAX_THINK_TIME_SCALE: f64 = 1_000.0;

/// How a run schedules its virtual users.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub vusers: u32,
    pub iterations: u32,
    /// Window over which virtual-user start times are spread evenly.
    pub ramp_up: Duration,
    /// Pause between iterations of one virtual user.
    pub pacing: Duration,
    /// Multiplier applied to every think-time pause; 0 disables them.
    pub think_time_scale: f64,
    /// Give each virtual user its own identity from the persona roster.
    pub roster: bool,
    /// Seed for per-user RNGs; entropy when unset.
    pub seed: Option<u64>,
    pub timeout: Duration,
    pub status_policy: StatusPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vusers: 1,
            iterations: 1,
            ramp_up: Duration::ZERO,
            pacing: Duration::ZERO,
            think_time_scale: 1.0,
            roster: false,
            seed: None,
            timeout: vegas_client::DEFAULT_TIMEOUT,
            status_policy: StatusPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.vusers == 0 {
            return Err(Error::InvalidOption("vusers must be >= 1".to_string()));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidOption("iterations must be >= 1".to_string()));
        }
        if !(0.0..=MAX_THINK_TIME_SCALE).contains(&self.think_time_scale) {
            return Err(Error::InvalidOption(format!(
                "think time scale must be between 0 and {MAX_THINK_TIME_SCALE}, got {}",
                self.think_time_scale
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidOption("timeout must be > 0".to_string()));
        }
        Ok(())
    }

    /// Start offset of a virtual user (1-based) within the ramp-up window.
    fn start_delay(&self, vuser_id: u32) -> Duration {
        if self.vusers <= 1 {
            return Duration::ZERO;
        }
        self.ramp_up
            .mul_f64(f64::from(vuser_id - 1) / f64::from(self.vusers))
    }
}

pub struct Engine {
    config: EngineConfig,
    scenario: ScenarioConfig,
    client: Client,
    metrics: Arc<RunMetrics>,
}

impl Engine {
    pub fn new(config: EngineConfig, scenario: ScenarioConfig) -> Result<Self> {
        config.validate()?;
        scenario.validate()?;
        let client = Client::new(config.timeout)?;
        Ok(Self {
            config,
            scenario,
            client,
            metrics: Arc::new(RunMetrics::default()),
        })
    }

    pub fn metrics(&self) -> Arc<RunMetrics> {
        self.metrics.clone()
    }

    /// Run until ctrl-c or every virtual user finishes.
    pub async fn run(self) -> Result<RunSnapshot> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(%err, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves or every virtual user finishes.
    ///
    /// On shutdown in-flight iterations are aborted where they stand. Every
    /// planned iteration that did not finish is counted as aborted.
    pub async fn run_until<F>(self, shutdown: F) -> Result<RunSnapshot>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        info!(
            vusers = self.config.vusers,
            iterations = self.config.iterations,
            ramp_up = ?self.config.ramp_up,
            roster = self.config.roster,
            policy = ?self.config.status_policy,
            base_url = %self.scenario.base_url,
            "Starting load test"
        );

        let mut handles = Vec::with_capacity(self.config.vusers as usize);
        for vuser_id in 1..=self.config.vusers {
            handles.push(self.spawn_vuser(vuser_id)?);
        }
        let aborts: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();

        let all = join_all(handles);
        tokio::pin!(all);
        let completed = tokio::select! {
            results = &mut all => Some(results),
            _ = shutdown => None,
        };
        let results = match completed {
            Some(results) => results,
            None => {
                warn!("Shutdown requested, aborting virtual users");
                for handle in &aborts {
                    handle.abort();
                }
                all.await
            }
        };
        for result in results {
            match result {
                Err(err) if err.is_panic() => warn!(%err, "Virtual user task panicked"),
                Err(_) | Ok(()) => {}
            }
        }

        let planned = u64::from(self.config.vusers) * u64::from(self.config.iterations);
        let unfinished = planned.saturating_sub(self.metrics.iterations_finished());
        if unfinished > 0 {
            self.metrics.record_iterations_aborted(unfinished);
        }

        let snapshot = self.metrics.snapshot();
        log_summary(&snapshot, started.elapsed());
        Ok(snapshot)
    }

    fn spawn_vuser(&self, vuser_id: u32) -> Result<JoinHandle<()>> {
        let config = if self.config.roster {
            self.scenario.with_profile(profile_for(vuser_id))
        } else {
            self.scenario.clone()
        };
        let scenario = Scenario::new(config, self.config.status_policy)?;
        let mut harness = LocalHarness::new(
            vuser_id,
            self.client.clone(),
            self.metrics.clone(),
            self.config.think_time_scale,
        );
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(vuser_id))),
            None => StdRng::from_entropy(),
        };
        let metrics = self.metrics.clone();
        let delay = self.config.start_delay(vuser_id);
        let iterations = self.config.iterations;
        let pacing = self.config.pacing;

        Ok(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            for iteration in 0..iterations {
                if iteration > 0 && !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
                match scenario.run_iteration(&mut harness, &mut rng).await {
                    Ok(report) => metrics.record_iteration(report.status),
                    Err(err) => {
                        warn!(vuser = vuser_id, iteration, %err, "Iteration errored");
                        metrics.record_iteration_error();
                    }
                }
            }
        }))
    }
}
