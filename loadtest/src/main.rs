use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, Parser};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use vegas_loadtest::{Engine, EngineConfig, RunSnapshot, StatusPolicy};
use vegas_types::ScenarioConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file with scenario and harness settings (flags and env override it).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "CUSTOMER_NAME")]
    customer_name: Option<String>,

    #[arg(long, env = "EMAIL")]
    email: Option<String>,

    #[arg(long, env = "COMPANY_NAME")]
    company_name: Option<String>,

    #[arg(long, env = "PERSONA")]
    persona: Option<String>,

    /// Casino API root, e.g. http://localhost:3000.
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "INITIAL_BALANCE", allow_negative_numbers = true)]
    initial_balance: Option<i64>,

    /// Tag payloads with simulated cheat metadata (accepts true/false, 1/0, yes/no).
    #[arg(
        long,
        env = "CHEAT_SIMULATION",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    cheat_simulation: Option<bool>,

    /// Booth tag for every payload (default: LoadRunner_Booth).
    #[arg(long, env = "BOOTH")]
    booth: Option<String>,

    /// Also post a UI action log entry after each blackjack deal.
    #[arg(long)]
    blackjack_action_log: bool,

    /// Number of concurrent virtual users (default: 1).
    #[arg(long)]
    vusers: Option<u32>,

    /// Iterations per virtual user (default: 1).
    #[arg(long)]
    iterations: Option<u32>,

    /// Window over which virtual-user starts are spread, in milliseconds.
    #[arg(long)]
    ramp_up_ms: Option<u64>,

    /// Pause between iterations of one virtual user, in milliseconds.
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Multiplier for think-time pauses; 0 disables them (default: 1.0).
    #[arg(long)]
    think_time_scale: Option<f64>,

    /// How HTTP outcomes map to transaction status.
    #[arg(long, value_enum)]
    status_policy: Option<StatusPolicy>,

    /// Give each virtual user a distinct identity from the persona roster.
    #[arg(long)]
    roster: bool,

    /// Seed for deterministic game outcomes.
    #[arg(long)]
    seed: Option<u64>,

    /// Per-request timeout in milliseconds (default: 30000).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    /// Validate configuration and exit without sending requests.
    #[arg(long)]
    dry_run: bool,
}

/// Settings file; every field is optional and overridden by flags or env.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    customer_name: Option<String>,
    email: Option<String>,
    company_name: Option<String>,
    persona: Option<String>,
    base_url: Option<String>,
    initial_balance: Option<i64>,
    cheat_simulation: Option<bool>,
    booth: Option<String>,
    blackjack_action_log: Option<bool>,
    vusers: Option<u32>,
    iterations: Option<u32>,
    ramp_up_ms: Option<u64>,
    pacing_ms: Option<u64>,
    think_time_scale: Option<f64>,
    status_policy: Option<StatusPolicy>,
    roster: Option<bool>,
    seed: Option<u64>,
    timeout_ms: Option<u64>,
}

fn load_file(args: &Args) -> Result<ConfigFile> {
    let Some(path) = &args.config else {
        return Ok(ConfigFile::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn build_config(args: &Args, file: ConfigFile) -> Result<(ScenarioConfig, EngineConfig)> {
    let initial_balance = args
        .initial_balance
        .or(file.initial_balance)
        .context("missing required value: initial_balance (INITIAL_BALANCE)")?;

    let scenario = ScenarioConfig {
        customer_name: args.customer_name.clone().or(file.customer_name).unwrap_or_default(),
        email: args.email.clone().or(file.email).unwrap_or_default(),
        company_name: args.company_name.clone().or(file.company_name).unwrap_or_default(),
        persona: args.persona.clone().or(file.persona).unwrap_or_default(),
        base_url: args.base_url.clone().or(file.base_url).unwrap_or_default(),
        initial_balance,
        cheat_simulation: args
            .cheat_simulation
            .or(file.cheat_simulation)
            .unwrap_or(false),
        booth: args.booth.clone().or(file.booth),
        blackjack_action_log: args.blackjack_action_log
            || file.blackjack_action_log.unwrap_or(false),
    };
    scenario.validate()?;

    let defaults = EngineConfig::default();
    let engine = EngineConfig {
        vusers: args.vusers.or(file.vusers).unwrap_or(defaults.vusers),
        iterations: args.iterations.or(file.iterations).unwrap_or(defaults.iterations),
        ramp_up: args
            .ramp_up_ms
            .or(file.ramp_up_ms)
            .map_or(defaults.ramp_up, Duration::from_millis),
        pacing: args
            .pacing_ms
            .or(file.pacing_ms)
            .map_or(defaults.pacing, Duration::from_millis),
        think_time_scale: args
            .think_time_scale
            .or(file.think_time_scale)
            .unwrap_or(defaults.think_time_scale),
        roster: args.roster || file.roster.unwrap_or(false),
        seed: args.seed.or(file.seed),
        timeout: args
            .timeout_ms
            .or(file.timeout_ms)
            .map_or(defaults.timeout, Duration::from_millis),
        status_policy: args
            .status_policy
            .or(file.status_policy)
            .unwrap_or(defaults.status_policy),
    };
    engine.validate()?;

    Ok((scenario, engine))
}

/// Fail the process when any planned iteration failed, errored or never finished.
fn check_outcome(snapshot: &RunSnapshot) -> Result<()> {
    let unsuccessful = snapshot.unsuccessful();
    if unsuccessful > 0 {
        anyhow::bail!(
            "{unsuccessful} of {} iterations did not pass \
             (failed={}, errored={}, aborted={})",
            snapshot.iterations(),
            snapshot.iterations_failed,
            snapshot.iterations_errored,
            snapshot.iterations_aborted
        );
    }
    Ok(())
}

fn init_tracing(level: tracing::Level, json: bool) {
    let builder = tracing_subscriber::fmt().with_max_level(level);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level, args.log_json);

    let file = load_file(&args)?;
    let (scenario, engine_config) = build_config(&args, file)?;
    if args.dry_run {
        info!(?scenario, ?engine_config, "Config ok");
        return Ok(());
    }

    let engine = Engine::new(engine_config, scenario).context("failed to start load test")?;
    let snapshot = engine.run().await?;
    check_outcome(&snapshot)
}
