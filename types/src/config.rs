//! Scenario configuration and the per-run session context derived from it.

use crate::casino::{DEFAULT_BOOTH, USERNAME_PREFIX};
use crate::roster::Profile;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required value: {0}")]
    Missing(&'static str),
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
    #[error("initial balance {0} outside {MIN_INITIAL_BALANCE}..={MAX_INITIAL_BALANCE}")]
    BalanceOutOfRange(i64),
}

/// Accepted initial balances: a 32-bit integer, like the template's `int`.
pub const MIN_INITIAL_BALANCE: i64 = i32::MIN as i64;
pub const MAX_INITIAL_BALANCE: i64 = i32::MAX as i64;

/// Values substituted into every payload of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub customer_name: String,
    pub email: String,
    pub company_name: String,
    pub persona: String,
    pub base_url: String,
    pub initial_balance: i64,
    #[serde(default)]
    pub cheat_simulation: bool,
    /// Booth override; [DEFAULT_BOOTH] when unset.
    #[serde(default)]
    pub booth: Option<String>,
    /// Post a UI action log entry to the blackjack action endpoint after the deal.
    #[serde(default)]
    pub blackjack_action_log: bool,
}

impl ScenarioConfig {
    /// Check every template value before any request goes out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("customer_name", &self.customer_name),
            ("email", &self.email),
            ("company_name", &self.company_name),
            ("persona", &self.persona),
            ("base_url", &self.base_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        parse_base_url(&self.base_url)?;
        if !(MIN_INITIAL_BALANCE..=MAX_INITIAL_BALANCE).contains(&self.initial_balance) {
            return Err(ConfigError::BalanceOutOfRange(self.initial_balance));
        }
        Ok(())
    }

    /// Replace the identity fields with a roster profile.
    pub fn with_profile(&self, profile: &Profile) -> Self {
        Self {
            customer_name: profile.customer_name.to_string(),
            email: profile.email.to_string(),
            company_name: profile.company_name.to_string(),
            persona: profile.persona.to_string(),
            booth: Some(profile.booth.to_string()),
            ..self.clone()
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidScheme(scheme.to_string())),
    }
}

/// Identity and target of one virtual user's run. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub vuser_id: u32,
    pub username: String,
    pub customer_name: String,
    pub email: String,
    pub company_name: String,
    pub persona: String,
    pub booth: String,
    base_url: String,
}

impl SessionContext {
    pub fn new(config: &ScenarioConfig, vuser_id: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            vuser_id,
            username: format!("{USERNAME_PREFIX}{vuser_id}"),
            customer_name: config.customer_name.clone(),
            email: config.email.clone(),
            company_name: config.company_name.clone(),
            persona: config.persona.clone(),
            booth: config
                .booth
                .clone()
                .unwrap_or_else(|| DEFAULT_BOOTH.to_string()),
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an API path (paths start with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
