//! One virtual-user iteration: session init, slots spin, dice roll and
//! blackjack deal, each in its own named transaction.

use crate::harness::{ExitStatus, Harness, RequestSpec, TransactionStatus};
use crate::{Error, Result};
use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};
use vegas_client::{reqwest::header::HeaderMap, session_headers};
use vegas_types::{
    casino::{
        dice_bet, slots_bet, think_time, BlackjackAction, BlackjackDeal, DiceOutcome, DiceRoll,
        Settlement, SlotsOutcome, SlotsSpin, BLACKJACK_ACTION_PATH, BLACKJACK_DEAL_PATH,
        CORRELATION_PREFIX, DICE_ROLL_PATH, DICE_THINK_SECS, SLOTS_SPIN_PATH, SLOTS_THINK_SECS,
        TX_BLACKJACK_ACTION, TX_BLACKJACK_DEAL, TX_DICE_ROLL, TX_SESSION_INIT, TX_SLOTS_SPIN,
    },
    ScenarioConfig, SessionContext,
};

/// How HTTP outcomes map onto transaction verdicts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    /// Report every transaction as passed, whatever the server said.
    #[default]
    AlwaysPass,
    /// Fail a transaction on a transport error or a non-2xx status.
    InspectResponse,
}

impl StatusPolicy {
    fn judge(self, result: &vegas_client::Result<vegas_client::Response>) -> TransactionStatus {
        match (self, result) {
            (Self::AlwaysPass, _) => TransactionStatus::Pass,
            (Self::InspectResponse, Ok(response)) if response.is_success() => {
                TransactionStatus::Pass
            }
            (Self::InspectResponse, _) => TransactionStatus::Fail,
        }
    }
}

/// What one iteration did, for callers that want more than the exit status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationReport {
    pub status: ExitStatus,
    pub correlation_id: String,
    pub started_at_ms: u64,
    pub final_balance: i64,
}

/// `loadtest_<epochSeconds>_<vuserId>_<uuid4>`
pub fn correlation_id<H: Harness + ?Sized>(harness: &H) -> String {
    let epoch_secs = harness
        .now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!(
        "{CORRELATION_PREFIX}_{epoch_secs}_{}_{}",
        harness.vuser_id(),
        harness.uuid4()
    )
}

/// A validated scenario, reusable across iterations and virtual users.
#[derive(Clone, Debug)]
pub struct Scenario {
    config: ScenarioConfig,
    policy: StatusPolicy,
}

impl Scenario {
    pub fn new(config: ScenarioConfig, policy: StatusPolicy) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Run the session once. All state (balance, correlation id, payloads)
    /// lives on this call's stack.
    pub async fn run_iteration<H, R>(&self, harness: &mut H, rng: &mut R) -> Result<IterationReport>
    where
        H: Harness,
        R: Rng + Send,
    {
        let vuser_id = harness.vuser_id();
        let session = SessionContext::new(&self.config, vuser_id)?;
        let cheat = self.config.cheat_simulation;

        let correlation_id = correlation_id(harness);
        let started_at_ms = harness
            .now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        info!(vuser = vuser_id, %correlation_id, "Starting iteration");

        harness.start_transaction(TX_SESSION_INIT);
        let headers = session_headers();
        harness.end_transaction(TX_SESSION_INIT, TransactionStatus::Pass);

        let mut balance = self.config.initial_balance;
        let mut failed = false;

        // Slots
        harness.start_transaction(TX_SLOTS_SPIN);
        let bet = slots_bet(vuser_id);
        let outcome = SlotsOutcome::draw(rng);
        let settlement = Settlement::new(balance, bet, outcome.win_amount(bet));
        let body = serde_json::to_vec(&SlotsSpin::new(
            &session,
            settlement,
            cheat,
            &correlation_id,
        ))?;
        let status = self
            .post(
                harness,
                &headers,
                "Slots_Spin_Request",
                session.endpoint(SLOTS_SPIN_PATH),
                body,
            )
            .await;
        balance = settlement.new_balance;
        harness.end_transaction(TX_SLOTS_SPIN, status);
        failed |= !status.is_pass();
        debug!(vuser = vuser_id, bet, win = settlement.win, balance, "Slots settled");
        harness.think(think_time(rng, SLOTS_THINK_SECS)).await;

        // Dice
        harness.start_transaction(TX_DICE_ROLL);
        let bet = dice_bet(vuser_id);
        let outcome = DiceOutcome::draw(rng);
        let settlement = Settlement::new(balance, bet, outcome.payout(bet));
        let body = serde_json::to_vec(&DiceRoll::new(
            &session,
            settlement,
            outcome,
            cheat,
            &correlation_id,
        ))?;
        let status = self
            .post(
                harness,
                &headers,
                "Dice_Roll_Request",
                session.endpoint(DICE_ROLL_PATH),
                body,
            )
            .await;
        balance = settlement.new_balance;
        harness.end_transaction(TX_DICE_ROLL, status);
        failed |= !status.is_pass();
        debug!(vuser = vuser_id, bet, win = settlement.win, balance, "Dice settled");
        harness.think(think_time(rng, DICE_THINK_SECS)).await;

        // Blackjack (deal only, balance untouched)
        harness.start_transaction(TX_BLACKJACK_DEAL);
        let body = serde_json::to_vec(&BlackjackDeal::new(
            &session,
            balance,
            cheat,
            &correlation_id,
        ))?;
        let status = self
            .post(
                harness,
                &headers,
                "Blackjack_Deal_Request",
                session.endpoint(BLACKJACK_DEAL_PATH),
                body,
            )
            .await;
        harness.end_transaction(TX_BLACKJACK_DEAL, status);
        failed |= !status.is_pass();

        if self.config.blackjack_action_log {
            harness.start_transaction(TX_BLACKJACK_ACTION);
            let body = serde_json::to_vec(&BlackjackAction::deal(
                &session,
                started_at_ms,
                balance,
                &correlation_id,
            ))?;
            let status = self
                .post(
                    harness,
                    &headers,
                    "Blackjack_Action_Request",
                    session.endpoint(BLACKJACK_ACTION_PATH),
                    body,
                )
                .await;
            harness.end_transaction(TX_BLACKJACK_ACTION, status);
            failed |= !status.is_pass();
        }

        let status = if failed {
            ExitStatus::Failed
        } else {
            ExitStatus::Passed
        };
        info!(vuser = vuser_id, %correlation_id, ?status, balance, "Finished iteration");
        Ok(IterationReport {
            status,
            correlation_id,
            started_at_ms,
            final_balance: balance,
        })
    }

    async fn post<H: Harness>(
        &self,
        harness: &mut H,
        headers: &HeaderMap,
        name: &'static str,
        url: String,
        body: Vec<u8>,
    ) -> TransactionStatus {
        let request = RequestSpec {
            name,
            url,
            headers: headers.clone(),
            body,
        };
        let result = harness.issue_request(request).await;
        match &result {
            Ok(response) if response.is_success() => {
                debug!(
                    request = name,
                    status = %response.status,
                    elapsed = ?response.elapsed,
                    "Request completed"
                );
            }
            Ok(response) => {
                warn!(
                    request = name,
                    status = %response.status,
                    body = %truncate(&response.body),
                    "Request rejected"
                );
            }
            Err(err) => {
                warn!(request = name, %err, "Request failed");
            }
        }
        self.policy.judge(&result)
    }
}

/// Run one iteration with the default [StatusPolicy].
pub async fn run_iteration<H, R>(
    config: &ScenarioConfig,
    harness: &mut H,
    rng: &mut R,
) -> Result<ExitStatus>
where
    H: Harness,
    R: Rng + Send,
{
    let scenario = Scenario::new(config.clone(), StatusPolicy::default())?;
    Ok(scenario.run_iteration(harness, rng).await?.status)
}

fn truncate(body: &str) -> &str {
    const MAX: usize = 256;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
