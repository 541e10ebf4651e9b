//! JSON bodies posted to the casino API.
//!
//! Field order is part of the wire shape: serde emits struct fields in
//! declaration order, and the flattened [Identity] block sits where the
//! browser client puts it.

use super::constants::*;
use super::game::{DiceOutcome, Settlement};
use crate::SessionContext;
use serde::Serialize;

/// Customer block shared by every game payload.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Identity<'a> {
    #[serde(rename = "Username")]
    pub username: &'a str,
    #[serde(rename = "CustomerName")]
    pub customer_name: &'a str,
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "CompanyName")]
    pub company_name: &'a str,
    #[serde(rename = "Persona")]
    pub persona: &'a str,
    #[serde(rename = "Booth")]
    pub booth: &'a str,
    #[serde(rename = "OptIn")]
    pub opt_in: bool,
}

impl<'a> Identity<'a> {
    pub fn from_session(session: &'a SessionContext) -> Self {
        Self {
            username: &session.username,
            customer_name: &session.customer_name,
            email: &session.email,
            company_name: &session.company_name,
            persona: &session.persona,
            booth: &session.booth,
            opt_in: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CheatDetails {
    #[serde(rename = "winBoost")]
    pub win_boost: f64,
    pub frequency: f64,
}

/// `POST /api/slots/spin`
#[derive(Clone, Debug, Serialize)]
pub struct SlotsSpin<'a> {
    pub game: &'static str,
    pub action: &'static str,
    #[serde(rename = "betAmount")]
    pub bet_amount: i64,
    #[serde(rename = "winAmount")]
    pub win_amount: i64,
    pub payline: [&'static str; 3],
    /// `true` while cheating, otherwise `null`.
    pub cheat: Option<bool>,
    #[serde(rename = "customerName")]
    pub customer_name: &'a str,
    pub balance: i64,
    #[serde(rename = "newBalance")]
    pub new_balance: i64,
    #[serde(flatten)]
    pub identity: Identity<'a>,
    #[serde(rename = "Balance")]
    pub settled_balance: i64,
    #[serde(rename = "BetAmount")]
    pub bet: i64,
    #[serde(rename = "correlationId")]
    pub correlation_id: &'a str,
    #[serde(rename = "CheatActive")]
    pub cheat_active: bool,
    #[serde(rename = "CheatType")]
    pub cheat_type: Option<&'static str>,
    #[serde(rename = "CheatDetails")]
    pub cheat_details: Option<CheatDetails>,
}

impl<'a> SlotsSpin<'a> {
    pub fn new(
        session: &'a SessionContext,
        settlement: Settlement,
        cheat: bool,
        correlation_id: &'a str,
    ) -> Self {
        Self {
            game: "slots",
            action: "spin",
            bet_amount: settlement.bet,
            win_amount: settlement.win,
            payline: SLOTS_PAYLINE,
            cheat: cheat.then_some(true),
            customer_name: &session.customer_name,
            balance: settlement.balance,
            new_balance: settlement.new_balance,
            identity: Identity::from_session(session),
            settled_balance: settlement.new_balance,
            bet: settlement.bet,
            correlation_id,
            cheat_active: cheat,
            cheat_type: cheat.then_some(CHEAT_SLOTS),
            cheat_details: cheat.then_some(CheatDetails {
                win_boost: CHEAT_SLOTS_WIN_BOOST,
                frequency: CHEAT_SLOTS_FREQUENCY,
            }),
        }
    }
}

/// `POST /api/dice/roll`
#[derive(Clone, Debug, Serialize)]
pub struct DiceRoll<'a> {
    #[serde(flatten)]
    pub identity: Identity<'a>,
    #[serde(rename = "BetAmount")]
    pub bet: i64,
    pub balance: i64,
    #[serde(rename = "newBalance")]
    pub new_balance: i64,
    #[serde(rename = "Balance")]
    pub settled_balance: i64,
    #[serde(rename = "BetType")]
    pub bet_type: &'static str,
    #[serde(rename = "Game")]
    pub game: &'static str,
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "Result")]
    pub result: &'static str,
    pub dice1: u8,
    pub dice2: u8,
    pub sum: u8,
    pub win: bool,
    pub payout: i64,
    #[serde(rename = "payoutMultiplier")]
    pub payout_multiplier: f64,
    #[serde(rename = "WinningAmount")]
    pub winning_amount: i64,
    #[serde(rename = "LossAmount")]
    pub loss_amount: i64,
    #[serde(rename = "WinFlag")]
    pub win_flag: u8,
    #[serde(rename = "Device")]
    pub device: &'static str,
    #[serde(rename = "CheatActive")]
    pub cheat_active: bool,
    #[serde(rename = "CheatType")]
    pub cheat_type: Option<&'static str>,
    #[serde(rename = "correlationId")]
    pub correlation_id: &'a str,
}

impl<'a> DiceRoll<'a> {
    pub fn new(
        session: &'a SessionContext,
        settlement: Settlement,
        outcome: DiceOutcome,
        cheat: bool,
        correlation_id: &'a str,
    ) -> Self {
        let won = settlement.won();
        Self {
            identity: Identity::from_session(session),
            bet: settlement.bet,
            balance: settlement.balance,
            new_balance: settlement.new_balance,
            settled_balance: settlement.new_balance,
            bet_type: "pass",
            game: "Vegas Dice",
            action: "RollCompleted",
            status: "Completed",
            result: if won { "win" } else { "lose" },
            dice1: outcome.dice1,
            dice2: outcome.dice2,
            sum: outcome.sum(),
            win: won,
            payout: settlement.win,
            payout_multiplier: if won {
                settlement.win as f64 / settlement.bet as f64
            } else {
                0.0
            },
            winning_amount: settlement.win,
            loss_amount: if won { 0 } else { settlement.bet },
            win_flag: u8::from(won),
            device: DEVICE,
            cheat_active: cheat,
            cheat_type: cheat.then_some(CHEAT_DICE),
            correlation_id,
        }
    }
}

/// `POST /api/blackjack/deal`
#[derive(Clone, Debug, Serialize)]
pub struct BlackjackDeal<'a> {
    #[serde(flatten)]
    pub identity: Identity<'a>,
    #[serde(rename = "BetAmount")]
    pub bet: i64,
    pub balance: i64,
    #[serde(rename = "Balance")]
    pub settled_balance: i64,
    #[serde(rename = "Game")]
    pub game: &'static str,
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "CheatActive")]
    pub cheat_active: bool,
    #[serde(rename = "CheatType")]
    pub cheat_type: Option<&'static str>,
    #[serde(rename = "correlationId")]
    pub correlation_id: &'a str,
}

impl<'a> BlackjackDeal<'a> {
    /// The deal only announces the hand; `balance` is reported unchanged.
    pub fn new(
        session: &'a SessionContext,
        balance: i64,
        cheat: bool,
        correlation_id: &'a str,
    ) -> Self {
        Self {
            identity: Identity::from_session(session),
            bet: BLACKJACK_DEAL_BET,
            balance,
            settled_balance: balance,
            game: "Blackjack",
            action: "Deal",
            status: "Starting",
            cheat_active: cheat,
            cheat_type: cheat.then_some(CHEAT_BLACKJACK),
            correlation_id,
        }
    }
}

/// `POST /api/blackjack/action`
#[derive(Clone, Debug, Serialize)]
pub struct BlackjackAction<'a> {
    pub timestamp: u64,
    pub game: &'static str,
    pub action: &'static str,
    pub player: &'a str,
    pub email: &'a str,
    pub company: &'a str,
    pub persona: &'a str,
    pub booth: &'a str,
    pub balance: i64,
    #[serde(rename = "currentBet")]
    pub current_bet: i64,
    #[serde(rename = "correlationId")]
    pub correlation_id: &'a str,
}

impl<'a> BlackjackAction<'a> {
    pub fn deal(
        session: &'a SessionContext,
        timestamp_ms: u64,
        balance: i64,
        correlation_id: &'a str,
    ) -> Self {
        Self {
            timestamp: timestamp_ms,
            game: "blackjack",
            action: "deal",
            player: &session.username,
            email: &session.email,
            company: &session.company_name,
            persona: &session.persona,
            booth: &session.booth,
            balance,
            current_bet: BLACKJACK_DEAL_BET,
            correlation_id,
        }
    }
}
