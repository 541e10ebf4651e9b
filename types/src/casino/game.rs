use super::constants::*;
use rand::Rng;
use std::time::Duration;

/// Slots bet for a virtual user: 25, 50, 75 or 100.
pub fn slots_bet(vuser_id: u32) -> i64 {
    SLOTS_BASE_BET + i64::from(vuser_id % SLOTS_BET_TIERS) * SLOTS_BET_STEP
}

/// Dice bet for a virtual user: 50, 100 or 150.
pub fn dice_bet(vuser_id: u32) -> i64 {
    DICE_BASE_BET + i64::from(vuser_id % DICE_BET_TIERS) * DICE_BET_STEP
}

/// Draw a think-time pause uniformly from an inclusive window of whole seconds.
pub fn think_time<R: Rng + ?Sized>(rng: &mut R, window: (u64, u64)) -> Duration {
    Duration::from_secs(rng.gen_range(window.0..=window.1))
}

/// Balance movement produced by one settled game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub bet: i64,
    pub win: i64,
    pub balance: i64,
    pub new_balance: i64,
}

impl Settlement {
    pub fn new(balance: i64, bet: i64, win: i64) -> Self {
        Self {
            bet,
            win,
            balance,
            new_balance: balance - bet + win,
        }
    }

    pub fn won(&self) -> bool {
        self.win > 0
    }
}

/// Result of a simulated spin. `multiplier` is `None` on a losing spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotsOutcome {
    pub multiplier: Option<u32>,
}

impl SlotsOutcome {
    pub fn win(multiplier: u32) -> Self {
        Self {
            multiplier: Some(multiplier),
        }
    }

    pub fn loss() -> Self {
        Self { multiplier: None }
    }

    /// Even odds of a win; a win pays 1x to 5x the bet.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(SLOTS_WIN_PROBABILITY) {
            Self::win(rng.gen_range(1..=SLOTS_MAX_MULTIPLIER))
        } else {
            Self::loss()
        }
    }

    pub fn win_amount(&self, bet: i64) -> i64 {
        self.multiplier.map_or(0, |m| bet * i64::from(m))
    }
}

/// Result of a simulated roll.
///
/// The dice faces are cosmetic: they are drawn independently of `win`, which
/// alone decides the payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiceOutcome {
    pub win: bool,
    pub dice1: u8,
    pub dice2: u8,
}

impl DiceOutcome {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let win = rng.gen_range(0..DICE_LOSS_ODDS) != 0;
        let dice1 = rng.gen_range(3..=6);
        let dice2 = rng.gen_range(2..=5);
        Self { win, dice1, dice2 }
    }

    pub fn sum(&self) -> u8 {
        self.dice1 + self.dice2
    }

    pub fn payout(&self, bet: i64) -> i64 {
        if self.win {
            bet * DICE_PAYOUT_MULTIPLIER
        } else {
            0
        }
    }
}
