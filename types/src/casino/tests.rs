use super::*;
use crate::{ScenarioConfig, SessionContext};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;

fn session(vuser_id: u32) -> SessionContext {
    let config = ScenarioConfig {
        customer_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        company_name: "Acme".to_string(),
        persona: "Developer".to_string(),
        base_url: "http://localhost:3000".to_string(),
        initial_balance: 500,
        cheat_simulation: false,
        booth: None,
        blackjack_action_log: false,
    };
    SessionContext::new(&config, vuser_id).unwrap()
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("payload is an object")
        .keys()
        .map(String::as_str)
        .collect()
}

proptest! {
    #[test]
    fn prop_slots_bet_table(vuser_id in any::<u32>()) {
        let bet = slots_bet(vuser_id);
        prop_assert!([25, 50, 75, 100].contains(&bet));
        prop_assert_eq!(bet, 25 + i64::from(vuser_id % 4) * 25);
    }

    #[test]
    fn prop_dice_bet_table(vuser_id in any::<u32>()) {
        let bet = dice_bet(vuser_id);
        prop_assert!([50, 100, 150].contains(&bet));
        prop_assert_eq!(bet, 50 + i64::from(vuser_id % 3) * 50);
    }

    #[test]
    fn prop_settlement_balance(
        balance in -10_000i64..10_000,
        bet in 0i64..500,
        win in 0i64..2_500,
    ) {
        let settlement = Settlement::new(balance, bet, win);
        prop_assert_eq!(settlement.new_balance, balance - bet + win);
    }

    #[test]
    fn prop_dice_outcome_ranges(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = DiceOutcome::draw(&mut rng);
        prop_assert!((3..=6).contains(&outcome.dice1));
        prop_assert!((2..=5).contains(&outcome.dice2));
        prop_assert_eq!(outcome.sum(), outcome.dice1 + outcome.dice2);
        let payout = outcome.payout(100);
        if outcome.win {
            prop_assert_eq!(payout, 200);
        } else {
            prop_assert_eq!(payout, 0);
        }
    }

    #[test]
    fn prop_slots_outcome_multiplier(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = SlotsOutcome::draw(&mut rng);
        match outcome.multiplier {
            Some(m) => {
                prop_assert!((1..=5).contains(&m));
                prop_assert_eq!(outcome.win_amount(50), 50 * i64::from(m));
            }
            None => prop_assert_eq!(outcome.win_amount(50), 0),
        }
    }
}

#[test]
fn test_settlement_chain_at_balance_bounds() {
    use crate::config::{MAX_INITIAL_BALANCE, MIN_INITIAL_BALANCE};

    // Worst-case loss and win through slots then dice.
    let low = Settlement::new(MIN_INITIAL_BALANCE, slots_bet(3), 0);
    let low = Settlement::new(low.new_balance, dice_bet(2), 0);
    assert_eq!(low.new_balance, MIN_INITIAL_BALANCE - 250);

    let top_slots = slots_bet(3);
    let high = Settlement::new(MAX_INITIAL_BALANCE, top_slots, top_slots * 5);
    let high = Settlement::new(high.new_balance, dice_bet(2), dice_bet(2) * 2);
    assert_eq!(high.new_balance, MAX_INITIAL_BALANCE + 550);
}

#[test]
fn test_think_time_window() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..100 {
        let pause = think_time(&mut rng, SLOTS_THINK_SECS);
        assert!((2..=5).contains(&pause.as_secs()));
        let pause = think_time(&mut rng, DICE_THINK_SECS);
        assert!((1..=3).contains(&pause.as_secs()));
    }
}

#[test]
fn test_slots_win_branch_example() {
    let session = session(1);
    let bet = slots_bet(session.vuser_id);
    assert_eq!(bet, 50);

    let win = SlotsOutcome::win(3).win_amount(bet);
    let settlement = Settlement::new(500, bet, win);
    assert_eq!(win, 150);
    assert_eq!(settlement.new_balance, 600);
}

#[test]
fn test_slots_payload_shape() {
    let session = session(1);
    let settlement = Settlement::new(500, 50, 150);
    let payload = serde_json::to_value(SlotsSpin::new(&session, settlement, false, "cid")).unwrap();

    assert_eq!(
        keys(&payload),
        [
            "game",
            "action",
            "betAmount",
            "winAmount",
            "payline",
            "cheat",
            "customerName",
            "balance",
            "newBalance",
            "Username",
            "CustomerName",
            "Email",
            "CompanyName",
            "Persona",
            "Booth",
            "OptIn",
            "Balance",
            "BetAmount",
            "correlationId",
            "CheatActive",
            "CheatType",
            "CheatDetails",
        ]
    );
    assert_eq!(payload["payline"], serde_json::json!(["Seven", "Seven", "Cherry"]));
    assert_eq!(payload["balance"], 500);
    assert_eq!(payload["newBalance"], 600);
    assert_eq!(payload["Balance"], 600);
    assert_eq!(payload["Username"], "LoadTest_User_1");
    assert_eq!(payload["Booth"], DEFAULT_BOOTH);
    assert_eq!(payload["OptIn"], true);
    assert!(payload["cheat"].is_null());
    assert_eq!(payload["CheatActive"], false);
    assert!(payload["CheatType"].is_null());
    assert!(payload["CheatDetails"].is_null());
}

#[test]
fn test_slots_payload_with_cheat() {
    let session = session(2);
    let payload = serde_json::to_value(SlotsSpin::new(
        &session,
        Settlement::new(1_000, 75, 0),
        true,
        "cid",
    ))
    .unwrap();

    assert_eq!(payload["cheat"], true);
    assert_eq!(payload["CheatActive"], true);
    assert_eq!(payload["CheatType"], "luckySpins");
    assert_eq!(
        payload["CheatDetails"],
        serde_json::json!({"winBoost": 0.3, "frequency": 0.2})
    );
}

#[test]
fn test_dice_payload_shape_on_forced_win() {
    let session = session(1);
    let outcome = DiceOutcome {
        win: true,
        dice1: 4,
        dice2: 3,
    };
    let bet = dice_bet(session.vuser_id);
    assert_eq!(bet, 100);
    let settlement = Settlement::new(600, bet, outcome.payout(bet));
    let payload =
        serde_json::to_value(DiceRoll::new(&session, settlement, outcome, false, "cid")).unwrap();

    assert_eq!(
        keys(&payload),
        [
            "Username",
            "CustomerName",
            "Email",
            "CompanyName",
            "Persona",
            "Booth",
            "OptIn",
            "BetAmount",
            "balance",
            "newBalance",
            "Balance",
            "BetType",
            "Game",
            "Action",
            "Status",
            "Result",
            "dice1",
            "dice2",
            "sum",
            "win",
            "payout",
            "payoutMultiplier",
            "WinningAmount",
            "LossAmount",
            "WinFlag",
            "Device",
            "CheatActive",
            "CheatType",
            "correlationId",
        ]
    );
    assert_eq!(payload["payout"], 200);
    assert_eq!(payload["payoutMultiplier"], 2.0);
    assert_eq!(payload["WinFlag"], 1);
    assert_eq!(payload["WinningAmount"], 200);
    assert_eq!(payload["LossAmount"], 0);
    assert_eq!(payload["Result"], "win");
    assert_eq!(payload["newBalance"], 700);
    assert_eq!(payload["sum"], 7);
    assert_eq!(payload["Device"], DEVICE);
}

#[test]
fn test_dice_payload_on_loss() {
    let session = session(0);
    let outcome = DiceOutcome {
        win: false,
        dice1: 6,
        dice2: 5,
    };
    let bet = dice_bet(session.vuser_id);
    let settlement = Settlement::new(500, bet, outcome.payout(bet));
    let payload =
        serde_json::to_value(DiceRoll::new(&session, settlement, outcome, true, "cid")).unwrap();

    assert_eq!(payload["payout"], 0);
    assert_eq!(payload["payoutMultiplier"], 0.0);
    assert_eq!(payload["WinFlag"], 0);
    assert_eq!(payload["LossAmount"], 50);
    assert_eq!(payload["Result"], "lose");
    assert_eq!(payload["win"], false);
    assert_eq!(payload["Balance"], 450);
    assert_eq!(payload["CheatType"], "loadedDice");
}

#[test]
fn test_blackjack_payload_shape() {
    let session = session(3);
    let payload = serde_json::to_value(BlackjackDeal::new(&session, 420, false, "cid")).unwrap();

    assert_eq!(
        keys(&payload),
        [
            "Username",
            "CustomerName",
            "Email",
            "CompanyName",
            "Persona",
            "Booth",
            "OptIn",
            "BetAmount",
            "balance",
            "Balance",
            "Game",
            "Action",
            "Status",
            "CheatActive",
            "CheatType",
            "correlationId",
        ]
    );
    assert_eq!(payload["BetAmount"], 100);
    assert_eq!(payload["balance"], 420);
    assert_eq!(payload["Balance"], 420);
    assert_eq!(payload["Status"], "Starting");
    assert!(payload["CheatType"].is_null());

    let cheating = serde_json::to_value(BlackjackDeal::new(&session, 420, true, "cid")).unwrap();
    assert_eq!(cheating["CheatType"], "cardCounting");
}

#[test]
fn test_blackjack_action_payload() {
    let session = session(3);
    let payload =
        serde_json::to_value(BlackjackAction::deal(&session, 1_700_000_000_000, 420, "cid"))
            .unwrap();

    assert_eq!(
        keys(&payload),
        [
            "timestamp",
            "game",
            "action",
            "player",
            "email",
            "company",
            "persona",
            "booth",
            "balance",
            "currentBet",
            "correlationId",
        ]
    );
    assert_eq!(payload["timestamp"], 1_700_000_000_000u64);
    assert_eq!(payload["player"], "LoadTest_User_3");
    assert_eq!(payload["currentBet"], 100);
}
