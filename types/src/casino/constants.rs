/// Slots spin endpoint, appended to the base URL
pub const SLOTS_SPIN_PATH: &str = "/api/slots/spin";

/// Dice roll endpoint, appended to the base URL
pub const DICE_ROLL_PATH: &str = "/api/dice/roll";

/// Blackjack deal endpoint, appended to the base URL
pub const BLACKJACK_DEAL_PATH: &str = "/api/blackjack/deal";

/// Blackjack UI action logging endpoint, appended to the base URL
pub const BLACKJACK_ACTION_PATH: &str = "/api/blackjack/action";

/// Transaction names reported to the harness.
pub const TX_SESSION_INIT: &str = "Vegas_Casino_Session_Init";
pub const TX_SLOTS_SPIN: &str = "Slots_Spin_Simulation";
pub const TX_DICE_ROLL: &str = "Dice_Roll_Simulation";
pub const TX_BLACKJACK_DEAL: &str = "Blackjack_Deal_Simulation";
pub const TX_BLACKJACK_ACTION: &str = "Blackjack_Action_Log";

/// Headers attached to every request of a session.
pub const HEADER_CONTENT_TYPE: &str = "application/json";
pub const HEADER_USER_AGENT: &str = "Vegas-Casino-UI";
pub const HEADER_ACCEPT: &str = "application/json, text/plain, */*";
pub const HEADER_CACHE_CONTROL: &str = "no-cache";

/// Username prefix; the vuser id is appended.
pub const USERNAME_PREFIX: &str = "LoadTest_User_";

/// Booth reported when no roster profile supplies one
pub const DEFAULT_BOOTH: &str = "LoadRunner_Booth";

/// Device tag carried by dice payloads
pub const DEVICE: &str = "LoadRunner-Simulation";

/// Correlation id prefix: `loadtest_<epochSeconds>_<vuserId>_<uuid4>`
pub const CORRELATION_PREFIX: &str = "loadtest";

// Slots bet table: 25, 50, 75, 100 keyed by vuser id.
pub const SLOTS_BASE_BET: i64 = 25;
pub const SLOTS_BET_STEP: i64 = 25;
pub const SLOTS_BET_TIERS: u32 = 4;
pub const SLOTS_WIN_PROBABILITY: f64 = 0.5;
pub const SLOTS_MAX_MULTIPLIER: u32 = 5;
pub const SLOTS_PAYLINE: [&str; 3] = ["Seven", "Seven", "Cherry"];

// Dice bet table: 50, 100, 150 keyed by vuser id.
pub const DICE_BASE_BET: i64 = 50;
pub const DICE_BET_STEP: i64 = 50;
pub const DICE_BET_TIERS: u32 = 3;
/// A roll wins unless a 1-in-3 draw comes up zero.
pub const DICE_LOSS_ODDS: u32 = 3;
pub const DICE_PAYOUT_MULTIPLIER: i64 = 2;

/// Blackjack deal bet; signalled to the server only, not settled locally
pub const BLACKJACK_DEAL_BET: i64 = 100;

/// Think-time windows (inclusive, seconds) after each settled phase.
pub const SLOTS_THINK_SECS: (u64, u64) = (2, 5);
pub const DICE_THINK_SECS: (u64, u64) = (1, 3);

/// Cheat metadata injected when cheat simulation is enabled.
pub const CHEAT_SLOTS: &str = "luckySpins";
pub const CHEAT_DICE: &str = "loadedDice";
pub const CHEAT_BLACKJACK: &str = "cardCounting";
pub const CHEAT_SLOTS_WIN_BOOST: f64 = 0.3;
pub const CHEAT_SLOTS_FREQUENCY: f64 = 0.2;
