use std::time::Duration;

pub const DEFAULT_STARTING_COINS: u64 = 500;
pub const DEFAULT_ENTRY_FEE: u64 = 100;
pub const DEFAULT_PROMO_COINS: u64 = 250;

pub const DEFAULT_REFILL_AMOUNT: u64 = 100;
pub const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(3600); // hourly

// Day 1 through day 7
pub const DEFAULT_DAILY_LADDER: [u64; 7] = [50, 75, 100, 150, 200, 300, 500];

pub const DEFAULT_GAME_SCENE: &str = "Level1";
pub const DEFAULT_LOBBY_SCENE: &str = "LobbyScene";
pub const DEFAULT_SAVE_PATH: &str = "save/economy.json";

pub const COIN_VALUE: u64 = 10;
pub const FALL_LIMIT_Y: f32 = -5.0;
pub const RETURN_TO_LOBBY_DELAY: Duration = Duration::from_secs(3);

pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Not enough coins to enter.";
pub const ENTRY_PENDING_MESSAGE: &str = "Entry already in progress.";
pub const NO_ENTRY_PROMPT_MESSAGE: &str = "Press Play to start a race.";
pub const NOTHING_TO_CLAIM_MESSAGE: &str = "Daily reward already claimed today. Come back tomorrow!";
