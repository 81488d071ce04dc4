use std::path::PathBuf;
use std::time::Duration;

use shared::constants::*;

use crate::error::ConfigError;
use crate::services::LadderPolicy;

const DEFAULT_FINISH_Z: f32 = 185.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LobbyConfig {
    pub save_path: PathBuf,
    pub game_scene: String,
    pub lobby_scene: String,
    pub starting_coins: u64,
    pub entry_fee: u64,
    pub promo_coins: u64,
    pub refill_amount: u64,
    pub refill_interval: Duration,
    pub daily_ladder: Vec<u64>,
    pub ladder_policy: LadderPolicy,
    /// Distance at which a run counts as won. `None` for a truly endless track.
    pub finish_z: Option<f32>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            game_scene: DEFAULT_GAME_SCENE.to_string(),
            lobby_scene: DEFAULT_LOBBY_SCENE.to_string(),
            starting_coins: DEFAULT_STARTING_COINS,
            entry_fee: DEFAULT_ENTRY_FEE,
            promo_coins: DEFAULT_PROMO_COINS,
            refill_amount: DEFAULT_REFILL_AMOUNT,
            refill_interval: DEFAULT_REFILL_INTERVAL,
            daily_ladder: DEFAULT_DAILY_LADDER.to_vec(),
            ladder_policy: LadderPolicy::Cap,
            finish_z: Some(DEFAULT_FINISH_Z),
        }
    }
}

impl LobbyConfig {
    /// Reads `LOBBY_*` variables, loading a `.env` file first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("LOBBY_SAVE_PATH") {
            config.save_path = PathBuf::from(path);
        }
        if let Some(scene) = lookup("LOBBY_GAME_SCENE") {
            config.game_scene = scene;
        }
        if let Some(scene) = lookup("LOBBY_LOBBY_SCENE") {
            config.lobby_scene = scene;
        }

        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var, value }),
                None => Ok(default),
            }
        };

        config.starting_coins = number("LOBBY_STARTING_COINS", config.starting_coins)?;
        config.entry_fee = number("LOBBY_ENTRY_FEE", config.entry_fee)?;
        config.promo_coins = number("LOBBY_PROMO_COINS", config.promo_coins)?;
        config.refill_amount = number("LOBBY_REFILL_AMOUNT", config.refill_amount)?;

        let interval = number("LOBBY_REFILL_INTERVAL_SECS", config.refill_interval.as_secs())?;
        if interval == 0 {
            return Err(ConfigError::ZeroRefillInterval);
        }
        config.refill_interval = Duration::from_secs(interval);

        if let Some(ladder) = lookup("LOBBY_DAILY_LADDER") {
            config.daily_ladder = parse_ladder(&ladder)?;
        }
        if let Some(policy) = lookup("LOBBY_LADDER_POLICY") {
            config.ladder_policy = policy.parse()?;
        }

        if let Some(value) = lookup("LOBBY_FINISH_Z") {
            let value = value.trim().to_string();
            config.finish_z = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(value.parse().map_err(|_| ConfigError::InvalidDistance { var: "LOBBY_FINISH_Z", value })?)
            };
        }

        Ok(config)
    }
}

fn parse_ladder(raw: &str) -> Result<Vec<u64>, ConfigError> {
    let ladder = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "LOBBY_DAILY_LADDER",
                value: part.to_string(),
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;

    if ladder.is_empty() {
        return Err(ConfigError::EmptyLadder);
    }
    Ok(ladder)
}
