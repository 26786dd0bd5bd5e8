//! Game settings read from the environment.

use anyhow::Context;
use ludo_core::{Color, GameConfig};

/// Build a config from `LUDO_PLAYERS`, `LUDO_SEED` and `LUDO_STEP_MS`.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn from_env<F>(lookup: F) -> anyhow::Result<GameConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("LUDO_PLAYERS") {
        Some(list) => {
            let players = list
                .split(',')
                .map(str::parse::<Color>)
                .collect::<Result<Vec<_>, _>>()
                .context("LUDO_PLAYERS")?;
            GameConfig::new(players)?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = lookup("LUDO_SEED") {
        config = config.with_seed(seed.trim().parse::<u64>().context("LUDO_SEED")?);
    }
    if let Some(ms) = lookup("LUDO_STEP_MS") {
        config = config.with_step_interval(ms.trim().parse::<u64>().context("LUDO_STEP_MS")?);
    }
    Ok(config)
}
