//! Runtime configuration read from the environment.

use std::{env, path::PathBuf, str::FromStr};

use crate::game::lobby::MIN_PLAYERS;

/// Where the game is saved and how large a new table is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The JSON save file.
    pub save_path: PathBuf,
    /// Player count for a new game.
    pub players: usize
}

impl Default for Config {
    fn default() -> Config {
        Config {
            save_path: PathBuf::from("aswang-save.json"),
            players: MIN_PLAYERS
        }
    }
}

impl Config {
    /// Reads `ASWANG_SAVE_PATH` and `ASWANG_PLAYERS`, falling back to the defaults for unset or unparsable values.
    pub fn from_env() -> Config {
        let mut config = Config::default();
        if let Some(path) = read_env::<PathBuf>("ASWANG_SAVE_PATH") {
            config.save_path = path;
        }
        if let Some(players) = read_env::<usize>("ASWANG_PLAYERS") {
            config.players = players;
        }
        config
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
