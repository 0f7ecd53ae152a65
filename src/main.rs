#![warn(trivial_casts)]
#![deny(unused)]
#![forbid(unused_extern_crates, unused_import_braces)]

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aswang::{
    game::{lobby, Role},
    handler::CliHandler,
    storage::{self, JsonFileStorage, Storage},
    Config,
    Error,
    GameState
};

/// Moderates a game of Aswang at this terminal.
#[derive(Debug, Parser)]
#[command(name = "aswang", version)]
struct Args {
    /// Number of players for a new game (6 to 12). Overrides ASWANG_PLAYERS.
    #[arg(short, long)]
    players: Option<usize>,
    /// Deal these roles instead of the standard table, e.g. `--roles aswang,bagani`. Empty seats get the Tagabaryo.
    #[arg(long, value_delimiter = ',')]
    roles: Vec<Role>,
    /// Save file. Overrides ASWANG_SAVE_PATH.
    #[arg(short, long)]
    save: Option<PathBuf>,
    /// Continue the saved game. Starts a new one if there is none.
    #[arg(long, conflicts_with = "new")]
    resume: bool,
    /// Discard any saved game and start a new one.
    #[arg(long)]
    new: bool
}

fn start(args: &Args, config: &Config, storage: &JsonFileStorage) -> Result<GameState, Error> {
    if !args.new {
        match storage::load_active(storage) {
            Ok(state) if state.outcome.is_none() => {
                info!(day = state.day, phase = ?state.phase, "resuming saved game");
                return Ok(state);
            }
            Ok(_) => info!("saved game is already over"),
            Err(Error::NoActiveGame) if args.resume => warn!("no active game to resume, starting a new one"),
            Err(Error::NoActiveGame) => {}
            Err(e) => return Err(e)
        }
    }
    storage.clear()?;
    let players = args.players.unwrap_or(config.players);
    if args.roles.is_empty() {
        Ok(aswang::create_lobby(players)?)
    } else {
        Ok(lobby::create_lobby_with_roles(players, &args.roles, &mut thread_rng())?)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let config = Config::from_env();
    let storage = JsonFileStorage::new(args.save.clone().unwrap_or_else(|| config.save_path.clone()));
    let result = start(&args, &config, &storage)
        .and_then(|state| aswang::run(&mut CliHandler, &storage, state));
    match result {
        Ok(outcome) => {
            info!(winner = %outcome.winner, "game finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[ !! ] {}", e);
            ExitCode::FAILURE
        }
    }
}
