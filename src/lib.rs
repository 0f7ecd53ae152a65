//! A moderator for Aswang, a hidden-role party game of mythical creatures among villagers.
//!
//! Each night the role-holders pick skills in turn. The night's actions are then resolved in a fixed order of phases
//! into a new game state and a narrated log, and the village votes someone out during the day.

#![warn(trivial_casts)]
#![warn(missing_docs)]
#![deny(unused_extern_crates, unused_import_braces)]

pub mod config;
pub mod error;
pub mod game;
pub mod handler;
pub mod storage;
mod util;

pub use crate::{
    config::Config,
    error::Error,
    game::{
        lobby::create_lobby,
        night::NightSession,
        resolve::resolve_night,
        run,
        state::GameState,
        win::{evaluate_win, Outcome, Verdict}
    }
};
