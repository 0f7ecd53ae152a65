//! Core game logic.

pub mod lobby;
pub mod log;
pub mod night;
pub mod resolve;
mod skills;
pub mod state;
mod types;
pub mod win;

use tracing::{info, warn};

use crate::{
    error::{Error, InvalidAction},
    handler::Handler,
    storage::Storage
};
pub use self::{
    skills::*,
    types::*
};
use self::{
    night::{NightSession, Turn},
    state::{GameState, Phase},
    win::{Outcome, Verdict}
};

fn persist<S: Storage + ?Sized>(storage: &S, state: &GameState) {
    if let Err(e) = storage.save(state) {
        warn!(error = %e, day = state.day, phase = ?state.phase, "failed to save game, continuing in memory");
    }
}

/// Collects and resolves one night.
///
/// # Errors
///
/// Fails if the game is not in the night phase.
pub fn play_night<H: Handler>(handler: &mut H, state: &mut GameState) -> Result<(), Error> {
    if state.phase != Phase::Night {
        return Err(InvalidAction::WrongPhase { expected: Phase::Night, found: state.phase }.into());
    }
    handler.announce_night(state);
    let mut session = NightSession::begin(state);
    while let Some(turn) = session.next_turn(state) {
        match turn {
            Turn::Paralyzed { actor } => handler.announce_paralyzed(state, actor),
            Turn::Act { actor, options } => {
                let choice = handler.choose_action(state, actor, &options);
                if let Err(e) = session.collect_action(state, actor, choice) {
                    warn!(player = actor, error = %e, "night action refused");
                    handler.reject(&e);
                }
            }
        }
    }
    session.resolve(state)?;
    for death in state.night_log.iter().filter(|entry| entry.is_death()) {
        info!(entry = %death, "night death");
    }
    handler.announce_night_log(state, &state.night_log);
    Ok(())
}

/// Runs the discussion and the elimination vote of one day. Does not check for a winner.
///
/// # Errors
///
/// Fails if the game is not in the day phase.
pub fn play_day<H: Handler>(handler: &mut H, state: &mut GameState) -> Result<(), Error> {
    if state.phase != Phase::Day {
        return Err(InvalidAction::WrongPhase { expected: Phase::Day, found: state.phase }.into());
    }
    let silenced = state.silenced_today();
    handler.announce_day(state, &silenced);
    if !state.skip_discussion {
        handler.discussion(state, &silenced);
    }
    let elimination = loop {
        let target = match handler.choose_elimination(state) {
            Some(target) => target,
            None => {
                info!(day = state.day, "no elimination");
                return Ok(());
            }
        };
        match state.cast_vote(target) {
            Ok(elimination) => break elimination,
            Err(e) => handler.reject(&e)
        }
    };
    handler.announce_elimination(state, &elimination);
    if elimination.revenge_owed {
        while let Some(target) = handler.choose_revenge_target(state, elimination.number) {
            match state.take_revenge(elimination.number, target) {
                Ok(()) => {
                    if let Some(entry) = state.night_log.last() {
                        handler.announce_night_log(state, std::slice::from_ref(entry));
                    }
                    break;
                }
                Err(e) => handler.reject(&e)
            }
        }
    }
    Ok(())
}

/// Moderates a game from its current phase until a side wins, saving at every phase boundary.
///
/// The state may be a fresh lobby or a resumed save. A night that was interrupted is replayed from its first turn.
///
/// Save failures are logged and do not stop the game.
///
/// # Errors
///
/// Fails with `NoActiveGame` if the state claims the game is over but records no winner.
pub fn run<H: Handler, S: Storage + ?Sized>(handler: &mut H, storage: &S, mut state: GameState) -> Result<Outcome, Error> {
    handler.announce_game(&state);
    loop {
        match state.phase {
            Phase::Night => {
                persist(storage, &state);
                play_night(handler, &mut state)?;
                if let verdict @ Verdict::Winner(_) = win::evaluate_after_night(&state) {
                    state.apply_verdict(verdict);
                }
                persist(storage, &state);
            }
            Phase::Day => {
                play_day(handler, &mut state)?;
                state.conclude_day();
                persist(storage, &state);
            }
            Phase::GameOver => {
                let outcome = state.outcome.ok_or(Error::NoActiveGame)?;
                handler.announce_outcome(&state, &outcome);
                return Ok(outcome);
            }
        }
    }
}
