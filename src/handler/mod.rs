//! Contains the `Handler` trait, which is what the game uses to talk to the table, and a command-line implementation.

mod cli;

use crate::{
    error::Error,
    game::{
        log::LogEntry,
        night::{SkillChoice, SkillOption},
        state::{Elimination, GameState},
        win::Outcome,
        PlayerNumber
    }
};
pub use self::cli::CliHandler;

/// The game uses this trait to present each phase and to ask for decisions.
///
/// Announcements default to doing nothing. Decisions have to be implemented.
pub trait Handler {
    /// Called once when a game starts or is resumed.
    fn announce_game(&mut self, _: &GameState) {}

    /// Called when a night begins, before the first turn.
    fn announce_night(&mut self, _: &GameState) {}

    /// Called when a player loses their turn to paralysis.
    fn announce_paralyzed(&mut self, _: &GameState, _: PlayerNumber) {}

    /// Asks `actor` what to do tonight.
    ///
    /// `options` lists the actor's skills, including ones still on cooldown. If the choice is refused with an invalid
    /// target, `reject` is called and the same player is asked again.
    fn choose_action(&mut self, state: &GameState, actor: PlayerNumber, options: &[SkillOption]) -> SkillChoice;

    /// Called when a choice, vote or revenge target was refused.
    fn reject(&mut self, _: &Error) {}

    /// Called with the log of the night that was just resolved.
    fn announce_night_log(&mut self, _: &GameState, _: &[LogEntry]) {}

    /// Called at the start of the day with the players who may not speak.
    fn announce_day(&mut self, _: &GameState, _: &[PlayerNumber]) {}

    /// Runs the open discussion. Not called when the discussion is skipped.
    ///
    /// Returning ends the discussion and moves on to the vote.
    fn discussion(&mut self, _: &GameState, _: &[PlayerNumber]) {}

    /// Asks the village whom to eliminate. `None` stands for no elimination today.
    fn choose_elimination(&mut self, state: &GameState) -> Option<PlayerNumber>;

    /// Called after a player has been voted out. Their role is revealed.
    fn announce_elimination(&mut self, _: &GameState, _: &Elimination) {}

    /// Asks the game master whom the eliminated drag-down role takes with them. `None` forgoes the revenge.
    fn choose_revenge_target(&mut self, state: &GameState, source: PlayerNumber) -> Option<PlayerNumber>;

    /// Called when the game has been won.
    fn announce_outcome(&mut self, _: &GameState, _: &Outcome) {}
}
