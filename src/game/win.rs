//! Win conditions.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::{
    state::{GameState, Phase},
    Faction,
    Side
};

/// Living players per faction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    /// Living creatures.
    pub creatures: usize,
    /// Living humans with abilities.
    pub ability_humans: usize,
    /// Living villagers.
    pub villagers: usize
}

impl Census {
    /// Counts the living players of `state`.
    pub fn of(state: &GameState) -> Census {
        state.alive().fold(Census::default(), |mut census, player| {
            match player.faction() {
                Faction::Creature => census.creatures += 1,
                Faction::AbilityHuman => census.ability_humans += 1,
                Faction::Villager => census.villagers += 1
            }
            census
        })
    }

    /// Living players on the humans' side.
    pub fn humans(&self) -> usize {
        self.ability_humans + self.villagers
    }
}

/// Why a side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// No creature is left alive.
    CreaturesEliminated,
    /// The creatures survived until the end of the given day.
    SurvivedDays(u32),
    /// Creatures outnumber everyone else.
    Outnumbered
}

/// The end of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The winning side.
    pub winner: Side,
    /// Why they won.
    pub reason: WinReason
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.reason {
            WinReason::CreaturesEliminated => write!(f, "Humans win! All mythical creatures have been eliminated."),
            WinReason::SurvivedDays(days) => write!(f, "Mythical creatures win! They survived {} days.", days),
            WinReason::Outnumbered => write!(f, "Mythical creatures win! They outnumber the humans.")
        }
    }
}

/// What the win check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nobody has won yet.
    Continue,
    /// The game is over.
    Winner(Outcome)
}

fn decide(state: &GameState, day_limit: bool) -> Verdict {
    let census = Census::of(state);
    let outcome = if census.creatures == 0 {
        Outcome { winner: Side::Humans, reason: WinReason::CreaturesEliminated }
    } else if day_limit && state.day >= state.max_days {
        Outcome { winner: Side::Creatures, reason: WinReason::SurvivedDays(state.day) }
    } else if census.creatures > census.humans() {
        Outcome { winner: Side::Creatures, reason: WinReason::Outnumbered }
    } else {
        return Verdict::Continue;
    };
    Verdict::Winner(outcome)
}

/// The win check run after the day's vote. The first matching rule wins:
///
/// 1. no creatures left: the humans win,
/// 2. the last day has been played with a creature alive: the creatures win,
/// 3. creatures outnumber everyone else: the creatures win.
pub fn evaluate_win(state: &GameState) -> Verdict {
    decide(state, true)
}

/// The win check run right after a night. The day limit does not apply because the day has not been played yet.
pub fn evaluate_after_night(state: &GameState) -> Verdict {
    decide(state, false)
}

impl GameState {
    /// Applies a verdict: either ends the game, or advances to the next night with an empty action list and log.
    pub fn apply_verdict(&mut self, verdict: Verdict) {
        self.pending_revenge = None;
        match verdict {
            Verdict::Continue => {
                self.day += 1;
                self.night_actions.clear();
                self.night_log.clear();
                self.phase = Phase::Night;
            }
            Verdict::Winner(outcome) => {
                info!(winner = %outcome.winner, reason = ?outcome.reason, day = self.day, "game over");
                self.outcome = Some(outcome);
                self.phase = Phase::GameOver;
            }
        }
    }

    /// Ends the day: runs the win check and applies its verdict.
    pub fn conclude_day(&mut self) -> Verdict {
        let verdict = evaluate_win(self);
        self.apply_verdict(verdict);
        verdict
    }
}
