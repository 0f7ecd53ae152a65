use crate::{
    error::Error,
    game::{
        log::LogEntry,
        night::{self, SkillChoice, SkillOption},
        state::{Elimination, GameState},
        win::Outcome,
        PlayerNumber
    },
    handler::Handler,
    util
};

/// A game handler which uses the command line. Players take turns at the same terminal.
#[derive(Debug, Default)]
pub struct CliHandler;

fn parse_player(answer: &str) -> Option<PlayerNumber> {
    answer.trim().trim_start_matches(|c: char| !c.is_ascii_digit()).parse().ok()
}

/// Reads an optional seat choice. Blank means no choice. An unparsable answer becomes seat 0, which the game refuses,
/// so the question is asked again.
fn parse_choice(answer: &str) -> Option<PlayerNumber> {
    if answer.trim().is_empty() {
        None
    } else {
        Some(parse_player(answer).unwrap_or(0))
    }
}

fn roster(state: &GameState) -> String {
    state.alive().map(|player| player.number().to_string()).collect::<Vec<_>>().join(", ")
}

impl Handler for CliHandler {
    fn announce_game(&mut self, state: &GameState) {
        println!("[ ** ] {} players, the creatures win if they survive day {}", state.players().len(), state.max_days);
    }

    fn announce_night(&mut self, state: &GameState) {
        println!("[ ** ] night {} falls", state.day);
    }

    fn announce_paralyzed(&mut self, _: &GameState, actor: PlayerNumber) {
        println!("[ ** ] Player {} is paralyzed and cannot act tonight", actor);
    }

    fn choose_action(&mut self, state: &GameState, actor: PlayerNumber, options: &[SkillOption]) -> SkillChoice {
        let player = match state.player(actor) {
            Some(player) => player,
            None => return SkillChoice::Skip
        };
        println!("[ __ ] @{}: you are {}", player.name, player.role());
        if player.charms > 0 {
            println!("[ __ ] @{}: you hold {} anting-anting", player.name, player.charms);
        }
        for (idx, option) in options.iter().enumerate() {
            if option.available() {
                println!("[ __ ] {}. {}", idx + 1, option.skill);
            } else {
                println!("[ __ ] {}. {} (cooldown: {})", idx + 1, option.skill, option.cooldown);
            }
        }
        let option = loop {
            let answer = match util::input(&format!("@{}: skill number [leave blank to skip]", player.name)) {
                Some(answer) => answer,
                None => return SkillChoice::Skip
            };
            if answer.trim().is_empty() {
                return SkillChoice::Skip;
            }
            match answer.trim().parse::<usize>().ok().and_then(|idx| idx.checked_sub(1)).and_then(|idx| options.get(idx)) {
                Some(option) => break option,
                None => println!("[ !! ] no such skill")
            }
        };
        if !option.skill.needs_target {
            return SkillChoice::Use { skill: option.skill.kind, target: None };
        }
        let candidates = night::candidates(state, player, option.skill)
            .into_iter()
            .map(|number| number.to_string())
            .collect::<Vec<_>>();
        println!("[ __ ] targets: {}", candidates.join(", "));
        let target = util::input(&format!("@{}: target player", player.name)).as_deref().and_then(parse_player);
        SkillChoice::Use { skill: option.skill.kind, target }
    }

    fn reject(&mut self, error: &Error) {
        println!("[ !! ] {}", error);
    }

    fn announce_night_log(&mut self, _: &GameState, log: &[LogEntry]) {
        for entry in log {
            println!("[ ** ] {}", entry);
        }
    }

    fn announce_day(&mut self, state: &GameState, silenced: &[PlayerNumber]) {
        println!("[ ** ] day {} of {} dawns, alive: {}", state.day, state.max_days, roster(state));
        for number in silenced {
            println!("[ ** ] Player {} is silenced today", number);
        }
        if state.skip_discussion {
            println!("[ ** ] the bell has rung: straight to the vote");
        }
    }

    fn discussion(&mut self, _: &GameState, _: &[PlayerNumber]) {
        let _ = util::input("discuss, then press enter to vote");
    }

    fn choose_elimination(&mut self, _: &GameState) -> Option<PlayerNumber> {
        util::input("player to eliminate [leave blank for no elimination]").as_deref().and_then(parse_choice)
    }

    fn announce_elimination(&mut self, _: &GameState, elimination: &Elimination) {
        println!("[ ** ] Player {} was eliminated and was {}", elimination.number, elimination.role);
    }

    fn choose_revenge_target(&mut self, state: &GameState, source: PlayerNumber) -> Option<PlayerNumber> {
        println!("[ ** ] Player {} takes someone with them. Alive: {}", source, roster(state));
        util::input("player to drag down [leave blank to forgo]").as_deref().and_then(parse_choice)
    }

    fn announce_outcome(&mut self, _: &GameState, outcome: &Outcome) {
        println!("[ ** ] {}", outcome);
    }
}
