use std::collections::HashMap;

use aswang::{
    error::{InvalidAction, InvalidTarget},
    game::{
        log::LogKind,
        night::{NightAction, NightSession, SkillChoice, SkillOption, Turn},
        state::{GameState, Phase, Player},
        win::{evaluate_win, Outcome, Verdict, WinReason},
        PlayerNumber,
        Role,
        Side,
        SkillKind
    },
    handler::Handler,
    resolve_night,
    run,
    storage::{MemoryStorage, Storage},
    Error
};

fn table(roles: &[Role], max_days: u32) -> GameState {
    let players = roles.iter().enumerate().map(|(i, &role)| Player::new(i as PlayerNumber + 1, role)).collect();
    GameState::new(players, max_days)
}

fn queue(state: &mut GameState, actor: PlayerNumber, skill: SkillKind, target: Option<PlayerNumber>) {
    let role = state.player(actor).unwrap().role();
    state.night_actions.push(NightAction::new(actor, role, skill, target));
}

fn kinds(state: &GameState) -> Vec<LogKind> {
    state.night_log.iter().map(|entry| entry.kind).collect()
}

/// Plays back prepared decisions. Anything not scripted is a skip, a non-vote, or a forgone revenge.
#[derive(Debug, Default)]
struct Script {
    actions: HashMap<(u32, PlayerNumber), SkillChoice>,
    votes: HashMap<u32, PlayerNumber>,
    revenge: Vec<PlayerNumber>,
    rejected: Vec<String>,
    paralyzed: Vec<PlayerNumber>,
    announced: Option<Outcome>
}

impl Script {
    fn act(mut self, night: u32, actor: PlayerNumber, skill: SkillKind, target: Option<PlayerNumber>) -> Script {
        self.actions.insert((night, actor), SkillChoice::Use { skill, target });
        self
    }

    fn vote(mut self, day: u32, target: PlayerNumber) -> Script {
        self.votes.insert(day, target);
        self
    }
}

impl Handler for Script {
    fn announce_paralyzed(&mut self, _: &GameState, actor: PlayerNumber) {
        self.paralyzed.push(actor);
    }

    fn choose_action(&mut self, state: &GameState, actor: PlayerNumber, _: &[SkillOption]) -> SkillChoice {
        self.actions.remove(&(state.day, actor)).unwrap_or(SkillChoice::Skip)
    }

    fn reject(&mut self, error: &Error) {
        self.rejected.push(error.to_string());
    }

    fn choose_elimination(&mut self, state: &GameState) -> Option<PlayerNumber> {
        self.votes.remove(&state.day)
    }

    fn choose_revenge_target(&mut self, _: &GameState, _: PlayerNumber) -> Option<PlayerNumber> {
        if self.revenge.is_empty() {
            None
        } else {
            Some(self.revenge.remove(0))
        }
    }

    fn announce_outcome(&mut self, _: &GameState, outcome: &Outcome) {
        self.announced = Some(*outcome);
    }
}

#[test]
fn sole_creature_voted_out_on_day_one() {
    let state = table(&[Role::Tagabaryo, Role::Aswang, Role::Bagani, Role::Babaylan, Role::Tagabaryo, Role::Tagabaryo], 6);
    let storage = MemoryStorage::new();
    let mut script = Script::default().vote(1, 2);
    let outcome = run(&mut script, &storage, state).unwrap();
    assert_eq!(outcome, Outcome { winner: Side::Humans, reason: WinReason::CreaturesEliminated });
    assert_eq!(script.announced, Some(outcome));
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.day, 1);
    assert_eq!(saved.phase, Phase::GameOver);
    assert_eq!(saved.outcome, Some(outcome));
}

#[test]
fn creatures_survive_to_the_last_day_while_outnumbered() {
    let state = table(&[Role::Aswang, Role::Bagani, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 3);
    let mut script = Script::default().vote(1, 3).vote(2, 4);
    let outcome = run(&mut script, &MemoryStorage::new(), state).unwrap();
    assert_eq!(outcome, Outcome { winner: Side::Creatures, reason: WinReason::SurvivedDays(3) });
}

#[test]
fn charm_holder_survives_the_attack() {
    let mut state = table(&[Role::Aswang, Role::Tagabaryo, Role::Tagabaryo, Role::Bagani], 4);
    state.player_mut(3).unwrap().charms = 1;
    queue(&mut state, 1, SkillKind::Kill, Some(3));
    resolve_night(&mut state).unwrap();
    assert_eq!(kinds(&state), vec![LogKind::CharmBlock]);
    let holder = state.player(3).unwrap();
    assert!(holder.alive);
    assert_eq!(holder.charms, 0);
    assert!(!state.night_log.iter().any(|entry| entry.is_death() && entry.target == Some(3)));
}

#[test]
fn killing_the_tiyanak_takes_the_killer_along() {
    let mut state = table(&[Role::Aswang, Role::Tiyanak, Role::Manunugis, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    let mut script = Script::default().act(1, 3, SkillKind::Kill, Some(2));
    let storage = MemoryStorage::new();
    aswang::game::play_night(&mut script, &mut state).unwrap();
    assert!(!state.is_alive(2) && !state.is_alive(3));
    assert_eq!(state.night_log.iter().filter(|entry| entry.kind == LogKind::Revenge).count(), 1);
    assert_eq!(kinds(&state), vec![LogKind::Kill, LogKind::Revenge]);
    storage.save(&state).unwrap();
    assert_eq!(storage.load().unwrap(), Some(state));
}

#[test]
fn lockdown_stops_two_killers() {
    let mut state = table(&[Role::Aswang, Role::Manananggal, Role::Kapitan, Role::Tagabaryo, Role::Tagabaryo, Role::Bagani, Role::Tagabaryo, Role::Tagabaryo], 8);
    queue(&mut state, 1, SkillKind::Kill, Some(4));
    queue(&mut state, 2, SkillKind::Kill, Some(5));
    queue(&mut state, 3, SkillKind::PreventKill, None);
    resolve_night(&mut state).unwrap();
    assert!(state.is_alive(4) && state.is_alive(5));
    assert_eq!(kinds(&state), vec![LogKind::Lockdown, LogKind::LockdownBlocked, LogKind::LockdownBlocked]);
}

#[test]
fn resolution_is_deterministic() {
    let mut state = table(&[
        Role::Batibat, Role::Aswang, Role::Mangkukulam, Role::Albularyo, Role::Bagani,
        Role::Babaylan, Role::MangAanting, Role::Tagabaryo, Role::Tagabaryo
    ], 9);
    state.player_mut(6).unwrap().paralyzed = true;
    queue(&mut state, 1, SkillKind::Paralyze, Some(6));
    queue(&mut state, 2, SkillKind::Kill, Some(8));
    queue(&mut state, 3, SkillKind::Curse, Some(9));
    queue(&mut state, 4, SkillKind::Cure, Some(4));
    queue(&mut state, 5, SkillKind::Protect, Some(8));
    queue(&mut state, 6, SkillKind::Investigate, Some(2));
    queue(&mut state, 7, SkillKind::GrantCharm, Some(9));
    let mut first = state.clone();
    let mut second = state;
    resolve_night(&mut first).unwrap();
    resolve_night(&mut second).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.night_log, second.night_log);
    assert!(first.is_alive(8));
    assert!(!first.is_alive(9));
}

#[test]
fn same_night_cure_lifts_the_curse() {
    let mut state = table(&[Role::Mangkukulam, Role::Albularyo, Role::Tagabaryo, Role::Tagabaryo], 4);
    queue(&mut state, 1, SkillKind::Curse, Some(3));
    queue(&mut state, 2, SkillKind::Cure, Some(3));
    resolve_night(&mut state).unwrap();
    assert!(state.is_alive(3));
    assert!(!state.player(3).unwrap().cursed);
    assert_eq!(kinds(&state), vec![LogKind::Curse, LogKind::HealCurse]);
}

#[test]
fn a_cure_on_someone_else_lets_the_curse_kill() {
    let mut state = table(&[Role::Mangkukulam, Role::Albularyo, Role::Tagabaryo, Role::Tagabaryo], 4);
    queue(&mut state, 1, SkillKind::Curse, Some(3));
    queue(&mut state, 2, SkillKind::Cure, Some(4));
    resolve_night(&mut state).unwrap();
    assert!(!state.is_alive(3));
    assert!(state.is_alive(4));
    assert_eq!(kinds(&state), vec![LogKind::Curse, LogKind::CursedDeath]);
}

#[test]
fn protection_is_spent_on_the_first_attack() {
    let mut state = table(&[Role::Aswang, Role::Manananggal, Role::Bagani, Role::Tagabaryo], 4);
    queue(&mut state, 3, SkillKind::Protect, Some(4));
    queue(&mut state, 1, SkillKind::Kill, Some(4));
    queue(&mut state, 2, SkillKind::Kill, Some(4));
    resolve_night(&mut state).unwrap();
    assert_eq!(kinds(&state), vec![LogKind::Protect, LogKind::KillBlocked, LogKind::Kill]);
    assert!(!state.is_alive(4));
}

fn next_night(state: &mut GameState) {
    state.apply_verdict(Verdict::Continue);
}

fn first_turn(session: &mut NightSession, state: &GameState) -> PlayerNumber {
    match session.next_turn(state) {
        Some(Turn::Act { actor, .. }) => actor,
        other => panic!("expected a turn, got {:?}", other)
    }
}

#[test]
fn cooldown_blocks_the_next_night_only() {
    let mut state = table(&[Role::Aswang, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 5);
    let kill = |target| SkillChoice::Use { skill: SkillKind::Kill, target: Some(target) };

    let mut session = NightSession::begin(&mut state);
    let actor = first_turn(&mut session, &state);
    session.collect_action(&mut state, actor, kill(2)).unwrap();
    session.resolve(&mut state).unwrap();
    assert!(!state.is_alive(2));
    next_night(&mut state);

    let mut session = NightSession::begin(&mut state);
    let actor = first_turn(&mut session, &state);
    assert!(matches!(
        session.collect_action(&mut state, actor, kill(3)),
        Err(Error::InvalidAction(InvalidAction::OnCooldown { skill: SkillKind::Kill, remaining: 1 }))
    ));
    assert!(session.next_turn(&state).is_none());
    session.resolve(&mut state).unwrap();
    assert!(state.is_alive(3));
    assert_eq!(kinds(&state), vec![LogKind::NoAction]);
    assert_eq!(state.player(1).unwrap().cooldown(SkillKind::Kill), 0);
    next_night(&mut state);

    let mut session = NightSession::begin(&mut state);
    let actor = first_turn(&mut session, &state);
    session.collect_action(&mut state, actor, kill(3)).unwrap();
    session.resolve(&mut state).unwrap();
    assert!(!state.is_alive(3));
}

#[test]
fn lockdown_comes_back_on_the_third_night_after() {
    let mut state = table(&[Role::Kapitan, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 5);
    let lockdown = SkillChoice::Use { skill: SkillKind::PreventKill, target: None };

    let mut session = NightSession::begin(&mut state);
    let actor = first_turn(&mut session, &state);
    session.collect_action(&mut state, actor, lockdown).unwrap();
    session.resolve(&mut state).unwrap();
    assert_eq!(kinds(&state), vec![LogKind::Lockdown]);
    next_night(&mut state);

    for remaining in [2, 1] {
        let mut session = NightSession::begin(&mut state);
        let actor = first_turn(&mut session, &state);
        assert!(matches!(
            session.collect_action(&mut state, actor, lockdown),
            Err(Error::InvalidAction(InvalidAction::OnCooldown { skill: SkillKind::PreventKill, remaining: r })) if r == remaining
        ));
        session.resolve(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::NoAction]);
        next_night(&mut state);
    }

    let mut session = NightSession::begin(&mut state);
    let actor = first_turn(&mut session, &state);
    session.collect_action(&mut state, actor, lockdown).unwrap();
    session.resolve(&mut state).unwrap();
    assert_eq!(state.day, 4);
    assert_eq!(kinds(&state), vec![LogKind::Lockdown]);
}

#[test]
fn a_played_night_cannot_be_played_again() {
    let mut state = table(&[Role::Aswang, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    let mut script = Script::default().act(1, 1, SkillKind::Kill, Some(2));
    aswang::game::play_night(&mut script, &mut state).unwrap();
    let after = state.clone();
    let mut again = Script::default().act(1, 1, SkillKind::Kill, Some(3));
    assert!(matches!(
        aswang::game::play_night(&mut again, &mut state),
        Err(Error::InvalidAction(InvalidAction::WrongPhase { expected: Phase::Night, found: Phase::Day }))
    ));
    assert_eq!(state, after);
    assert!(state.is_alive(3));
}

#[test]
fn bad_targets_are_asked_again() {
    let mut state = table(&[Role::Aswang, Role::Bagani, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    let mut script = Script::default().act(1, 2, SkillKind::Protect, Some(2));
    aswang::game::play_night(&mut script, &mut state).unwrap();
    assert_eq!(script.rejected, vec![Error::from(InvalidTarget::SelfTarget).to_string()]);
    assert_eq!(kinds(&state), vec![LogKind::NoAction]);
}

#[test]
fn haunted_player_loses_the_turn() {
    let mut state = table(&[Role::Aswang, Role::Batibat, Role::Babaylan, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    let mut script = Script::default()
        .act(1, 2, SkillKind::Paralyze, Some(1))
        .act(1, 1, SkillKind::Kill, Some(3));
    aswang::game::play_night(&mut script, &mut state).unwrap();
    assert_eq!(script.paralyzed, vec![1]);
    assert!(state.is_alive(3));
    assert_eq!(kinds(&state), vec![LogKind::Haunt]);
}

#[test]
fn voted_out_tiyanak_drags_down_the_last_creature() {
    let state = table(&[Role::Tiyanak, Role::Aswang, Role::Bagani, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    let mut script = Script::default().vote(1, 1);
    script.revenge = vec![2];
    let outcome = run(&mut script, &MemoryStorage::new(), state).unwrap();
    assert_eq!(outcome.winner, Side::Humans);
}

#[test]
fn bad_revenge_target_is_asked_again_and_revenge_is_taken_once() {
    let mut state = table(&[Role::Tiyanak, Role::Aswang, Role::Bagani, Role::Tagabaryo, Role::Tagabaryo, Role::Tagabaryo], 6);
    state.phase = Phase::Day;
    let mut script = Script::default().vote(1, 1);
    script.revenge = vec![0, 4, 5];
    aswang::game::play_day(&mut script, &mut state).unwrap();
    assert_eq!(script.rejected, vec![Error::from(InvalidTarget::NoSuchPlayer(0)).to_string()]);
    assert_eq!(script.revenge, vec![5]);
    assert!(!state.is_alive(4));
    assert!(state.is_alive(5));
    assert!(matches!(
        state.take_revenge(1, 5),
        Err(Error::InvalidAction(InvalidAction::NoRevengeOwed(1)))
    ));
}

#[test]
fn outnumbered_after_a_night_ends_before_the_day() {
    let mut state = table(&[Role::Aswang, Role::Manananggal, Role::Tagabaryo, Role::Tagabaryo], 4);
    state.player_mut(4).unwrap().alive = false;
    let mut script = Script::default().act(1, 1, SkillKind::Kill, Some(3));
    let storage = MemoryStorage::new();
    let outcome = run(&mut script, &storage, state).unwrap();
    assert_eq!(outcome, Outcome { winner: Side::Creatures, reason: WinReason::Outnumbered });
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.day, 1);
    assert_eq!(evaluate_win(&saved), Verdict::Winner(outcome));
}
