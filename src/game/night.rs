//! Night action collection.
//!
//! A `NightSession` walks the table in turn order, one player at a time. Each eligible player either submits one
//! skill use or a skip. The session is an explicit value owned by the caller for the duration of one night.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, InvalidAction, InvalidTarget},
    game::{
        log::LogEntry,
        resolve,
        state::{GameState, Phase, Player},
        PlayerNumber,
        Role,
        Skill,
        SkillKind
    }
};

/// One submission for the night: a skill use, or an explicit skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    /// The acting player.
    pub actor: PlayerNumber,
    /// The actor's role when the action was submitted.
    pub role: Role,
    /// The skill used, or `None` for a skip.
    pub skill: Option<SkillKind>,
    /// The target, for skills that need one.
    pub target: Option<PlayerNumber>
}

impl NightAction {
    /// A skill use.
    pub fn new(actor: PlayerNumber, role: Role, skill: SkillKind, target: Option<PlayerNumber>) -> NightAction {
        NightAction { actor, role, skill: Some(skill), target }
    }

    /// An explicit skip.
    pub fn skip(actor: PlayerNumber, role: Role) -> NightAction {
        NightAction { actor, role, skill: None, target: None }
    }
}

/// What a player chose to do with their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillChoice {
    /// Do nothing tonight.
    Skip,
    /// Use a skill, on a target if the skill needs one.
    Use {
        /// The chosen skill.
        skill: SkillKind,
        /// The chosen target.
        target: Option<PlayerNumber>
    }
}

/// A skill as offered on a player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillOption {
    /// The skill template.
    pub skill: &'static Skill,
    /// Nights left before the skill can be used again.
    pub cooldown: u32
}

impl SkillOption {
    /// Whether the skill can be picked tonight.
    pub fn available(&self) -> bool {
        self.cooldown == 0
    }
}

/// The skills a player may pick from, with their cooldowns.
pub fn skill_options(player: &Player) -> Vec<SkillOption> {
    player.role().skills().iter()
        .map(|skill| SkillOption { skill, cooldown: player.cooldown(skill.kind) })
        .collect()
}

/// The next thing the collector needs from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// `actor` must choose a skill or skip.
    Act {
        /// The player whose turn it is.
        actor: PlayerNumber,
        /// The skills on offer.
        options: Vec<SkillOption>
    },
    /// `actor` is paralyzed. The turn has already been recorded as skipped.
    Paralyzed {
        /// The paralyzed player.
        actor: PlayerNumber
    }
}

/// How a visited player's turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRecord {
    /// Submitted a skill use.
    Acted(PlayerNumber),
    /// Submitted a skip, voluntarily or forced.
    Skipped(PlayerNumber),
    /// Could not act because of paralysis.
    Paralyzed(PlayerNumber)
}

impl TurnRecord {
    /// The player this record is about.
    pub fn actor(&self) -> PlayerNumber {
        match *self {
            TurnRecord::Acted(actor) | TurnRecord::Skipped(actor) | TurnRecord::Paralyzed(actor) => actor
        }
    }
}

/// The order in which players are visited at night.
///
/// The paralysis-inducer goes first, then the other creatures, then the humans. Ties go to the lower seat number.
pub fn turn_order(state: &GameState) -> Vec<PlayerNumber> {
    let mut players = state.players().iter().collect::<Vec<_>>();
    players.sort_by_key(|player| {
        let group = if player.role().is_disruptor() {
            0
        } else if player.role().is_creature() {
            1
        } else {
            2
        };
        (group, player.number())
    });
    players.into_iter().map(Player::number).collect()
}

/// Checks whether `actor` may use `skill` on `target`.
///
/// The target must be alive. Only roles that may target themselves can pick their own seat, and the guardian may not
/// protect anyone it has protected before.
pub fn check_target(state: &GameState, actor: &Player, skill: &Skill, target: PlayerNumber) -> Result<(), InvalidTarget> {
    let candidate = state.player(target).ok_or(InvalidTarget::NoSuchPlayer(target))?;
    if !candidate.alive {
        return Err(InvalidTarget::Dead(target));
    }
    if candidate.number() == actor.number() && !actor.role().can_target_self() {
        return Err(InvalidTarget::SelfTarget);
    }
    if actor.role().is_guardian() && skill.kind == SkillKind::Protect && actor.guarded.contains(&target) {
        return Err(InvalidTarget::AlreadyProtected(target));
    }
    Ok(())
}

/// All players `actor` may pick as the target of `skill`, by seat number.
pub fn candidates(state: &GameState, actor: &Player, skill: &Skill) -> Vec<PlayerNumber> {
    let mut numbers = state.players().iter()
        .map(Player::number)
        .filter(|&number| check_target(state, actor, skill, number).is_ok())
        .collect::<Vec<_>>();
    numbers.sort_unstable();
    numbers
}

/// The collector for one night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightSession {
    order: Vec<PlayerNumber>,
    cursor: usize,
    pending: Option<PlayerNumber>,
    records: Vec<TurnRecord>
}

impl NightSession {
    /// Opens the night: fixes the turn order and discards any half-collected actions.
    pub fn begin(state: &mut GameState) -> NightSession {
        state.night_actions.clear();
        let order = turn_order(state);
        debug!(night = state.day, ?order, "night begins");
        NightSession {
            order,
            cursor: 0,
            pending: None,
            records: Vec::default()
        }
    }

    /// How each visited turn ended, in visiting order.
    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    /// The player currently expected to submit an action.
    pub fn pending(&self) -> Option<PlayerNumber> {
        self.pending
    }

    /// Returns `true` once every player has been visited.
    pub fn is_complete(&self) -> bool {
        self.pending.is_none() && self.cursor >= self.order.len()
    }

    /// Moves to the next player who can act and returns their turn, or `None` once the night is fully collected.
    ///
    /// Dead players and players without skills are passed over silently. Paralyzed players are recorded as skipped
    /// and returned once so the table can be told.
    pub fn next_turn(&mut self, state: &GameState) -> Option<Turn> {
        if let Some(actor) = self.pending {
            let options = state.player(actor).map(skill_options).unwrap_or_default();
            return Some(Turn::Act { actor, options });
        }
        while let Some(&number) = self.order.get(self.cursor) {
            self.cursor += 1;
            let player = match state.player(number) {
                Some(player) if player.has_night_turn() => player,
                _ => continue
            };
            if player.paralyzed {
                debug!(player = number, "paralyzed, turn skipped");
                self.records.push(TurnRecord::Paralyzed(number));
                return Some(Turn::Paralyzed { actor: number });
            }
            self.pending = Some(number);
            return Some(Turn::Act { actor: number, options: skill_options(player) });
        }
        None
    }

    /// Submits the current player's choice.
    ///
    /// A paralysis takes effect on its target right away so the target's own turn is lost. Every other skill is only
    /// queued; its cooldown starts immediately.
    ///
    /// # Errors
    ///
    /// * `InvalidTarget` leaves everything unchanged. The same player is still expected to choose.
    /// * `InvalidAction::Paralyzed` and `InvalidAction::OnCooldown` force a skip for the player and end the turn.
    /// * Other `InvalidAction`s leave everything unchanged.
    pub fn collect_action(&mut self, state: &mut GameState, actor: PlayerNumber, choice: SkillChoice) -> Result<(), Error> {
        if state.phase != Phase::Night {
            return Err(InvalidAction::WrongPhase { expected: Phase::Night, found: state.phase }.into());
        }
        if self.pending != Some(actor) {
            return Err(if self.records.iter().any(|record| record.actor() == actor) {
                InvalidAction::AlreadyActed(actor)
            } else {
                InvalidAction::NotYourTurn(actor)
            }.into());
        }
        let player = state.player(actor).ok_or(InvalidTarget::NoSuchPlayer(actor))?;
        let role = player.role();
        let (kind, target) = match choice {
            SkillChoice::Skip => {
                self.force_skip(state, actor, role);
                return Ok(());
            }
            SkillChoice::Use { skill, target } => (skill, target)
        };
        let skill = role.skill(kind).ok_or(InvalidAction::UnknownSkill { role, skill: kind })?;
        if player.paralyzed {
            self.force_skip(state, actor, role);
            return Err(InvalidAction::Paralyzed(actor).into());
        }
        if !player.can_use(skill) {
            let remaining = player.cooldown(kind);
            self.force_skip(state, actor, role);
            return Err(InvalidAction::OnCooldown { skill: kind, remaining }.into());
        }
        let target = if skill.needs_target {
            let target = target.ok_or(InvalidTarget::Missing)?;
            check_target(state, player, skill, target)?;
            Some(target)
        } else {
            None
        };
        if let Some(player) = state.player_mut(actor) {
            player.cooldowns.insert(kind, skill.cooldown);
            if let (true, SkillKind::Protect, Some(target)) = (role.is_guardian(), kind, target) {
                player.guarded.insert(target);
            }
        }
        if let (SkillKind::Paralyze, Some(target)) = (kind, target) {
            if let Some(victim) = state.player_mut(target) {
                victim.paralyzed = true;
            }
        }
        debug!(player = actor, %role, skill = %kind, ?target, "action collected");
        state.night_actions.push(NightAction::new(actor, role, kind, target));
        self.records.push(TurnRecord::Acted(actor));
        self.pending = None;
        Ok(())
    }

    /// Ends the night and resolves everything that was collected.
    ///
    /// # Errors
    ///
    /// Fails if the night has already been resolved.
    pub fn resolve(self, state: &mut GameState) -> Result<&[LogEntry], Error> {
        resolve::resolve_night(state)
    }

    fn force_skip(&mut self, state: &mut GameState, actor: PlayerNumber, role: Role) {
        debug!(player = actor, "skipped");
        state.night_actions.push(NightAction::skip(actor, role));
        self.records.push(TurnRecord::Skipped(actor));
        self.pending = None;
    }
}
