//! Game state representation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{InvalidAction, InvalidTarget},
    game::{
        log::{ActorRef, LogEntry, LogKind},
        night::NightAction,
        win::Outcome,
        Faction,
        PlayerNumber,
        Role,
        Skill,
        SkillKind
    }
};

/// Which screen of the game cycle the state is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Night actions are being collected, or are about to be resolved.
    Night,
    /// The night has been resolved. The village discusses and votes.
    Day,
    /// A side has won.
    GameOver
}

/// One seat at the table, together with everything that happens to it over the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    number: PlayerNumber,
    /// Display name, `Player {number}` by default.
    pub name: String,
    role: Role,
    /// Dead players never act, are not valid targets, and are not counted for win conditions.
    pub alive: bool,
    /// Dies at the end of the night unless cured first.
    pub cursed: bool,
    /// Cannot speak during the coming discussion.
    pub silenced: bool,
    /// Cannot act for the rest of the night.
    pub paralyzed: bool,
    /// Blocks the next kill this night.
    pub protected: bool,
    /// The role that granted `protected`.
    pub protected_by: Option<Role>,
    /// Set by a cancel-all effect. Every action of this player is dropped for the night.
    pub ability_cancelled: bool,
    /// Investigations and observations targeting this player fail.
    pub immune_to_investigation: bool,
    /// Investigations and reveals targeting this player fail.
    pub immune_to_reveal: bool,
    /// Anting-anting charms. Each one blocks a single kill and is then spent.
    pub charms: u32,
    /// Remaining nights before each skill can be used again. Missing entries are ready.
    pub cooldowns: BTreeMap<SkillKind, u32>,
    /// Players this guardian has already protected. Never cleared during a game.
    pub guarded: BTreeSet<PlayerNumber>
}

impl Player {
    /// Creates a living player with no status effects.
    ///
    /// Roles with innate immunity start immune to investigations and reveals.
    pub fn new(number: PlayerNumber, role: Role) -> Player {
        Player {
            number,
            name: format!("Player {}", number),
            role,
            alive: true,
            cursed: false,
            silenced: false,
            paralyzed: false,
            protected: false,
            protected_by: None,
            ability_cancelled: false,
            immune_to_investigation: role.innately_immune(),
            immune_to_reveal: role.innately_immune(),
            charms: 0,
            cooldowns: BTreeMap::default(),
            guarded: BTreeSet::default()
        }
    }

    /// The player's seat number.
    pub fn number(&self) -> PlayerNumber {
        self.number
    }

    /// The player's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The player's faction, derived from the role.
    pub fn faction(&self) -> Faction {
        self.role.faction()
    }

    /// Nights left before `kind` can be used again.
    pub fn cooldown(&self, kind: SkillKind) -> u32 {
        self.cooldowns.get(&kind).copied().unwrap_or(0)
    }

    /// Whether `skill` is off cooldown for this player.
    pub fn can_use(&self, skill: &Skill) -> bool {
        self.cooldown(skill.kind) == 0
    }

    /// Whether this player gets a turn at night: alive and holding at least one skill.
    pub fn has_night_turn(&self) -> bool {
        self.alive && self.role.has_night_turn()
    }
}

/// The result of a successful elimination vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    /// The eliminated player.
    pub number: PlayerNumber,
    /// Their role, which is revealed to the table.
    pub role: Role,
    /// The eliminated player drags someone down with them. See `GameState::take_revenge`.
    pub revenge_owed: bool
}

/// The aggregate state of one game, from lobby creation until a new game is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    players: Vec<Player>,
    /// The current day. The night before day `n` is night `n`.
    pub day: u32,
    /// When day `max_days` ends with a creature alive, the creatures win.
    pub max_days: u32,
    /// Current phase.
    pub phase: Phase,
    /// Actions collected for the night in progress.
    pub night_actions: Vec<NightAction>,
    /// What happened during the last night, in resolution order.
    pub night_log: Vec<LogEntry>,
    /// The coming day goes straight to the vote.
    pub skip_discussion: bool,
    /// A drag-down role voted out today that has not yet taken its revenge. Cleared when the day ends.
    #[serde(default)]
    pub pending_revenge: Option<PlayerNumber>,
    /// Set once a side has won.
    pub outcome: Option<Outcome>
}

impl GameState {
    /// Starts a game at night 1 with the given players, in display order.
    pub fn new(players: Vec<Player>, max_days: u32) -> GameState {
        GameState {
            players,
            day: 1,
            max_days,
            phase: Phase::Night,
            night_actions: Vec::default(),
            night_log: Vec::default(),
            skip_discussion: false,
            pending_revenge: None,
            outcome: None
        }
    }

    /// All players in display order, dead or alive.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by seat number.
    pub fn player(&self, number: PlayerNumber) -> Option<&Player> {
        self.players.iter().find(|player| player.number == number)
    }

    /// Looks up a player by seat number for mutation.
    pub fn player_mut(&mut self, number: PlayerNumber) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.number == number)
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Living players in display order.
    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|player| player.alive)
    }

    /// Whether `number` is a living player.
    pub fn is_alive(&self, number: PlayerNumber) -> bool {
        self.player(number).map_or(false, |player| player.alive)
    }

    /// Living players silenced for today's discussion, derived from last night's log.
    pub fn silenced_today(&self) -> Vec<PlayerNumber> {
        let mut silenced = BTreeSet::default();
        for entry in &self.night_log {
            match (entry.kind, entry.target) {
                (LogKind::Silence, Some(target)) => { silenced.insert(target); }
                (LogKind::HealSilence, Some(target)) => { silenced.remove(&target); }
                _ => {}
            }
        }
        silenced.into_iter().filter(|&number| self.is_alive(number)).collect()
    }

    /// Eliminates a living player by vote.
    ///
    /// # Errors
    ///
    /// Fails without changing the state if it is not day, or if the target is missing or already dead.
    pub fn cast_vote(&mut self, target: PlayerNumber) -> Result<Elimination, crate::Error> {
        if self.phase != Phase::Day {
            return Err(InvalidAction::WrongPhase { expected: Phase::Day, found: self.phase }.into());
        }
        let player = self.player_mut(target).ok_or(InvalidTarget::NoSuchPlayer(target))?;
        if !player.alive {
            return Err(InvalidTarget::Dead(target).into());
        }
        player.alive = false;
        info!(player = target, role = %player.role, "eliminated by vote");
        let elimination = Elimination {
            number: target,
            role: player.role,
            revenge_owed: player.role.drags_down_killer()
        };
        self.pending_revenge = if elimination.revenge_owed { Some(target) } else { None };
        Ok(elimination)
    }

    /// Lets a drag-down role that was just voted out kill one living player. The revenge can be taken once.
    ///
    /// # Errors
    ///
    /// Fails if `source` was not voted out today as a drag-down role, or has already taken its revenge. Fails without
    /// spending the revenge if `target` is not a living player.
    pub fn take_revenge(&mut self, source: PlayerNumber, target: PlayerNumber) -> Result<(), crate::Error> {
        if self.pending_revenge != Some(source) {
            return Err(InvalidAction::NoRevengeOwed(source).into());
        }
        let role = self.player(source).ok_or(InvalidAction::NoRevengeOwed(source))?.role;
        let victim = self.player_mut(target).ok_or(InvalidTarget::NoSuchPlayer(target))?;
        if !victim.alive {
            return Err(InvalidTarget::Dead(target).into());
        }
        victim.alive = false;
        self.pending_revenge = None;
        info!(player = target, source, "killed by dying revenge");
        self.night_log.push(LogEntry {
            kind: LogKind::RevengeVote,
            actor: Some(ActorRef { number: source, role }),
            target: Some(target),
            result: None
        });
        Ok(())
    }
}
