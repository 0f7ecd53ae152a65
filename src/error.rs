//! Error types.

use thiserror::Error;

use crate::game::{state::Phase, PlayerNumber, Role, SkillKind};

/// A lobby could not be created. No state is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The player count is outside the supported range.
    #[error("unsupported player count {found} (between {min} and {max} players are supported)")]
    UnsupportedPlayerCount {
        /// The requested number of players.
        found: usize,
        /// The smallest supported game.
        min: usize,
        /// The largest supported game.
        max: usize
    },
    /// The role table asks for more distinct roles than the deck holds.
    #[error("not enough {0} roles in the deck")]
    DeckExhausted(&'static str),
    /// More roles were requested than there are seats.
    #[error("{roles} roles requested for {players} players")]
    TooManyRoles {
        /// The number of requested roles.
        roles: usize,
        /// The number of seats.
        players: usize
    },
    /// A role other than the Tagabaryo was requested twice.
    #[error("the {0} can only be dealt once")]
    DuplicateRole(Role)
}

/// A role name was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// A target was refused. The state is unchanged and the player should pick again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTarget {
    /// The skill needs a target but none was given.
    #[error("this skill needs a target")]
    Missing,
    /// There is no player with this number.
    #[error("there is no player {0}")]
    NoSuchPlayer(PlayerNumber),
    /// The target is dead.
    #[error("player {0} is dead")]
    Dead(PlayerNumber),
    /// The role may not target itself.
    #[error("this role cannot target itself")]
    SelfTarget,
    /// The guardian already protected this player earlier in the game.
    #[error("player {0} has already been protected by this guardian")]
    AlreadyProtected(PlayerNumber)
}

/// An action was refused. During night collection the turn is forced to a skip where it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// It is somebody else's turn.
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerNumber),
    /// The player already acted this night.
    #[error("player {0} already acted tonight")]
    AlreadyActed(PlayerNumber),
    /// The player is paralyzed.
    #[error("player {0} is paralyzed and cannot act tonight")]
    Paralyzed(PlayerNumber),
    /// The skill is still cooling down.
    #[error("{skill} is on cooldown for {remaining} more night(s)")]
    OnCooldown {
        /// The requested skill.
        skill: SkillKind,
        /// Nights left.
        remaining: u32
    },
    /// The role does not have this skill.
    #[error("{role} cannot {skill}")]
    UnknownSkill {
        /// The actor's role.
        role: Role,
        /// The requested skill.
        skill: SkillKind
    },
    /// The operation belongs to another phase.
    #[error("expected the {expected:?} phase, but the game is in the {found:?} phase")]
    WrongPhase {
        /// The phase the operation needs.
        expected: Phase,
        /// The current phase.
        found: Phase
    },
    /// Nobody owes a revenge kill.
    #[error("player {0} is not owed a revenge kill")]
    NoRevengeOwed(PlayerNumber)
}

/// Reading or writing the saved game failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage lock was poisoned.
    #[error("storage lock was poisoned")]
    LockPoisoned,
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The saved game could not be parsed.
    #[error("corrupted save: {0}")]
    Corrupt(String),
    /// The game could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String)
}

/// Any error surfaced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// See `ConfigurationError`.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// There is no saved game, or it could not be read.
    #[error("no active game")]
    NoActiveGame,
    /// See `InvalidTarget`.
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] InvalidTarget),
    /// See `InvalidAction`.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    /// See `StorageError`.
    #[error(transparent)]
    Storage(#[from] StorageError)
}
