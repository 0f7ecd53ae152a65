//! The night log and its narration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Aura, PlayerNumber, Role, Side};

/// What kind of event a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Nobody submitted anything.
    QuietNight,
    /// Actions were submitted but none of them had a visible effect.
    NoAction,
    /// Kills are prevented for the night.
    Lockdown,
    /// Human abilities are cancelled for the night.
    CancelAll,
    /// Investigations fail for the night.
    Smoke,
    /// The coming day skips its discussion.
    SkipDiscussion,
    /// The actor's action was dropped.
    Cancelled,
    /// The target is paralyzed.
    Haunt,
    /// The target is silenced.
    Silence,
    /// The target's curse was lifted.
    HealCurse,
    /// The target's silence was lifted.
    HealSilence,
    /// The target is protected from one kill.
    Protect,
    /// The target received a charm.
    GrantCharm,
    /// The target is cursed.
    Curse,
    /// An investigation, reveal or observation failed.
    InvestigateFail,
    /// An investigation succeeded.
    Investigation,
    /// A reveal succeeded.
    Reveal,
    /// An observation succeeded.
    Observation,
    /// The target was killed.
    Kill,
    /// A kill was stopped by the target's charm.
    CharmBlock,
    /// A kill was stopped by the target's protection.
    KillBlocked,
    /// A kill was stopped by the lockdown.
    LockdownBlocked,
    /// The drag-down role took its killer with it.
    Revenge,
    /// The target died from a curse.
    CursedDeath,
    /// A drag-down role eliminated by vote took someone with it.
    RevengeVote
}

/// The player an entry is attributed to, with the role they held when acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    /// Seat number.
    pub number: PlayerNumber,
    /// Role at the time of the action.
    pub role: Role
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (Player {})", self.role, self.number)
    }
}

/// What an investigation, reveal or observation found out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    /// The target's side and literal role.
    Investigation {
        /// Creature or human.
        side: Side,
        /// The target's role.
        role: Role
    },
    /// The target's literal role.
    Reveal(Role),
    /// The target's aura.
    Aura(Aura)
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Finding::Investigation { side, role } => write!(f, "{} ({})", side, role),
            Finding::Reveal(role) => write!(f, "{}", role),
            Finding::Aura(aura) => write!(f, "{}", aura)
        }
    }
}

/// One resolved or attempted effect. Entries are appended during resolution and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// What happened.
    pub kind: LogKind,
    /// Who did it, if anyone.
    pub actor: Option<ActorRef>,
    /// Who it happened to, if anyone.
    pub target: Option<PlayerNumber>,
    /// What was found out, for investigations, reveals and observations.
    pub result: Option<Finding>
}

impl LogEntry {
    /// An entry with neither actor nor target.
    pub fn bare(kind: LogKind) -> LogEntry {
        LogEntry { kind, actor: None, target: None, result: None }
    }

    /// Whether this entry records somebody dying.
    pub fn is_death(&self) -> bool {
        match self.kind {
            LogKind::Kill | LogKind::Revenge | LogKind::CursedDeath | LogKind::RevengeVote => true,
            _ => false
        }
    }
}

struct Actor<'a>(&'a Option<ActorRef>);

impl<'a> fmt::Display for Actor<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(actor) => write!(f, "{}", actor),
            None => write!(f, "Someone")
        }
    }
}

struct Target(Option<PlayerNumber>);

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(number) => write!(f, "Player {}", number),
            None => write!(f, "no one")
        }
    }
}

struct Found<'a>(&'a Option<Finding>);

impl<'a> fmt::Display for Found<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(finding) => write!(f, "{}", finding),
            None => write!(f, "nothing")
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let actor = Actor(&self.actor);
        let target = Target(self.target);
        let found = Found(&self.result);
        match self.kind {
            LogKind::QuietNight => write!(f, "A quiet night passes..."),
            LogKind::NoAction => write!(f, "No actions were recorded tonight."),
            LogKind::Lockdown => write!(f, "{} enforced a lockdown. All killings were prevented tonight.", actor),
            LogKind::CancelAll => write!(f, "{} cancelled all human abilities tonight.", actor),
            LogKind::Smoke => write!(f, "{} created a smoke cloud. Investigations failed.", actor),
            LogKind::SkipDiscussion => write!(f, "{} rang their bell to skip the discussion and proceed to voting.", actor),
            LogKind::Cancelled => write!(f, "{} had their action cancelled.", actor),
            LogKind::Haunt => write!(f, "{} haunted {} (paralyzed for the night).", actor, target),
            LogKind::Silence => write!(f, "{} silenced {}.", actor, target),
            LogKind::HealCurse => write!(f, "{} healed {}, removing their curse.", actor, target),
            LogKind::HealSilence => write!(f, "{} healed {}, removing their silence.", actor, target),
            LogKind::Protect => write!(f, "{} protected {} from death.", actor, target),
            LogKind::GrantCharm => write!(f, "{} granted Anting-Anting to {}.", actor, target),
            LogKind::Curse => write!(f, "{} cursed {}.", actor, target),
            LogKind::InvestigateFail => write!(f, "{} attempted to investigate {} but it failed.", actor, target),
            LogKind::Investigation => write!(f, "{} investigated {}: {}.", actor, target, found),
            LogKind::Reveal => write!(f, "{} revealed {}: {}.", actor, target, found),
            LogKind::Observation => write!(f, "{} observed {}: {}.", actor, target, found),
            LogKind::Kill => write!(f, "{} killed {}.", actor, target),
            LogKind::CharmBlock => write!(f, "Anting-Anting protected {} from an attack.", target),
            LogKind::KillBlocked => write!(f, "{} tried to kill {} but was blocked by protection.", actor, target),
            LogKind::LockdownBlocked => write!(f, "{} attempted to kill {}, but the lockdown prevented it.", actor, target),
            LogKind::Revenge => write!(f, "{} dragged down {} in revenge.", actor, target),
            LogKind::CursedDeath => write!(f, "{} died from a curse.", target),
            LogKind::RevengeVote => write!(f, "{}'s dying revenge killed {}.", actor, target)
        }
    }
}
