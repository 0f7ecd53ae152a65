//! The skill registry: which night skills each role may use.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Role;

/// The closed set of night skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Kill the target.
    Kill,
    /// Curse the target, who dies at the end of the night unless cured.
    Curse,
    /// Silence the target for the coming day.
    Silence,
    /// Paralyze the target for the rest of the night. Takes effect as soon as it is chosen.
    Paralyze,
    /// Learn the target's side and role.
    Investigate,
    /// Learn the target's role.
    Reveal,
    /// Learn the target's aura.
    Observe,
    /// Protect the target from one kill.
    Protect,
    /// Cure the target of curse and silence.
    Cure,
    /// Cure the target if cursed, otherwise protect them.
    Heal,
    /// Give the target one anting-anting charm.
    GrantCharm,
    /// Cancel the abilities of every human for the night.
    CancelAll,
    /// Make every investigation, reveal and observation fail for the night.
    BlockInvestigation,
    /// Prevent every kill for the night.
    PreventKill,
    /// Skip the discussion of the coming day.
    SkipDiscussion
}

impl SkillKind {
    /// Whether the skill is resolved in the first phase, changing the rules for the whole night.
    pub fn is_global(&self) -> bool {
        match *self {
            SkillKind::CancelAll | SkillKind::BlockInvestigation | SkillKind::PreventKill | SkillKind::SkipDiscussion => true,
            _ => false
        }
    }

    /// Whether the skill is an investigation, reveal or observation.
    pub fn is_inquiry(&self) -> bool {
        match *self {
            SkillKind::Investigate | SkillKind::Reveal | SkillKind::Observe => true,
            _ => false
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SkillKind::Kill => write!(f, "kill"),
            SkillKind::Curse => write!(f, "curse"),
            SkillKind::Silence => write!(f, "silence"),
            SkillKind::Paralyze => write!(f, "paralyze"),
            SkillKind::Investigate => write!(f, "investigate"),
            SkillKind::Reveal => write!(f, "reveal"),
            SkillKind::Observe => write!(f, "observe"),
            SkillKind::Protect => write!(f, "protect"),
            SkillKind::Cure => write!(f, "cure"),
            SkillKind::Heal => write!(f, "heal"),
            SkillKind::GrantCharm => write!(f, "grant charm"),
            SkillKind::CancelAll => write!(f, "cancel all abilities"),
            SkillKind::BlockInvestigation => write!(f, "block investigations"),
            SkillKind::PreventKill => write!(f, "prevent kills"),
            SkillKind::SkipDiscussion => write!(f, "skip discussion")
        }
    }
}

/// A stateless skill template. Cooldown state lives on the player, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    /// The name shown to the player.
    pub name: &'static str,
    /// What the skill does.
    pub kind: SkillKind,
    /// Whether a target player must be picked.
    pub needs_target: bool,
    /// Number of nights the skill stays unavailable after use, counting the night it was used.
    pub cooldown: u32
}

impl Skill {
    const fn targeted(name: &'static str, kind: SkillKind) -> Skill {
        Skill { name, kind, needs_target: true, cooldown: 2 }
    }

    const fn global(name: &'static str, kind: SkillKind, cooldown: u32) -> Skill {
        Skill { name, kind, needs_target: false, cooldown }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const KILL: Skill = Skill::targeted("Kill", SkillKind::Kill);
const SHOOT: Skill = Skill::targeted("Shoot", SkillKind::Kill);
const REVEAL: Skill = Skill::targeted("Reveal Role", SkillKind::Reveal);
const CURSE: Skill = Skill::targeted("Curse", SkillKind::Curse);
const SILENCE: Skill = Skill::targeted("Silence", SkillKind::Silence);
const HAUNT: Skill = Skill::targeted("Haunt (paralyze)", SkillKind::Paralyze);
const CURE: Skill = Skill::targeted("Protect from Curse/Silence", SkillKind::Cure);
const PROTECT: Skill = Skill::targeted("Protect", SkillKind::Protect);
const GRANT_CHARM: Skill = Skill::targeted("Grant Anting-Anting", SkillKind::GrantCharm);
const INVESTIGATE: Skill = Skill::targeted("Investigate", SkillKind::Investigate);
const OBSERVE: Skill = Skill::targeted("Observe", SkillKind::Observe);
const CANCEL_ALL: Skill = Skill::global("Cancel All Human Abilities", SkillKind::CancelAll, 2);
const SMOKE: Skill = Skill::global("Create Smoke (block investigations)", SkillKind::BlockInvestigation, 2);
const LOCKDOWN: Skill = Skill::global("Lockdown (prevent all kills)", SkillKind::PreventKill, 3);
const BELL: Skill = Skill::global("Skip Discussion", SkillKind::SkipDiscussion, 2);

impl Role {
    /// The skills this role may use at night, in menu order.
    ///
    /// Roles without an active ability, such as the Tiyanak and the Tagabaryo, return an empty list.
    pub fn skills(&self) -> &'static [Skill] {
        match *self {
            Role::Aswang => &[KILL],
            Role::Manananggal => &[KILL, REVEAL],
            Role::Mangkukulam => &[CURSE],
            Role::Tiyanak => &[],
            Role::Duwende => &[CANCEL_ALL],
            Role::Kapre => &[SMOKE],
            Role::Tikbalang => &[SILENCE],
            Role::Tiktik => &[REVEAL],
            Role::Batibat => &[HAUNT],
            Role::Manunugis => &[SHOOT],
            Role::Albularyo => &[CURE],
            Role::Bagani => &[PROTECT],
            Role::MangAanting => &[GRANT_CHARM],
            Role::Babaylan => &[INVESTIGATE],
            Role::Kapitan => &[LOCKDOWN],
            Role::Kampanero => &[BELL],
            Role::Manlalakbay => &[OBSERVE],
            Role::Tagabaryo => &[]
        }
    }

    /// Looks up one of this role's skills by kind.
    pub fn skill(&self, kind: SkillKind) -> Option<&'static Skill> {
        self.skills().iter().find(|skill| skill.kind == kind)
    }

    /// Whether this role gets a turn at night at all.
    pub fn has_night_turn(&self) -> bool {
        !self.skills().is_empty()
    }
}
