//! Data types used in game state representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownRole;

/// Players are identified by their seat number, `1..=N`, assigned once at lobby creation.
pub type PlayerNumber = u8;

/// The faction of a role. Always derived from the role, never stored next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// A mythical creature. Creatures win by surviving or by outnumbering the humans.
    Creature,
    /// A human with a night ability.
    AbilityHuman,
    /// A plain villager (Tagabaryo) without any ability.
    Villager
}

impl Faction {
    /// The side this faction plays for. Ability humans and villagers both play for the humans.
    pub fn side(&self) -> Side {
        match *self {
            Faction::Creature => Side::Creatures,
            Faction::AbilityHuman | Faction::Villager => Side::Humans
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Faction::Creature => write!(f, "creature"),
            Faction::AbilityHuman => write!(f, "human with ability"),
            Faction::Villager => write!(f, "villager")
        }
    }
}

/// One of the two teams that can win the game. Also the binary read of an investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The mythical creatures.
    Creatures,
    /// Everyone else.
    Humans
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Side::Creatures => write!(f, "Mythical"),
            Side::Humans => write!(f, "Human")
        }
    }
}

/// The narrative class printed next to a role name. Has no effect on the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    /// `KILLER`
    Killer,
    /// `KILLER/RECON`
    KillerRecon,
    /// `RECON`
    Recon,
    /// `DECEIVER`
    Deceiver,
    /// `SUPPORT`
    Support,
    /// `UTILITY`
    Utility
}

impl fmt::Display for RoleClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RoleClass::Killer => write!(f, "KILLER"),
            RoleClass::KillerRecon => write!(f, "KILLER/RECON"),
            RoleClass::Recon => write!(f, "RECON"),
            RoleClass::Deceiver => write!(f, "DECEIVER"),
            RoleClass::Support => write!(f, "SUPPORT"),
            RoleClass::Utility => write!(f, "UTILITY")
        }
    }
}

/// The three-tier reading produced by an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aura {
    /// The target is a creature.
    Dark,
    /// The target is a human bearing an ability.
    Powered,
    /// The target is a plain villager.
    Mortal
}

impl From<Faction> for Aura {
    fn from(faction: Faction) -> Aura {
        match faction {
            Faction::Creature => Aura::Dark,
            Faction::AbilityHuman => Aura::Powered,
            Faction::Villager => Aura::Mortal
        }
    }
}

impl fmt::Display for Aura {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Aura::Dark => write!(f, "Dark Aura"),
            Aura::Powered => write!(f, "With Powers"),
            Aura::Mortal => write!(f, "Mortal")
        }
    }
}

/// A player role. Roles are dealt once at lobby creation and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creature. Kills a player.
    Aswang,
    /// Creature. Kills a player, or reveals a player's role.
    Manananggal,
    /// Creature. Curses a player, who dies at the end of the night unless cured.
    Mangkukulam,
    /// Creature without an active skill. Whoever kills it at night is dragged down in revenge.
    Tiyanak,
    /// Creature. Cancels all human abilities for the night.
    Duwende,
    /// Creature. Creates smoke that makes every investigation fail for the night.
    Kapre,
    /// Creature. Silences a player for the coming day.
    Tikbalang,
    /// Creature. Reveals a player's role.
    Tiktik,
    /// Creature. Haunts a player, paralyzing them for the rest of the night. Always acts first.
    Batibat,
    /// Human. Shoots a player.
    Manunugis,
    /// Human. Cures a player of curse and silence. May cure themselves.
    Albularyo,
    /// Human. Protects a player from death. Never themselves, and never the same player twice.
    Bagani,
    /// Human. Grants an anting-anting charm. Cannot be investigated or revealed.
    MangAanting,
    /// Human. Investigates a player, learning their side and role.
    Babaylan,
    /// Human. Enforces a lockdown that prevents every kill for the night.
    Kapitan,
    /// Human. Rings the bell so the next day skips its discussion.
    Kampanero,
    /// Human. Observes a player's aura.
    Manlalakbay,
    /// A plain villager with no abilities.
    Tagabaryo
}

impl Role {
    /// Every creature role, in deck order.
    pub const CREATURES: [Role; 9] = [
        Role::Aswang,
        Role::Manananggal,
        Role::Mangkukulam,
        Role::Tiyanak,
        Role::Duwende,
        Role::Kapre,
        Role::Tikbalang,
        Role::Tiktik,
        Role::Batibat
    ];

    /// Every ability-human role, in deck order.
    pub const ABILITY_HUMANS: [Role; 8] = [
        Role::Manunugis,
        Role::Albularyo,
        Role::Bagani,
        Role::MangAanting,
        Role::Babaylan,
        Role::Kapitan,
        Role::Kampanero,
        Role::Manlalakbay
    ];

    /// The faction this role belongs to.
    pub fn faction(&self) -> Faction {
        match *self {
            Role::Aswang | Role::Manananggal | Role::Mangkukulam | Role::Tiyanak |
            Role::Duwende | Role::Kapre | Role::Tikbalang | Role::Tiktik | Role::Batibat => Faction::Creature,
            Role::Manunugis | Role::Albularyo | Role::Bagani | Role::MangAanting |
            Role::Babaylan | Role::Kapitan | Role::Kampanero | Role::Manlalakbay => Faction::AbilityHuman,
            Role::Tagabaryo => Faction::Villager
        }
    }

    /// Shorthand for `self.faction() == Faction::Creature`.
    pub fn is_creature(&self) -> bool {
        self.faction() == Faction::Creature
    }

    /// The narrative class shown next to the role name, if any.
    pub fn class(&self) -> Option<RoleClass> {
        Some(match *self {
            Role::Aswang | Role::Mangkukulam | Role::Tiyanak | Role::Manunugis => RoleClass::Killer,
            Role::Manananggal => RoleClass::KillerRecon,
            Role::Tiktik => RoleClass::Recon,
            Role::Duwende | Role::Kapre | Role::Tikbalang | Role::Batibat => RoleClass::Deceiver,
            Role::Albularyo | Role::Bagani | Role::MangAanting => RoleClass::Support,
            Role::Babaylan | Role::Kapitan | Role::Kampanero | Role::Manlalakbay => RoleClass::Utility,
            Role::Tagabaryo => return None
        })
    }

    /// Roles whose narrative grants innate immunity to investigations and reveals.
    pub fn innately_immune(&self) -> bool {
        *self == Role::MangAanting
    }

    /// The paralysis-inducer, which picks its target before any other role.
    pub fn is_disruptor(&self) -> bool {
        *self == Role::Batibat
    }

    /// The drag-down role, whose killer dies with it.
    pub fn drags_down_killer(&self) -> bool {
        *self == Role::Tiyanak
    }

    /// The guardian, which may never protect the same player twice in one game.
    pub fn is_guardian(&self) -> bool {
        *self == Role::Bagani
    }

    /// Whether this role may pick itself as the target of its own skills.
    pub fn can_target_self(&self) -> bool {
        *self == Role::Albularyo
    }

    fn name(&self) -> &'static str {
        match *self {
            Role::Aswang => "Aswang",
            Role::Manananggal => "Manananggal",
            Role::Mangkukulam => "Mangkukulam",
            Role::Tiyanak => "Tiyanak",
            Role::Duwende => "Duwende",
            Role::Kapre => "Kapre",
            Role::Tikbalang => "Tikbalang",
            Role::Tiktik => "Tiktik",
            Role::Batibat => "Batibat",
            Role::Manunugis => "Manunugis",
            Role::Albularyo => "Albularyo",
            Role::Bagani => "Bagani",
            Role::MangAanting => "Mang-aanting",
            Role::Babaylan => "Babaylan",
            Role::Kapitan => "Kapitan",
            Role::Kampanero => "Kampanero",
            Role::Manlalakbay => "Manlalakbay",
            Role::Tagabaryo => "Tagabaryo"
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Role, UnknownRole> {
        match &s.to_lowercase().replace(['-', '_', ' '], "")[..] {
            "aswang" => Ok(Role::Aswang),
            "manananggal" => Ok(Role::Manananggal),
            "mangkukulam" => Ok(Role::Mangkukulam),
            "tiyanak" => Ok(Role::Tiyanak),
            "duwende" => Ok(Role::Duwende),
            "kapre" => Ok(Role::Kapre),
            "tikbalang" => Ok(Role::Tikbalang),
            "tiktik" => Ok(Role::Tiktik),
            "batibat" => Ok(Role::Batibat),
            "manunugis" => Ok(Role::Manunugis),
            "albularyo" => Ok(Role::Albularyo),
            "bagani" => Ok(Role::Bagani),
            "mangaanting" => Ok(Role::MangAanting),
            "babaylan" => Ok(Role::Babaylan),
            "kapitan" => Ok(Role::Kapitan),
            "kampanero" => Ok(Role::Kampanero),
            "manlalakbay" => Ok(Role::Manlalakbay),
            "tagabaryo" | "villager" => Ok(Role::Tagabaryo),
            _ => Err(UnknownRole(s.to_owned()))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.class() {
            Some(class) => write!(f, "{} [{}]", self.name(), class),
            None => write!(f, "{}", self.name())
        }
    }
}
