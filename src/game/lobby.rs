//! Role assignment for a new game.

use std::collections::HashSet;

use rand::{seq::SliceRandom, thread_rng, Rng};
use tracing::info;

use crate::{
    error::ConfigurationError,
    game::{
        state::{GameState, Player},
        PlayerNumber,
        Role
    }
};

/// The smallest supported table.
pub const MIN_PLAYERS: usize = 6;
/// The largest supported table.
pub const MAX_PLAYERS: usize = 12;

/// How many seats of each faction a table of a given size gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distribution {
    /// Creature seats.
    pub creatures: usize,
    /// Ability-human seats.
    pub ability_humans: usize,
    /// Villager seats.
    pub villagers: usize
}

impl Distribution {
    /// The role table for `player_count` players.
    ///
    /// The number of creatures grows more slowly than the table.
    ///
    /// # Errors
    ///
    /// Fails if `player_count` is outside `MIN_PLAYERS..=MAX_PLAYERS`.
    pub fn for_players(player_count: usize) -> Result<Distribution, ConfigurationError> {
        let (creatures, ability_humans, villagers) = match player_count {
            6 => (1, 2, 3),
            7 => (1, 2, 4),
            8 => (2, 3, 3),
            9 => (2, 3, 4),
            10 => (3, 4, 3),
            11 => (3, 4, 4),
            12 => (4, 4, 4),
            found => return Err(ConfigurationError::UnsupportedPlayerCount { found, min: MIN_PLAYERS, max: MAX_PLAYERS })
        };
        Ok(Distribution { creatures, ability_humans, villagers })
    }

    /// The total number of seats.
    pub fn total(&self) -> usize {
        self.creatures + self.ability_humans + self.villagers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Creature,
    AbilityHuman,
    Villager
}

/// Deals roles for a new game using the thread-local random number generator.
///
/// # Errors
///
/// Fails with a `ConfigurationError` if `player_count` is not supported.
pub fn create_lobby(player_count: usize) -> Result<GameState, ConfigurationError> {
    create_lobby_with_rng(player_count, &mut thread_rng())
}

/// Deals roles for a new game using the given random number generator.
///
/// Faction slots are shuffled first. Each creature and ability-human slot then takes the next role from its own
/// shuffled deck, so no role is dealt twice. Villager slots all get the Tagabaryo.
///
/// # Errors
///
/// Fails with a `ConfigurationError` if `player_count` is not supported.
pub fn create_lobby_with_rng<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Result<GameState, ConfigurationError> {
    let distribution = Distribution::for_players(player_count)?;
    let mut slots = Vec::with_capacity(distribution.total());
    slots.extend(std::iter::repeat(Slot::Creature).take(distribution.creatures));
    slots.extend(std::iter::repeat(Slot::AbilityHuman).take(distribution.ability_humans));
    slots.extend(std::iter::repeat(Slot::Villager).take(distribution.villagers));
    slots.shuffle(rng);
    let mut creatures = Role::CREATURES.to_vec();
    creatures.shuffle(rng);
    let mut humans = Role::ABILITY_HUMANS.to_vec();
    humans.shuffle(rng);
    let players = slots.into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            let role = match slot {
                Slot::Creature => creatures.pop().ok_or(ConfigurationError::DeckExhausted("creature"))?,
                Slot::AbilityHuman => humans.pop().ok_or(ConfigurationError::DeckExhausted("ability human"))?,
                Slot::Villager => Role::Tagabaryo
            };
            Ok(Player::new((idx + 1) as PlayerNumber, role))
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;
    info!(
        players = player_count,
        creatures = distribution.creatures,
        ability_humans = distribution.ability_humans,
        villagers = distribution.villagers,
        "lobby created"
    );
    Ok(GameState::new(players, player_count as u32))
}

/// Deals a hand-picked set of roles instead of the standard table.
///
/// Seats not covered by `roles` get the Tagabaryo. The roles are shuffled onto the seats.
///
/// # Errors
///
/// Fails if `player_count` is not supported, if there are more roles than seats, or if a role other than the
/// Tagabaryo is listed twice.
pub fn create_lobby_with_roles<R: Rng + ?Sized>(player_count: usize, roles: &[Role], rng: &mut R) -> Result<GameState, ConfigurationError> {
    Distribution::for_players(player_count)?;
    if roles.len() > player_count {
        return Err(ConfigurationError::TooManyRoles { roles: roles.len(), players: player_count });
    }
    let mut seen = HashSet::new();
    if let Some(&role) = roles.iter().find(|&&role| role != Role::Tagabaryo && !seen.insert(role)) {
        return Err(ConfigurationError::DuplicateRole(role));
    }
    let mut deck = roles.to_vec();
    deck.resize(player_count, Role::Tagabaryo);
    deck.shuffle(rng);
    let players = deck.into_iter()
        .enumerate()
        .map(|(idx, role)| Player::new((idx + 1) as PlayerNumber, role))
        .collect::<Vec<_>>();
    info!(players = player_count, ?roles, "lobby created with custom roles");
    Ok(GameState::new(players, player_count as u32))
}
