//! Night resolution.
//!
//! The collected actions are applied in six fixed phases. Within a phase, actions are visited in the order they were
//! submitted, so the same state and the same actions always produce the same result.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::{
    error::{Error, InvalidAction},
    game::{
        log::{ActorRef, Finding, LogEntry, LogKind},
        night::NightAction,
        state::{GameState, Phase},
        Aura,
        Faction,
        SkillKind
    }
};

/// Rules that hold for the rest of the night once a global skill has been used.
#[derive(Debug, Default)]
struct NightContext {
    prevent_kills: bool,
    block_investigations: bool,
    /// Indices into the action list of actions dropped by cancellation or paralysis.
    cancelled: BTreeSet<usize>
}

fn entry(action: &NightAction, kind: LogKind) -> LogEntry {
    LogEntry {
        kind,
        actor: Some(ActorRef { number: action.actor, role: action.role }),
        target: action.target,
        result: None
    }
}

/// Resolves the collected night actions and moves the game to the day.
///
/// Consumes `state.night_actions`, rebuilds `state.night_log` from scratch, and returns it.
///
/// # Errors
///
/// Fails without touching the state unless the game is in the night phase, so a night is never resolved twice.
pub fn resolve_night(state: &mut GameState) -> Result<&[LogEntry], Error> {
    if state.phase != Phase::Night {
        return Err(InvalidAction::WrongPhase { expected: Phase::Night, found: state.phase }.into());
    }
    let actions = std::mem::take(&mut state.night_actions);
    state.night_log.clear();
    state.skip_discussion = false;
    debug!(night = state.day, actions = actions.len(), "resolving night");
    if actions.is_empty() {
        state.night_log.push(LogEntry::bare(LogKind::QuietNight));
    } else {
        let mut ctx = NightContext::default();
        global_effects(state, &actions, &mut ctx);
        status_effects(state, &actions, &mut ctx);
        inquiries(state, &actions, &ctx);
        kills(state, &actions, &ctx);
        cursed_deaths(state);
    }
    cleanup(state);
    if state.night_log.is_empty() {
        state.night_log.push(LogEntry::bare(LogKind::NoAction));
    }
    state.phase = Phase::Day;
    Ok(&state.night_log)
}

/// Phase 1.
fn global_effects(state: &mut GameState, actions: &[NightAction], ctx: &mut NightContext) {
    for action in actions {
        let kind = match action.skill {
            Some(SkillKind::PreventKill) => {
                ctx.prevent_kills = true;
                LogKind::Lockdown
            }
            Some(SkillKind::CancelAll) => {
                for player in state.players_mut() {
                    if player.faction() == Faction::AbilityHuman {
                        player.ability_cancelled = true;
                    }
                }
                LogKind::CancelAll
            }
            Some(SkillKind::BlockInvestigation) => {
                ctx.block_investigations = true;
                LogKind::Smoke
            }
            Some(SkillKind::SkipDiscussion) => {
                state.skip_discussion = true;
                LogKind::SkipDiscussion
            }
            _ => continue
        };
        state.night_log.push(LogEntry { target: None, ..entry(action, kind) });
    }
    debug!(prevent_kills = ctx.prevent_kills, block_investigations = ctx.block_investigations, "global effects applied");
}

/// Phase 2. Also decides which actions are dropped for the rest of the night.
fn status_effects(state: &mut GameState, actions: &[NightAction], ctx: &mut NightContext) {
    for (idx, action) in actions.iter().enumerate() {
        let skill = match action.skill {
            Some(skill) if !skill.is_global() => skill,
            _ => continue
        };
        let (cancelled, paralyzed) = state.player(action.actor)
            .map_or((false, false), |actor| (actor.ability_cancelled, actor.paralyzed));
        if cancelled || (paralyzed && skill != SkillKind::Paralyze) {
            ctx.cancelled.insert(idx);
            state.night_log.push(LogEntry { target: None, ..entry(action, LogKind::Cancelled) });
            continue;
        }
        let target = match action.target.and_then(|target| state.player_mut(target)) {
            Some(target) => target,
            None => continue
        };
        let mut logged = Vec::with_capacity(2);
        match skill {
            SkillKind::Paralyze => logged.push(LogKind::Haunt),
            SkillKind::Silence => {
                target.silenced = true;
                logged.push(LogKind::Silence);
            }
            SkillKind::Cure => {
                if target.cursed {
                    target.cursed = false;
                    logged.push(LogKind::HealCurse);
                }
                if target.silenced {
                    target.silenced = false;
                    logged.push(LogKind::HealSilence);
                }
            }
            SkillKind::Heal => {
                if target.cursed {
                    target.cursed = false;
                    logged.push(LogKind::HealCurse);
                } else {
                    target.protected = true;
                    target.protected_by = Some(action.role);
                    logged.push(LogKind::Protect);
                }
            }
            SkillKind::Protect => {
                target.protected = true;
                target.protected_by = Some(action.role);
                logged.push(LogKind::Protect);
            }
            SkillKind::GrantCharm => {
                target.charms += 1;
                target.immune_to_reveal = true;
                logged.push(LogKind::GrantCharm);
            }
            SkillKind::Curse => {
                target.cursed = true;
                logged.push(LogKind::Curse);
            }
            _ => {}
        }
        state.night_log.extend(logged.into_iter().map(|kind| entry(action, kind)));
    }
    debug!(cancelled = ctx.cancelled.len(), "status effects applied");
}

/// Phase 3.
fn inquiries(state: &mut GameState, actions: &[NightAction], ctx: &NightContext) {
    for (idx, action) in actions.iter().enumerate() {
        let skill = match action.skill {
            Some(skill) if skill.is_inquiry() && !ctx.cancelled.contains(&idx) => skill,
            _ => continue
        };
        let target = action.target.and_then(|target| state.player(target)).filter(|target| target.alive);
        let finding = match target {
            None => None,
            Some(_) if ctx.block_investigations => None,
            Some(target) if target.immune_to_investigation => None,
            Some(target) if skill != SkillKind::Observe && target.immune_to_reveal => None,
            Some(target) => Some(match skill {
                SkillKind::Investigate => (LogKind::Investigation, Finding::Investigation { side: target.faction().side(), role: target.role() }),
                SkillKind::Reveal => (LogKind::Reveal, Finding::Reveal(target.role())),
                _ => (LogKind::Observation, Finding::Aura(Aura::from(target.faction())))
            })
        };
        let log = match finding {
            Some((kind, finding)) => LogEntry { result: Some(finding), ..entry(action, kind) },
            None => entry(action, LogKind::InvestigateFail)
        };
        state.night_log.push(log);
    }
    debug!("inquiries resolved");
}

/// Phase 4.
fn kills(state: &mut GameState, actions: &[NightAction], ctx: &NightContext) {
    for (idx, action) in actions.iter().enumerate() {
        if action.skill != Some(SkillKind::Kill) || ctx.cancelled.contains(&idx) {
            continue;
        }
        let target = match action.target.and_then(|target| state.player_mut(target)) {
            Some(target) if target.alive => target,
            _ => continue
        };
        if ctx.prevent_kills {
            state.night_log.push(entry(action, LogKind::LockdownBlocked));
            continue;
        }
        if target.charms > 0 {
            target.charms -= 1;
            state.night_log.push(entry(action, LogKind::CharmBlock));
            continue;
        }
        if target.protected {
            target.protected = false;
            state.night_log.push(entry(action, LogKind::KillBlocked));
            continue;
        }
        target.alive = false;
        let victim = ActorRef { number: target.number(), role: target.role() };
        info!(player = victim.number, killer = action.actor, "killed at night");
        state.night_log.push(entry(action, LogKind::Kill));
        if victim.role.drags_down_killer() {
            if let Some(killer) = state.player_mut(action.actor).filter(|killer| killer.alive) {
                killer.alive = false;
                info!(player = action.actor, source = victim.number, "dragged down in revenge");
                state.night_log.push(LogEntry {
                    kind: LogKind::Revenge,
                    actor: Some(victim),
                    target: Some(action.actor),
                    result: None
                });
            }
        }
    }
    debug!(prevented = ctx.prevent_kills, "kills resolved");
}

/// Phase 5.
fn cursed_deaths(state: &mut GameState) {
    let mut deaths = Vec::default();
    for player in state.players_mut() {
        if player.alive && player.cursed {
            player.alive = false;
            deaths.push(player.number());
        }
    }
    for number in deaths {
        info!(player = number, "died from a curse");
        state.night_log.push(LogEntry { target: Some(number), ..LogEntry::bare(LogKind::CursedDeath) });
    }
}

/// Phase 6. Charms and the guardian's history carry over to the next night.
fn cleanup(state: &mut GameState) {
    for player in state.players_mut() {
        for remaining in player.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        player.ability_cancelled = false;
        player.protected = false;
        player.protected_by = None;
        player.paralyzed = false;
        player.silenced = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{state::Player, PlayerNumber, Role, Side};

    fn state(roles: &[Role]) -> GameState {
        let players = roles.iter().enumerate().map(|(i, &role)| Player::new(i as PlayerNumber + 1, role)).collect();
        GameState::new(players, roles.len() as u32)
    }

    fn queue(state: &mut GameState, actor: PlayerNumber, skill: SkillKind, target: Option<PlayerNumber>) {
        let role = state.player(actor).unwrap().role();
        state.night_actions.push(NightAction::new(actor, role, skill, target));
    }

    fn kinds(state: &GameState) -> Vec<LogKind> {
        state.night_log.iter().map(|entry| entry.kind).collect()
    }

    #[test]
    fn empty_night_is_quiet_but_cooldowns_tick() {
        let mut state = state(&[Role::Aswang, Role::Tagabaryo]);
        state.player_mut(1).unwrap().cooldowns.insert(SkillKind::Kill, 2);
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::QuietNight]);
        assert_eq!(state.player(1).unwrap().cooldown(SkillKind::Kill), 1);
        assert_eq!(state.phase, Phase::Day);
    }

    #[test]
    fn a_night_is_resolved_only_once() {
        let mut state = state(&[Role::Aswang, Role::Tagabaryo, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Kill, Some(2));
        state.player_mut(1).unwrap().cooldowns.insert(SkillKind::Kill, 2);
        resolve_night(&mut state).unwrap();
        let resolved = state.clone();
        assert!(matches!(
            resolve_night(&mut state),
            Err(Error::InvalidAction(InvalidAction::WrongPhase { expected: Phase::Night, found: Phase::Day }))
        ));
        assert_eq!(state, resolved);
        assert_eq!(kinds(&state), vec![LogKind::Kill]);
        assert_eq!(state.player(1).unwrap().cooldown(SkillKind::Kill), 1);
    }

    #[test]
    fn skips_only_produce_no_action() {
        let mut state = state(&[Role::Aswang, Role::Tagabaryo]);
        state.night_actions.push(NightAction::skip(1, Role::Aswang));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::NoAction]);
        assert!(state.night_actions.is_empty());
    }

    #[test]
    fn plain_kill() {
        let mut state = state(&[Role::Aswang, Role::Tagabaryo, Role::Bagani]);
        queue(&mut state, 1, SkillKind::Kill, Some(2));
        resolve_night(&mut state).unwrap();
        assert!(!state.is_alive(2));
        assert_eq!(state.night_log[0].to_string(), "Aswang [KILLER] (Player 1) killed Player 2.");
    }

    #[test]
    fn protection_blocks_only_the_first_kill() {
        let mut state = state(&[Role::Aswang, Role::Manunugis, Role::Bagani, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Kill, Some(4));
        queue(&mut state, 3, SkillKind::Protect, Some(4));
        queue(&mut state, 2, SkillKind::Kill, Some(4));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Protect, LogKind::KillBlocked, LogKind::Kill]);
        assert!(!state.is_alive(4));
    }

    #[test]
    fn charm_beats_protection_and_is_spent() {
        let mut state = state(&[Role::Aswang, Role::Bagani, Role::Tagabaryo]);
        state.player_mut(3).unwrap().charms = 1;
        queue(&mut state, 2, SkillKind::Protect, Some(3));
        queue(&mut state, 1, SkillKind::Kill, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Protect, LogKind::CharmBlock]);
        let villager = state.player(3).unwrap();
        assert!(villager.alive);
        assert_eq!(villager.charms, 0);
        assert!(!villager.protected);
    }

    #[test]
    fn granted_charm_lasts_and_grants_reveal_immunity() {
        let mut state = state(&[Role::MangAanting, Role::Tiktik, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::GrantCharm, Some(3));
        queue(&mut state, 2, SkillKind::Reveal, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::GrantCharm, LogKind::InvestigateFail]);
        let villager = state.player(3).unwrap();
        assert_eq!(villager.charms, 1);
        assert!(villager.immune_to_reveal);
    }

    #[test]
    fn lockdown_blocks_every_kill() {
        let mut state = state(&[Role::Aswang, Role::Kapitan, Role::Tagabaryo, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Kill, Some(3));
        queue(&mut state, 2, SkillKind::PreventKill, None);
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Lockdown, LogKind::LockdownBlocked]);
        assert!(state.is_alive(3));
    }

    #[test]
    fn cancel_all_drops_human_actions_only() {
        let mut state = state(&[Role::Duwende, Role::Babaylan, Role::Aswang, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::CancelAll, None);
        queue(&mut state, 3, SkillKind::Kill, Some(4));
        queue(&mut state, 2, SkillKind::Investigate, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::CancelAll, LogKind::Cancelled, LogKind::Kill]);
        assert_eq!(state.night_log[1].actor.map(|actor| actor.number), Some(2));
        assert!(!state.player(2).unwrap().ability_cancelled);
    }

    #[test]
    fn paralyzed_actor_is_cancelled_but_haunt_is_logged() {
        let mut state = state(&[Role::Batibat, Role::Aswang, Role::Tagabaryo]);
        state.player_mut(2).unwrap().paralyzed = true;
        queue(&mut state, 1, SkillKind::Paralyze, Some(2));
        queue(&mut state, 2, SkillKind::Kill, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Haunt, LogKind::Cancelled]);
        assert!(state.is_alive(3));
        assert!(!state.player(2).unwrap().paralyzed);
    }

    #[test]
    fn cure_lifts_a_curse_from_the_same_night() {
        let mut state = state(&[Role::Mangkukulam, Role::Albularyo, Role::Tagabaryo, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Curse, Some(3));
        queue(&mut state, 2, SkillKind::Cure, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Curse, LogKind::HealCurse]);
        assert!(state.is_alive(3));
    }

    #[test]
    fn uncured_curse_kills_at_end_of_night() {
        let mut state = state(&[Role::Mangkukulam, Role::Tagabaryo, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Curse, Some(2));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Curse, LogKind::CursedDeath]);
        assert!(!state.is_alive(2));
        assert_eq!(state.night_log[1].to_string(), "Player 2 died from a curse.");
    }

    #[test]
    fn heal_cures_a_cursed_target_instead_of_protecting() {
        let mut state = state(&[Role::Aswang, Role::Albularyo, Role::Tagabaryo]);
        state.player_mut(3).unwrap().cursed = true;
        queue(&mut state, 2, SkillKind::Heal, Some(3));
        queue(&mut state, 1, SkillKind::Kill, Some(3));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::HealCurse, LogKind::Kill]);
    }

    #[test]
    fn killing_the_tiyanak_drags_the_killer_down_once() {
        let mut state = state(&[Role::Manunugis, Role::Tiyanak, Role::Tagabaryo]);
        queue(&mut state, 1, SkillKind::Kill, Some(2));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Kill, LogKind::Revenge]);
        assert!(!state.is_alive(1) && !state.is_alive(2));
        let revenge = &state.night_log[1];
        assert_eq!(revenge.actor.map(|actor| actor.role), Some(Role::Tiyanak));
        assert_eq!(revenge.target, Some(1));
    }

    #[test]
    fn inquiries_respect_smoke_and_immunity() {
        let mut state = state(&[Role::Kapre, Role::Babaylan, Role::Manlalakbay, Role::MangAanting, Role::Aswang]);
        queue(&mut state, 3, SkillKind::Observe, Some(5));
        resolve_night(&mut state).unwrap();
        assert_eq!(state.night_log[0].result, Some(Finding::Aura(Aura::Dark)));

        state.phase = Phase::Night;
        queue(&mut state, 2, SkillKind::Investigate, Some(4));
        queue(&mut state, 3, SkillKind::Observe, Some(2));
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::InvestigateFail, LogKind::Observation]);
        assert_eq!(state.night_log[1].result, Some(Finding::Aura(Aura::Powered)));

        state.phase = Phase::Night;
        queue(&mut state, 2, SkillKind::Investigate, Some(5));
        queue(&mut state, 1, SkillKind::BlockInvestigation, None);
        resolve_night(&mut state).unwrap();
        assert_eq!(kinds(&state), vec![LogKind::Smoke, LogKind::InvestigateFail]);
    }

    #[test]
    fn investigation_reads_side_and_role() {
        let mut state = state(&[Role::Babaylan, Role::Tiktik]);
        queue(&mut state, 1, SkillKind::Investigate, Some(2));
        resolve_night(&mut state).unwrap();
        assert_eq!(state.night_log[0].result, Some(Finding::Investigation { side: Side::Creatures, role: Role::Tiktik }));
    }

    #[test]
    fn bell_sets_skip_discussion_for_one_day() {
        let mut state = state(&[Role::Kampanero, Role::Aswang]);
        queue(&mut state, 1, SkillKind::SkipDiscussion, None);
        resolve_night(&mut state).unwrap();
        assert!(state.skip_discussion);
        state.phase = Phase::Night;
        resolve_night(&mut state).unwrap();
        assert!(!state.skip_discussion);
    }

    #[test]
    fn transient_flags_reset_but_guarded_history_remains() {
        let mut state = state(&[Role::Tikbalang, Role::Bagani, Role::Tagabaryo]);
        state.player_mut(2).unwrap().guarded.insert(3);
        queue(&mut state, 1, SkillKind::Silence, Some(3));
        queue(&mut state, 2, SkillKind::Protect, Some(3));
        resolve_night(&mut state).unwrap();
        let villager = state.player(3).unwrap();
        assert!(!villager.silenced && !villager.protected && villager.protected_by.is_none());
        assert_eq!(state.silenced_today(), vec![3]);
        assert!(state.player(2).unwrap().guarded.contains(&3));
    }
}
