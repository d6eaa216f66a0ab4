//! Per-turn resources: AP, EX cooldown, hand and field limits.
//!
//! These helpers are only used by the offline engine; the authority runs
//! its own accounting and reports the result in the snapshot.

use super::TurnError;
use crate::cards::CardRegistry;
use crate::core::{PlayerState, RulesConfig, SessionState};
use crate::decision::PendingDecision;

/// Reset per-turn state at the start of `player`'s turn.
///
/// AP returns to the allotment, the per-turn flags clear and the EX
/// cooldown ticks down by one.
pub fn begin_turn(player: &mut PlayerState, rules: &RulesConfig) {
    player.ap = rules.ap_per_turn;
    player.swapped_this_turn = false;
    player.cards_played_this_turn = 0;
    player.used_ex_this_turn = false;
    player.ex_cooldown = player.ex_cooldown.saturating_sub(1);
    player.ex_on_cooldown = player.ex_cooldown > 0;
}

/// Debit `cost` AP, or fail without touching the player.
pub fn spend_ap(player: &mut PlayerState, cost: u32) -> Result<(), TurnError> {
    if player.ap < cost {
        return Err(TurnError::NotEnoughAp {
            have: player.ap,
            need: cost,
        });
    }
    player.ap -= cost;
    Ok(())
}

/// Fail if the field is already at its limit.
pub fn check_field_capacity(player: &PlayerState) -> Result<(), TurnError> {
    if player.field.len() >= player.field_limit {
        return Err(TurnError::FieldFull {
            limit: player.field_limit,
        });
    }
    Ok(())
}

/// Fail if EX is blocked.
pub fn check_ex_ready(player: &PlayerState) -> Result<(), TurnError> {
    if player.ex_blocked() {
        return Err(TurnError::ExOnCooldown {
            turns: player.ex_cooldown,
        });
    }
    if player.used_ex_this_turn {
        return Err(TurnError::ExAlreadyUsed);
    }
    Ok(())
}

/// Block EX for the configured number of owner turn-starts.
pub fn start_ex_cooldown(player: &mut PlayerState, rules: &RulesConfig) {
    player.ex_cooldown = rules.ex_cooldown_turns;
    player.ex_on_cooldown = player.ex_cooldown > 0;
    player.used_ex_this_turn = true;
}

/// Cards in `player`'s hand carrying the immovable keyword.
#[must_use]
pub fn immovable_in_hand(
    state: &SessionState,
    player: &PlayerState,
    registry: &CardRegistry,
    rules: &RulesConfig,
) -> usize {
    player
        .hand
        .iter()
        .filter(|id| {
            registry
                .definition_of(state, id)
                .is_some_and(|def| def.has_keyword(&rules.immovable_keyword))
        })
        .count()
}

/// Hand limit after accounting for cards that can never be discarded.
#[must_use]
pub fn effective_hand_limit(
    state: &SessionState,
    player: &PlayerState,
    registry: &CardRegistry,
    rules: &RulesConfig,
) -> usize {
    player
        .hand_limit
        .max(immovable_in_hand(state, player, registry, rules))
}

/// The discard decision to raise if `player` is over the limit.
#[must_use]
pub fn hand_limit_decision(
    state: &SessionState,
    player: &PlayerState,
    registry: &CardRegistry,
    rules: &RulesConfig,
    reason: &str,
) -> Option<PendingDecision> {
    let limit = effective_hand_limit(state, player, registry, rules);
    (player.hand.len() > limit).then(|| PendingDecision::DiscardToHandLimit {
        reason: reason.to_string(),
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardInstance};
    use crate::core::{CardDefId, InstanceId, PlayerId};
    use crate::zones::Zone;

    fn player(rules: &RulesConfig) -> PlayerState {
        PlayerState::new(PlayerId::new("me"), rules)
    }

    #[test]
    fn test_begin_turn_resets() {
        let rules = RulesConfig::default();
        let mut p = player(&rules);
        p.ap = 0;
        p.swapped_this_turn = true;
        p.cards_played_this_turn = 3;
        p.ex_cooldown = 2;

        begin_turn(&mut p, &rules);
        assert_eq!(p.ap, 3);
        assert!(!p.swapped_this_turn);
        assert_eq!(p.cards_played_this_turn, 0);
        assert_eq!(p.ex_cooldown, 1);
        assert!(p.ex_on_cooldown);

        begin_turn(&mut p, &rules);
        assert_eq!(p.ex_cooldown, 0);
        assert!(!p.ex_on_cooldown);

        begin_turn(&mut p, &rules);
        assert_eq!(p.ex_cooldown, 0);
    }

    #[test]
    fn test_spend_ap() {
        let rules = RulesConfig::default();
        let mut p = player(&rules);
        assert!(spend_ap(&mut p, 2).is_ok());
        assert_eq!(p.ap, 1);
        assert_eq!(
            spend_ap(&mut p, 2),
            Err(TurnError::NotEnoughAp { have: 1, need: 2 })
        );
        assert_eq!(p.ap, 1);
    }

    #[test]
    fn test_field_capacity() {
        let rules = RulesConfig::default().with_field_limit(1);
        let mut p = player(&rules);
        assert!(check_field_capacity(&p).is_ok());
        p.field.push_back(InstanceId::new("x"));
        assert_eq!(
            check_field_capacity(&p),
            Err(TurnError::FieldFull { limit: 1 })
        );
    }

    #[test]
    fn test_ex_cooldown_blocks() {
        let rules = RulesConfig::default();
        let mut p = player(&rules);
        assert!(check_ex_ready(&p).is_ok());
        start_ex_cooldown(&mut p, &rules);
        assert!(check_ex_ready(&p).is_err());
    }

    #[test]
    fn test_effective_limit_counts_immovable() {
        let rules = RulesConfig::default().with_hand_limit(1);
        let registry = CardRegistry::from_definitions([
            CardDefinition::new("K001", "Anchor", 0).with_keyword("IMMOVABLE"),
        ]);
        let me = PlayerId::new("me");
        let mut state = SessionState::new("ABC123", 1);
        let mut p = PlayerState::new(me.clone(), &rules);
        for i in 0..3 {
            let id = InstanceId::new(format!("k{i}"));
            p.hand.push_back(id.clone());
            state.cards.insert(
                id.clone(),
                CardInstance::new(id, CardDefId::new("K001"), me.clone(), Zone::Hand),
            );
        }

        assert_eq!(effective_hand_limit(&state, &p, &registry, &rules), 3);
        assert!(hand_limit_decision(&state, &p, &registry, &rules, "draw").is_none());
    }
}
