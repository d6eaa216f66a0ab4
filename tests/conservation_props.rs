//! Property-based tests for the offline engine.
//!
//! Random command sequences, legal or not, must never lose, duplicate or
//! misplace a card, must move the version exactly once per accepted command,
//! and must never let a player act past a pending decision.

use proptest::prelude::*;

use duel_tower_sync::core::{Command, CommandRequest, PlayerId, SessionState};
use duel_tower_sync::decision::PendingDecision;
use duel_tower_sync::local::LocalEngine;

/// Cards each seated player owns: the twelve-card deck plus the EX card.
const CARDS_PER_PLAYER: usize = 13;

fn seated(seed: u64) -> (LocalEngine, String) {
    let mut engine = LocalEngine::demo(seed);
    let gm = PlayerId::new("gm");
    let code = engine.create(&gm).code;
    engine.join(&code, &gm).unwrap();
    engine.join(&code, &PlayerId::new("p2")).unwrap();
    let start = CommandRequest::new(gm, Command::StartCombat);
    assert!(engine.process(&code, &start).unwrap().accepted);
    (engine, code)
}

/// Turn an `(op, pick)` pair into a command for whoever is acting, or for
/// the other player when `pick` is odd and the op is one that needs a turn.
fn build(state: &SessionState, op: u8, pick: usize) -> (PlayerId, Command) {
    let order = state
        .combat
        .as_ref()
        .map(|c| c.turn_order.clone())
        .unwrap_or_default();
    let current = state.current_turn_player().cloned().unwrap_or_else(|| PlayerId::new("gm"));
    let actor = if op >= 6 && pick % 2 == 1 {
        order.iter().find(|p| **p != current).cloned().unwrap_or(current)
    } else {
        current
    };
    let player = state.player(&actor).expect("actor is seated");
    let nth = |ids: &im::Vector<_>| ids.get(pick % ids.len().max(1)).cloned();

    let command = match op {
        0 => Command::Draw {
            count: 1 + (pick % 3) as u32,
        },
        1 => Command::EndTurn,
        2 => Command::HandSwap,
        3 => match nth(&player.hand) {
            Some(id) => Command::play(id),
            None => Command::EndTurn,
        },
        4 => Command::UseEx {
            target_player_ids: Default::default(),
        },
        5 => match &player.pending_decision {
            Some(PendingDecision::DiscardToHandLimit { limit, .. }) => {
                let over = player.hand.len().saturating_sub(*limit);
                let ids: Vec<_> = player.hand.iter().take(over).cloned().collect();
                Command::discard(&ids)
            }
            _ => Command::discard(&player.hand.iter().take(1).cloned().collect::<Vec<_>>()),
        },
        6 => match &player.pending_decision {
            Some(PendingDecision::SearchPick { candidates, .. }) if !candidates.is_empty() => {
                Command::pick(&[candidates[pick % candidates.len()].clone()])
            }
            _ => Command::pick(&player.deck.iter().take(1).cloned().collect::<Vec<_>>()),
        },
        _ => match nth(&player.field).or_else(|| nth(&player.deck)) {
            Some(id) => Command::play(id),
            None => Command::EndTurn,
        },
    };
    (actor, command)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every command, accepted or rejected, leaves each card in exactly one
    /// zone of its owner.
    #[test]
    fn prop_cards_are_conserved(
        seed in any::<u64>(),
        ops in prop::collection::vec((0u8..8, 0usize..64), 1..60)
    ) {
        let (mut engine, code) = seated(seed);

        for (op, pick) in ops {
            let before = engine.session(&code).unwrap().clone();
            let (actor, command) = build(&before, op, pick);
            let blocked = before
                .player(&actor)
                .and_then(|p| p.pending_decision.as_ref())
                .is_some_and(|pending| !pending.matches(&command));

            let response = engine
                .process(&code, &CommandRequest::new(actor.clone(), command))
                .unwrap();
            let after = &response.state;

            prop_assert_eq!(after.check_integrity(), Ok(()));
            for (id, player) in &after.players {
                prop_assert_eq!(player.card_count(), CARDS_PER_PLAYER);
                prop_assert_eq!(after.owned_instances(id), CARDS_PER_PLAYER);
            }
            prop_assert_eq!(after.version, before.version + u64::from(response.accepted));
            if blocked {
                prop_assert!(!response.accepted);
            }
            if !response.accepted {
                prop_assert_eq!(after, &before);
            }
        }
    }

    /// Replaying a seed and command sequence reproduces the snapshot.
    #[test]
    fn prop_replay_is_deterministic(
        seed in any::<u64>(),
        ops in prop::collection::vec((0u8..8, 0usize..64), 1..30)
    ) {
        let run = |seed: u64| {
            let (mut engine, code) = seated(seed);
            for (op, pick) in &ops {
                let state = engine.session(&code).unwrap().clone();
                let (actor, command) = build(&state, *op, *pick);
                engine
                    .process(&code, &CommandRequest::new(actor, command))
                    .unwrap();
            }
            engine.session(&code).unwrap().clone()
        };

        prop_assert_eq!(run(seed), run(seed));
    }
}
