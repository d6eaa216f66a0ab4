//! Turn order and round progression.
//!
//! ```text
//! AwaitingStart ──start──▶ PlayerTurn(p0) ──end──▶ PlayerTurn(p1) ─ … ─▶
//!   PlayerTurn(pN) ──end──▶ RoundBoundary{r} ──▶ PlayerTurn(p0), round r+1
//! ```
//!
//! `RoundBoundary` is transient: it is reported by `advance` when the index
//! wraps, never stored.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TurnError;
use crate::core::{CombatState, PlayerId};

/// Where combat currently stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Combat has not started.
    AwaitingStart,
    /// The given player is acting.
    PlayerTurn(PlayerId),
    /// Every player acted once; the round is about to increment.
    RoundBoundary {
        /// Round that just finished.
        completed_round: u32,
    },
}

/// Result of ending a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnTransition {
    /// Player whose turn ended.
    pub previous: PlayerId,
    /// Player whose turn begins.
    pub next: PlayerId,
    /// Round after the transition.
    pub round: u32,
    /// Phases passed through, in order.
    pub phases: Vec<TurnPhase>,
}

impl TurnTransition {
    /// True when the transition crossed a round boundary.
    #[must_use]
    pub fn wrapped(&self) -> bool {
        self.phases
            .iter()
            .any(|p| matches!(p, TurnPhase::RoundBoundary { .. }))
    }
}

/// Pure turn-order logic over `CombatState`.
pub struct TurnMachine;

impl TurnMachine {
    /// Current phase of a (possibly absent) combat.
    #[must_use]
    pub fn phase(combat: Option<&CombatState>) -> TurnPhase {
        match combat.and_then(CombatState::current_player) {
            Some(player) => TurnPhase::PlayerTurn(player.clone()),
            None => TurnPhase::AwaitingStart,
        }
    }

    /// Begin combat with the given order at round 1.
    pub fn start(turn_order: Vec<PlayerId>) -> Result<CombatState, TurnError> {
        if turn_order.is_empty() {
            return Err(TurnError::EmptyTurnOrder);
        }
        let mut seen = BTreeSet::new();
        for player in &turn_order {
            if !seen.insert(player) {
                return Err(TurnError::DuplicateInTurnOrder(player.clone()));
            }
        }

        let first = turn_order[0].clone();
        Ok(CombatState {
            round: 1,
            turn_order,
            current_turn_index: 0,
            current_turn_player: Some(first),
            ..CombatState::default()
        })
    }

    /// End the current turn: advance the index modulo the order length,
    /// incrementing the round on wrap.
    pub fn advance(combat: &mut CombatState) -> Result<TurnTransition, TurnError> {
        let len = combat.turn_order.len();
        let previous = combat
            .current_player()
            .cloned()
            .ok_or(TurnError::CombatNotStarted)?;

        let next_index = (combat.current_turn_index + 1) % len;
        let mut phases = Vec::with_capacity(2);
        if next_index == 0 {
            phases.push(TurnPhase::RoundBoundary {
                completed_round: combat.round,
            });
            combat.round = combat.round.saturating_add(1);
        }

        combat.current_turn_index = next_index;
        let next = combat.turn_order[next_index].clone();
        combat.current_turn_player = Some(next.clone());
        phases.push(TurnPhase::PlayerTurn(next.clone()));

        Ok(TurnTransition {
            previous,
            next,
            round: combat.round,
            phases,
        })
    }
}
