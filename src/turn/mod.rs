//! Turn/resource state machine.
//!
//! - `TurnMachine`: turn order, index advance, round counting
//! - `resources`: AP, EX cooldown, hand/field limits for the offline engine
//!
//! Both work directly on `CombatState` / `PlayerState` so the same rules
//! apply whether the state came from the authority or the local engine.

pub mod machine;
pub mod resources;

use thiserror::Error;

use crate::core::PlayerId;

pub use machine::{TurnMachine, TurnPhase, TurnTransition};

/// A turn or resource rule was violated.
///
/// The display strings double as rejection reasons on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TurnError {
    /// Combat has not started.
    #[error("combat not started")]
    CombatNotStarted,
    /// Combat is already running.
    #[error("combat already started")]
    CombatAlreadyStarted,
    /// No players to order.
    #[error("turn order is empty")]
    EmptyTurnOrder,
    /// A player appears twice in the turn order.
    #[error("player {0} appears twice in turn order")]
    DuplicateInTurnOrder(PlayerId),
    /// Someone other than the acting player tried to act.
    #[error("not your turn")]
    NotYourTurn,
    /// AP below the card's cost.
    #[error("not enough ap ({have} < {need})")]
    NotEnoughAp {
        /// AP available.
        have: u32,
        /// AP required.
        need: u32,
    },
    /// Field at its limit.
    #[error("field is full (max {limit})")]
    FieldFull {
        /// The field limit.
        limit: usize,
    },
    /// EX blocked by cooldown.
    #[error("ex on cooldown ({turns} turns)")]
    ExOnCooldown {
        /// Owner turn-starts remaining.
        turns: u32,
    },
    /// EX already used this turn.
    #[error("ex already used this turn")]
    ExAlreadyUsed,
    /// Hand swap already used this turn.
    #[error("hand swap already used this turn")]
    AlreadySwapped,
}
