//! Decision gate: blocking rule prompts and their resolution.

pub mod gate;

pub use gate::{DecisionGate, PendingDecision, DISCARD_TO_HAND_LIMIT, SEARCH_PICK};
