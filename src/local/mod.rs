//! Local demonstration engine.
//!
//! A deterministic, serverless authority. Given the same seed and the same
//! command sequence it produces byte-identical snapshots.
//!
//! - `LocalRules`: what each command does to a snapshot
//! - `LocalEngine`: sessions, idempotence, versioning; implements `Transport`

pub mod engine;
pub mod rules;

pub use engine::{LocalEngine, CODE_LEN, DEFAULT_GM};
pub use rules::{LocalRules, Rejection};
