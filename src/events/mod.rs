//! Engine events and their user-facing rendering.
//!
//! - `EngineEvent`: tagged event with per-variant payloads and an `Unknown` arm
//! - `translate`: pure event list → log lines mapping
//! - `LogBook`: bounded newest-first log with expiring notifications

pub mod event;
pub mod log;
pub mod translator;

pub use event::{
    CardsMoved, DecisionCleared, DecisionSet, EngineEvent, LogAppended, PlayerRef, TurnAdvanced,
};
pub use log::{LogBook, LogEntry, LogSnapshot, Notification};
pub use translator::{translate, translate_one, LogLevel, Translated};
