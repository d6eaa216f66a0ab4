//! # duel-tower-sync
//!
//! Session synchronization and turn-resource engine for Duel Tower.
//!
//! ## Design Principles
//!
//! 1. **The authority owns the truth**: Local state is a snapshot replaced
//!    wholesale from server responses, never patched field by field.
//!
//! 2. **Versions only move forward**: Every snapshot, whatever its source,
//!    passes one guard that ignores anything not strictly newer.
//!
//! 3. **One decision at a time**: A player with a pending decision can only
//!    issue the command that resolves it.
//!
//! ## Architecture
//!
//! - **Transport seam**: `sync::Transport` is implemented by the HTTP client
//!   and by `local::LocalEngine`, so the same dispatcher drives both.
//!
//! - **Persistent Data Structures**: Zones are `im` vectors, so the local
//!   engine applies a command to an O(1) clone and commits or drops it.
//!
//! - **Seeded randomness**: Shuffles and the run map draw from the xorshift
//!   `GameRng`; the same seed and command sequence replay exactly.
//!
//! ## Modules
//!
//! - `core`: ids, commands, snapshot types, RNG, configuration
//! - `cards`: definitions, instances, the content registry
//! - `zones`: conserving zone transitions
//! - `turn`: turn order, AP, EX cooldown, hand/field limits
//! - `decision`: the pending-decision gate
//! - `events`: engine events, translation, the log book
//! - `local`: offline rules simulation behind the transport seam
//! - `sync`: transport, HTTP client, dispatcher, polling, deck catalog
//! - `persist`: key-value port and the four persisted slots
//! - `app`: the owned application context

pub mod core;
pub mod cards;
pub mod zones;
pub mod turn;
pub mod decision;
pub mod events;
pub mod local;
pub mod sync;
pub mod persist;
pub mod app;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    CardDefId, InstanceId, PlayerId,
    Command, CommandRequest,
    SessionState, PlayerState, CombatState,
    DeterministicRng, GameRng,
    ClientConfig, RulesConfig,
};

pub use crate::cards::{CardClass, CardDefinition, CardInstance, CardRegistry};

pub use crate::zones::{Zone, ZoneError, ZoneManager};

pub use crate::turn::{TurnError, TurnMachine};

pub use crate::decision::{DecisionGate, PendingDecision};

pub use crate::events::{translate, EngineEvent, LogBook, LogLevel, Translated};

pub use crate::local::LocalEngine;

pub use crate::sync::{
    Adoption, Dispatcher, EngineResponse, HttpTransport,
    SessionBinding, SubmitOutcome, SyncState, Transport,
};

pub use crate::persist::{FileStore, KeyValueStore, MemoryStore, Slot};

pub use crate::app::AppContext;

pub use crate::error::{ApiError, Error, Result};
