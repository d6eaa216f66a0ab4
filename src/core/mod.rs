//! Core types: identifiers, session state, commands, RNG, configuration.
//!
//! Everything here is shared by the synchronized path (snapshots from the
//! authority) and the offline path (the local engine).

pub mod command;
pub mod config;
pub mod ids;
pub mod rng;
pub mod state;

pub use command::{Command, CommandRequest, IdList};
pub use config::{ClientConfig, ConfigError, RulesConfig, ENV_BASE_URL, ENV_STORAGE_DIR};
pub use ids::{CardDefId, InstanceId, PlayerId};
pub use rng::{DeterministicRng, GameRng, GameRngState};
pub use state::{CombatState, IntegrityError, PlayerState, SessionState};
