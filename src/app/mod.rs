//! Application layer: owned client state and its persistence.
//!
//! - `AppContext`: owns everything below plus the dispatcher and store
//! - `LocalSession`: which session, as whom, in which phase
//! - `RunState`: the seeded floor map
//! - `ContentState`: the card catalog and its load status

pub mod content;
pub mod context;
pub mod run;
pub mod session;

pub use content::{ContentState, ContentStatus};
pub use context::AppContext;
pub use run::{make_choices, NodeType, RunNode, RunState, CHOICES_PER_FLOOR, HISTORY_LIMIT};
pub use session::{LobbyPlayer, LocalSession, SessionPhase};
