//! Zone system for card locations.
//!
//! Zones are fixed for this game and always player scoped: deck, hand,
//! grave, field, excluded and a single EX slot.
//!
//! ## Key Types
//!
//! - `Zone`: Zone name with its wire form
//! - `ZoneManager`: Checked card movement, draw with refill, shuffles
//! - `ZoneError`: Why a transition could not be applied

pub mod manager;
pub mod zone;

pub use manager::{MoveOutcome, ZoneError, ZoneManager};
pub use zone::Zone;
