//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Static card data (cost, keywords, type label)
//! - `CardClass`: How the offline engine routes a played card
//! - `CardInstance`: Runtime card state (zone, owner, counters)
//! - `CardRegistry`: Definition lookup plus the built-in demo catalog

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardClass, CardDefinition};
pub use instance::CardInstance;
pub use registry::CardRegistry;
