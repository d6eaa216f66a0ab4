//! Synchronization with the session authority.
//!
//! ## Key Types
//!
//! - `Transport`: request/response contract (HTTP or the local engine)
//! - `HttpTransport`: blocking `reqwest` client for the remote authority
//! - `Dispatcher`: submits commands, version-guards every snapshot
//! - `PollTimer`: cooperative refresh pacing
//! - `DeckCatalog`: deck list maintenance against the authority

pub mod decks;
pub mod dispatcher;
pub mod http;
pub mod poller;
pub mod transport;

pub use decks::{Deck, DeckCard, DeckCatalog, DeckEdit, DeckType};
pub use dispatcher::{
    system_now_ms, Adoption, Dispatcher, SessionBinding, SubmitOutcome, SyncState,
};
pub use http::HttpTransport;
pub use poller::PollTimer;
pub use transport::{CreateSessionResponse, EngineResponse, JoinSessionResponse, Transport};
