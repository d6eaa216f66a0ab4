//! Error types.
//!
//! Each concern has its own `thiserror` enum next to the code that raises
//! it (`ZoneError`, `TurnError`, `PersistError`, `ConfigError`). This module
//! holds `ApiError`, the failure shape of every `Transport` call, and
//! `Error`, which wraps the others for callers that mix concerns.
//!
//! Rule rejections are not errors: they travel as `Vec<String>` reasons in
//! an `accepted = false` response.

use serde_json::Value;
use thiserror::Error;

use crate::core::{ConfigError, IntegrityError};
use crate::persist::PersistError;
use crate::turn::TurnError;
use crate::zones::ZoneError;

/// What went wrong talking to the authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response arrived (connect, timeout, I/O).
    Transport,
    /// A response arrived with a non-success status.
    Status,
    /// A response arrived but its body had the wrong shape.
    Decode,
    /// The target does not exist (unknown session code).
    NotFound,
}

/// Structured failure of a transport call.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure class.
    pub kind: ApiErrorKind,
    /// HTTP-like status code, when a response arrived.
    pub status: Option<u16>,
    /// Raw message.
    pub message: String,
    /// Response body: parsed JSON, or the raw text as a JSON string.
    pub body: Option<Value>,
}

impl ApiError {
    /// No response was received.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// Non-success status with an optional body.
    #[must_use]
    pub fn status(status: u16, body: Option<Value>) -> Self {
        let kind = if status == 404 {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::Status
        };
        Self {
            kind,
            status: Some(status),
            message: format!("HTTP {status}"),
            body,
        }
    }

    /// Body could not be decoded.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// True when no response was received; the request may be resubmitted.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind == ApiErrorKind::Transport
    }

    fn body_str(&self, key: &str) -> Option<&str> {
        self.body
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// User-facing rendering: `status · message (path)` when a status is
    /// known, otherwise the raw message.
    #[must_use]
    pub fn explain(&self) -> String {
        let message = self
            .body_str("message")
            .or_else(|| self.body_str("error"))
            .unwrap_or(&self.message);
        match self.status {
            Some(status) => match self.body_str("path") {
                Some(path) => format!("{status} · {message} ({path})"),
                None => format!("{status} · {message}"),
            },
            None => message.to_string(),
        }
    }
}

/// Any error this crate raises.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Zone transition failed.
    #[error(transparent)]
    Zone(#[from] ZoneError),
    /// Turn rule violated.
    #[error(transparent)]
    Turn(#[from] TurnError),
    /// Placement invariant violated.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    /// Persistence failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// Configuration could not be parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
