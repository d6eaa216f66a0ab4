//! Transport trait: the request/response contract with the authority.
//!
//! Two implementations ship with the crate:
//! - `HttpTransport`: the remote authority over HTTP
//! - `LocalEngine`: the offline demonstration engine
//!
//! ## Implementation Notes
//!
//! - A rule rejection is `Ok(EngineResponse { accepted: false, .. })`, never
//!   an `Err`; `Err` means no usable response arrived.
//! - `send_command` must treat a repeated `commandId` as a no-op.
//! - Every response carries the authority's full current snapshot.

use serde::{Deserialize, Serialize};

use crate::cards::CardDefinition;
use crate::core::{CommandRequest, PlayerId, SessionState};
use crate::error::ApiError;
use crate::events::EngineEvent;

/// Outcome of one command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResponse {
    /// Whether the command was applied.
    pub accepted: bool,
    /// Rejection reasons, verbatim.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Events emitted while applying, in order.
    #[serde(default)]
    pub events: Vec<EngineEvent>,
    /// Authority state after the command (unchanged on rejection).
    pub state: SessionState,
}

impl EngineResponse {
    /// An accepted response.
    #[must_use]
    pub fn accepted(state: SessionState, events: Vec<EngineEvent>) -> Self {
        Self {
            accepted: true,
            errors: Vec::new(),
            events,
            state,
        }
    }

    /// A rejected response carrying the unaffected state.
    #[must_use]
    pub fn rejected(state: SessionState, errors: Vec<String>) -> Self {
        Self {
            accepted: false,
            errors,
            events: Vec::new(),
            state,
        }
    }
}

/// `POST /sessions` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    /// Join code of the new session.
    pub code: String,
    /// Game master id.
    pub gm_id: PlayerId,
    /// Initial state.
    pub state: SessionState,
}

/// `POST /sessions/{code}/join` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinSessionResponse {
    /// State after joining.
    pub state: SessionState,
}

/// Request/response access to a session authority.
pub trait Transport {
    /// `POST /sessions {gmId}`
    fn create_session(&mut self, gm_id: &PlayerId) -> Result<CreateSessionResponse, ApiError>;

    /// `GET /sessions/{code}`
    fn session_state(&mut self, code: &str) -> Result<SessionState, ApiError>;

    /// `POST /sessions/{code}/join {playerId}`
    fn join_session(
        &mut self,
        code: &str,
        player_id: &PlayerId,
    ) -> Result<JoinSessionResponse, ApiError>;

    /// `POST /sessions/{code}/command`
    fn send_command(
        &mut self,
        code: &str,
        request: &CommandRequest,
    ) -> Result<EngineResponse, ApiError>;

    /// `GET /content/cards`, already coerced.
    fn card_definitions(&mut self) -> Result<Vec<CardDefinition>, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn create_session(&mut self, gm_id: &PlayerId) -> Result<CreateSessionResponse, ApiError> {
        (**self).create_session(gm_id)
    }

    fn session_state(&mut self, code: &str) -> Result<SessionState, ApiError> {
        (**self).session_state(code)
    }

    fn join_session(
        &mut self,
        code: &str,
        player_id: &PlayerId,
    ) -> Result<JoinSessionResponse, ApiError> {
        (**self).join_session(code, player_id)
    }

    fn send_command(
        &mut self,
        code: &str,
        request: &CommandRequest,
    ) -> Result<EngineResponse, ApiError> {
        (**self).send_command(code, request)
    }

    fn card_definitions(&mut self) -> Result<Vec<CardDefinition>, ApiError> {
        (**self).card_definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_wire_shape() {
        let body = json!({
            "accepted": false,
            "errors": ["version mismatch"],
            "events": [{"type": "LOG_APPENDED", "payload": {"line": "hi"}}],
            "state": {"sessionCode": "ABC123", "version": 9, "players": {}, "combat": null, "cards": {}}
        });
        let response: EngineResponse = serde_json::from_value(body).unwrap();

        assert!(!response.accepted);
        assert_eq!(response.errors, vec!["version mismatch".to_string()]);
        assert_eq!(response.events, vec![EngineEvent::log("hi")]);
        assert_eq!(response.state.version, 9);
    }

    #[test]
    fn test_create_response_shape() {
        let body = json!({
            "code": "ABC123",
            "gmId": "gm",
            "state": {"sessionCode": "ABC123", "version": 0}
        });
        let response: CreateSessionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.gm_id, PlayerId::new("gm"));
    }
}
