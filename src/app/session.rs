//! Local session metadata: which session this client is in and as whom.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Where the client is in the session flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Waiting for players.
    #[default]
    Lobby,
    /// Choosing the next run node.
    Node,
    /// In combat.
    Combat,
}

/// A seat shown in the lobby.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Ready toggle.
    #[serde(default)]
    pub ready: bool,
}

impl LobbyPlayer {
    /// A seat that is not ready yet.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ready: false,
        }
    }
}

/// Persisted session metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSession {
    /// Join code; `"—"` before any session exists.
    pub code: String,
    /// Flow phase.
    #[serde(default)]
    pub phase: SessionPhase,
    /// Game master.
    pub gm: PlayerId,
    /// This client's player.
    #[serde(default = "default_me")]
    pub me: PlayerId,
    /// Lobby seats.
    #[serde(default)]
    pub players: Vec<LobbyPlayer>,
    /// Creation time, ms since epoch.
    #[serde(default)]
    pub created_at_ms: u64,
}

fn default_me() -> PlayerId {
    PlayerId::new("me")
}

impl Default for LocalSession {
    fn default() -> Self {
        Self {
            code: "—".to_string(),
            phase: SessionPhase::Lobby,
            gm: PlayerId::new("GM"),
            me: default_me(),
            players: vec![LobbyPlayer::new("me", "Me")],
            created_at_ms: 0,
        }
    }
}

impl LocalSession {
    /// True once a real session code is held.
    #[must_use]
    pub fn has_code(&self) -> bool {
        let code = self.code.trim();
        !code.is_empty() && code != "—"
    }

    /// Metadata for a session just created by `gm`.
    #[must_use]
    pub fn created(code: impl Into<String>, gm: PlayerId, now_ms: u64) -> Self {
        Self {
            code: code.into(),
            phase: SessionPhase::Lobby,
            me: gm.clone(),
            players: vec![LobbyPlayer::new(gm.clone(), gm.as_str())],
            gm,
            created_at_ms: now_ms,
        }
    }

    /// Switch to `code` as `me`. The code is trimmed and upper-cased; the
    /// lobby keeps its seats, gaining one for `me` if missing.
    pub fn joined(&mut self, code: &str, me: PlayerId) {
        self.code = code.trim().to_uppercase();
        self.phase = SessionPhase::Lobby;
        if !self.players.iter().any(|p| p.id == me) {
            self.players.push(LobbyPlayer::new(me.clone(), me.as_str()));
        }
        self.me = me;
    }

    /// Toggle a seat's ready flag. Returns false for an unknown seat.
    pub fn set_ready(&mut self, id: &PlayerId, ready: bool) -> bool {
        match self.players.iter_mut().find(|p| &p.id == id) {
            Some(player) => {
                player.ready = ready;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_code() {
        let session = LocalSession::default();
        assert!(!session.has_code());
        assert_eq!(session.players.len(), 1);
    }

    #[test]
    fn test_join_normalizes_code() {
        let mut session = LocalSession::default();
        session.joined("  abc123 ", PlayerId::new("p2"));

        assert_eq!(session.code, "ABC123");
        assert_eq!(session.me, PlayerId::new("p2"));
        assert_eq!(session.players.len(), 2);
        assert!(session.set_ready(&PlayerId::new("p2"), true));
        assert!(!session.set_ready(&PlayerId::new("nobody"), true));
    }

    #[test]
    fn test_wire_shape() {
        let session = LocalSession::created("ABC123", PlayerId::new("gm"), 5);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["phase"], "lobby");
        assert_eq!(json["createdAtMs"], 5);

        let restored: LocalSession = serde_json::from_value(json).unwrap();
        assert_eq!(restored, session);
    }
}
