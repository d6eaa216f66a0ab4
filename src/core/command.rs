//! Commands: player intents sent to the authority.
//!
//! A command is a type tag plus a per-variant payload. On the wire it is a
//! flat JSON object:
//!
//! ```json
//! {"type": "PLAY_CARD", "commandId": "…", "expectedVersion": 4,
//!  "playerId": "me", "cardId": "me-3"}
//! ```
//!
//! `Command` carries the tag and payload; `CommandRequest` adds the envelope
//! (`commandId`, `expectedVersion`, `playerId`).
//!
//! ## Example
//!
//! ```
//! use duel_tower_sync::core::{Command, CommandRequest, PlayerId};
//!
//! let request = CommandRequest::new(PlayerId::new("me"), Command::Draw { count: 2 })
//!     .with_command_id("cmd-1")
//!     .with_expected_version(7);
//!
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["type"], "DRAW");
//! assert_eq!(json["count"], 2);
//! assert_eq!(json["expectedVersion"], 7);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{InstanceId, PlayerId};

/// Short list of ids; most selections hold one to four entries.
pub type IdList<T> = SmallVec<[T; 4]>;

fn one() -> u32 {
    1
}

/// A player intent with its type-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Begin combat: fix turn order, shuffle decks, draw opening hands.
    StartCombat,

    /// Draw cards with grave refill.
    Draw {
        /// Cards to draw.
        #[serde(default = "one")]
        count: u32,
    },

    /// End the acting player's turn.
    EndTurn,

    /// Once per turn: discard the first hand card and draw a replacement.
    HandSwap,

    /// Play a card from hand (or activate one on the field).
    #[serde(rename_all = "camelCase")]
    PlayCard {
        /// Instance being played.
        card_id: InstanceId,
        /// Ally targets.
        #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
        target_player_ids: IdList<PlayerId>,
        /// Enemy targets.
        #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
        target_enemy_ids: IdList<String>,
    },

    /// Use the EX card.
    #[serde(rename_all = "camelCase")]
    UseEx {
        /// Ally targets.
        #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
        target_player_ids: IdList<PlayerId>,
    },

    /// Resolve a hand-limit decision by discarding the listed cards.
    #[serde(rename_all = "camelCase")]
    DiscardToHandLimit {
        /// Hand cards to discard.
        #[serde(default)]
        discard_ids: IdList<InstanceId>,
    },

    /// Resolve a search decision by picking from the presented candidates.
    #[serde(rename_all = "camelCase")]
    SearchPick {
        /// Candidates picked.
        #[serde(default)]
        pick_ids: IdList<InstanceId>,
    },
}

impl Command {
    /// Wire tag of this command.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Command::StartCombat => "START_COMBAT",
            Command::Draw { .. } => "DRAW",
            Command::EndTurn => "END_TURN",
            Command::HandSwap => "HAND_SWAP",
            Command::PlayCard { .. } => "PLAY_CARD",
            Command::UseEx { .. } => "USE_EX",
            Command::DiscardToHandLimit { .. } => "DISCARD_TO_HAND_LIMIT",
            Command::SearchPick { .. } => "SEARCH_PICK",
        }
    }

    /// True for commands that resolve a pending decision.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        matches!(
            self,
            Command::DiscardToHandLimit { .. } | Command::SearchPick { .. }
        )
    }

    /// Play a card with no targets.
    #[must_use]
    pub fn play(card_id: InstanceId) -> Self {
        Command::PlayCard {
            card_id,
            target_player_ids: SmallVec::new(),
            target_enemy_ids: SmallVec::new(),
        }
    }

    /// Discard the listed hand cards.
    #[must_use]
    pub fn discard(ids: &[InstanceId]) -> Self {
        Command::DiscardToHandLimit {
            discard_ids: ids.iter().cloned().collect(),
        }
    }

    /// Pick the listed search candidates.
    #[must_use]
    pub fn pick(ids: &[InstanceId]) -> Self {
        Command::SearchPick {
            pick_ids: ids.iter().cloned().collect(),
        }
    }
}

/// A command plus its idempotence and concurrency envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    /// Idempotence key; replaying the same id must not double-apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    /// Version the sender believed current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    /// Issuing player.
    pub player_id: PlayerId,
    /// Type tag and payload.
    #[serde(flatten)]
    pub command: Command,
}

impl CommandRequest {
    /// Bare request with no envelope stamps.
    #[must_use]
    pub fn new(player_id: PlayerId, command: Command) -> Self {
        Self {
            command_id: None,
            expected_version: None,
            player_id,
            command,
        }
    }

    /// Set the idempotence key.
    #[must_use]
    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    /// Set the optimistic-concurrency stamp.
    #[must_use]
    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let json = serde_json::to_value(&Command::StartCombat).unwrap();
        assert_eq!(json["type"], "START_COMBAT");

        let json = serde_json::to_value(&Command::discard(&[InstanceId::new("a")])).unwrap();
        assert_eq!(json["type"], "DISCARD_TO_HAND_LIMIT");
        assert_eq!(json["discardIds"][0], "a");
    }

    #[test]
    fn test_selection_builders_keep_every_id() {
        let ids: Vec<InstanceId> = (1..=6).map(|n| InstanceId::new(format!("me-{n}"))).collect();

        match Command::discard(&ids) {
            Command::DiscardToHandLimit { discard_ids } => assert_eq!(discard_ids.as_slice(), &ids[..]),
            other => panic!("unexpected command {other:?}"),
        }
        match Command::pick(&ids[..1]) {
            Command::SearchPick { pick_ids } => assert_eq!(pick_ids.as_slice(), &ids[..1]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_request_parses_flat_body() {
        let body = r#"{
            "type": "PLAY_CARD",
            "commandId": "c-1",
            "expectedVersion": 3,
            "playerId": "me",
            "cardId": "me-4",
            "targetEnemyIds": ["E1"]
        }"#;
        let request: CommandRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.command_id.as_deref(), Some("c-1"));
        assert_eq!(request.expected_version, Some(3));
        match request.command {
            Command::PlayCard {
                card_id,
                target_enemy_ids,
                ..
            } => {
                assert_eq!(card_id.as_str(), "me-4");
                assert_eq!(target_enemy_ids.as_slice(), ["E1".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_draw_defaults_to_one() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"type": "DRAW", "playerId": "me"}"#).unwrap();
        assert_eq!(request.command, Command::Draw { count: 1 });
    }

    #[test]
    fn test_resolving_commands() {
        assert!(Command::pick(&[]).is_resolving());
        assert!(Command::discard(&[]).is_resolving());
        assert!(!Command::EndTurn.is_resolving());
        assert_eq!(Command::HandSwap.kind(), "HAND_SWAP");
    }
}
