//! Engine events: what happened while a command was applied.
//!
//! On the wire every event is `{"type": "...", "payload": {...}}`. Known
//! types decode into per-variant payload structs; anything else (including a
//! known type whose payload does not match) is kept as `Unknown` with the
//! raw payload so newer authorities never break older clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::PlayerId;
use crate::zones::Zone;

/// `LOG_APPENDED` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAppended {
    /// Human-readable log line.
    #[serde(default)]
    pub line: String,
}

/// `CARDS_MOVED` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsMoved {
    /// Owner of the moved cards.
    pub player_id: PlayerId,
    /// Source zone name.
    pub from: String,
    /// Destination zone name.
    pub to: String,
    /// Number of cards moved.
    pub count: u32,
}

/// Payload naming a single player (`DECK_SHUFFLED`, `DECK_REFILLED`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    /// Affected player.
    pub player_id: PlayerId,
}

/// `PENDING_DECISION_SET` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSet {
    /// Player who must decide.
    pub player_id: PlayerId,
    /// Decision type tag.
    pub decision_type: String,
    /// Why the decision was raised.
    #[serde(default)]
    pub reason: String,
}

/// `PENDING_DECISION_CLEARED` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionCleared {
    /// Player whose decision was resolved.
    pub player_id: PlayerId,
    /// Decision type tag.
    pub decision_type: String,
}

/// `TURN_ADVANCED` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnAdvanced {
    /// Player whose turn begins.
    pub next_player_id: PlayerId,
    /// Round after advancing.
    pub round: u32,
}

/// An event emitted by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEvent", into = "RawEvent")]
pub enum EngineEvent {
    /// Free-form log line.
    LogAppended(LogAppended),
    /// Cards changed zone.
    CardsMoved(CardsMoved),
    /// A deck was shuffled.
    DeckShuffled(PlayerRef),
    /// A deck was rebuilt from the grave.
    DeckRefilled(PlayerRef),
    /// A blocking decision was raised.
    PendingDecisionSet(DecisionSet),
    /// A blocking decision was resolved.
    PendingDecisionCleared(DecisionCleared),
    /// The turn passed to another player.
    TurnAdvanced(TurnAdvanced),
    /// Any type this client does not understand.
    Unknown {
        /// Raw type tag.
        event_type: String,
        /// Raw payload.
        payload: Value,
    },
}

impl EngineEvent {
    /// Wire tag of this event.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            EngineEvent::LogAppended(_) => "LOG_APPENDED",
            EngineEvent::CardsMoved(_) => "CARDS_MOVED",
            EngineEvent::DeckShuffled(_) => "DECK_SHUFFLED",
            EngineEvent::DeckRefilled(_) => "DECK_REFILLED",
            EngineEvent::PendingDecisionSet(_) => "PENDING_DECISION_SET",
            EngineEvent::PendingDecisionCleared(_) => "PENDING_DECISION_CLEARED",
            EngineEvent::TurnAdvanced(_) => "TURN_ADVANCED",
            EngineEvent::Unknown { event_type, .. } => event_type,
        }
    }

    /// `LOG_APPENDED` with the given line.
    #[must_use]
    pub fn log(line: impl Into<String>) -> Self {
        EngineEvent::LogAppended(LogAppended { line: line.into() })
    }

    /// `CARDS_MOVED` between two zones.
    #[must_use]
    pub fn moved(player_id: &PlayerId, from: Zone, to: Zone, count: u32) -> Self {
        EngineEvent::CardsMoved(CardsMoved {
            player_id: player_id.clone(),
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            count,
        })
    }

    /// `DECK_SHUFFLED` for a player.
    #[must_use]
    pub fn shuffled(player_id: &PlayerId) -> Self {
        EngineEvent::DeckShuffled(PlayerRef {
            player_id: player_id.clone(),
        })
    }

    /// `DECK_REFILLED` for a player.
    #[must_use]
    pub fn refilled(player_id: &PlayerId) -> Self {
        EngineEvent::DeckRefilled(PlayerRef {
            player_id: player_id.clone(),
        })
    }

    /// Payload as an untyped JSON value.
    #[must_use]
    pub fn payload(&self) -> Value {
        RawEvent::from(self.clone()).payload
    }
}

/// Untyped wire shape of an event.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    payload: Value,
}

fn decode<T: serde::de::DeserializeOwned>(payload: &Value) -> Option<T> {
    serde_json::from_value(payload.clone()).ok()
}

impl From<RawEvent> for EngineEvent {
    fn from(raw: RawEvent) -> Self {
        let p = &raw.payload;
        let known = match raw.event_type.as_str() {
            "LOG_APPENDED" => decode(p).map(EngineEvent::LogAppended),
            "CARDS_MOVED" => decode(p).map(EngineEvent::CardsMoved),
            "DECK_SHUFFLED" => decode(p).map(EngineEvent::DeckShuffled),
            "DECK_REFILLED" => decode(p).map(EngineEvent::DeckRefilled),
            "PENDING_DECISION_SET" => decode(p).map(EngineEvent::PendingDecisionSet),
            "PENDING_DECISION_CLEARED" => decode(p).map(EngineEvent::PendingDecisionCleared),
            "TURN_ADVANCED" => decode(p).map(EngineEvent::TurnAdvanced),
            _ => None,
        };
        known.unwrap_or(EngineEvent::Unknown {
            event_type: raw.event_type,
            payload: raw.payload,
        })
    }
}

fn encode<T: Serialize>(event_type: &str, payload: &T) -> RawEvent {
    RawEvent {
        event_type: event_type.to_string(),
        payload: serde_json::to_value(payload).unwrap_or(Value::Null),
    }
}

impl From<EngineEvent> for RawEvent {
    fn from(event: EngineEvent) -> Self {
        let kind = event.kind().to_string();
        match event {
            EngineEvent::LogAppended(p) => encode(&kind, &p),
            EngineEvent::CardsMoved(p) => encode(&kind, &p),
            EngineEvent::DeckShuffled(p) | EngineEvent::DeckRefilled(p) => encode(&kind, &p),
            EngineEvent::PendingDecisionSet(p) => encode(&kind, &p),
            EngineEvent::PendingDecisionCleared(p) => encode(&kind, &p),
            EngineEvent::TurnAdvanced(p) => encode(&kind, &p),
            EngineEvent::Unknown { event_type, payload } => RawEvent {
                event_type,
                payload,
            },
        }
    }
}
