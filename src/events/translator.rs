//! Event translation: engine events to user-facing log lines.
//!
//! `translate` is a pure, order-preserving mapping. It never drops an event;
//! types it does not recognise become a generic entry carrying the raw
//! payload.

use serde::{Deserialize, Serialize};

use super::event::EngineEvent;

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Routine progress.
    Info,
    /// Something needs the player's attention.
    Warn,
    /// A failure.
    Error,
}

/// One translated event, ready to be appended to a `LogBook`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translated {
    /// Severity.
    pub level: LogLevel,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Also raise a transient notification.
    pub notify: bool,
}

impl Translated {
    fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            title: title.into(),
            message: message.into(),
            notify: false,
        }
    }
}

/// Translate one event.
#[must_use]
pub fn translate_one(event: &EngineEvent) -> Translated {
    match event {
        EngineEvent::LogAppended(p) => Translated::info("LOG", p.line.clone()),
        EngineEvent::CardsMoved(p) => Translated::info(
            "Cards moved",
            format!("{}: {} {} → {}", p.player_id, p.count, p.from, p.to),
        ),
        EngineEvent::DeckShuffled(p) => {
            Translated::info("Deck shuffled", p.player_id.to_string())
        }
        EngineEvent::DeckRefilled(p) => {
            Translated::info("Deck refilled", format!("{}: grave → deck", p.player_id))
        }
        EngineEvent::PendingDecisionSet(p) => Translated {
            level: LogLevel::Warn,
            title: format!("Decision needed · {}", p.player_id),
            message: if p.reason.is_empty() {
                p.decision_type.clone()
            } else {
                format!("{} ({})", p.reason, p.decision_type)
            },
            notify: true,
        },
        EngineEvent::PendingDecisionCleared(p) => Translated::info(
            "Decision resolved",
            format!("{} · {}", p.player_id, p.decision_type),
        ),
        EngineEvent::TurnAdvanced(p) => Translated::info(
            "Turn advanced",
            format!("R{} · next: {}", p.round, p.next_player_id),
        ),
        EngineEvent::Unknown {
            event_type,
            payload,
        } => Translated::info(event_type.clone(), payload.to_string()),
    }
}

/// Translate an ordered event list, preserving order.
#[must_use]
pub fn translate(events: &[EngineEvent]) -> Vec<Translated> {
    events.iter().map(translate_one).collect()
}
