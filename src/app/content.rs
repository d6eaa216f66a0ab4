//! Card content loaded from the authority.

use crate::cards::{CardDefinition, CardRegistry};
use crate::error::ApiError;
use crate::sync::Transport;

/// Load status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentStatus {
    /// Never loaded.
    #[default]
    Idle,
    /// A load is running.
    Loading,
    /// Cards are available (possibly from an earlier load).
    Ok,
    /// Loading failed and nothing was ever loaded.
    Error,
}

/// Card catalog plus load bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    status: ContentStatus,
    registry: CardRegistry,
    last_error: Option<String>,
    last_loaded_at_ms: Option<u64>,
}

impl ContentState {
    /// Seed with a catalog, e.g. the demo cards when running offline.
    #[must_use]
    pub fn with_registry(registry: CardRegistry) -> Self {
        let status = if registry.is_empty() {
            ContentStatus::Idle
        } else {
            ContentStatus::Ok
        };
        Self {
            status,
            registry,
            ..Self::default()
        }
    }

    /// Load status.
    #[must_use]
    pub fn status(&self) -> ContentStatus {
        self.status
    }

    /// Loaded definitions.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Rendered error of the last failed load.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the catalog was last replaced.
    #[must_use]
    pub fn last_loaded_at_ms(&self) -> Option<u64> {
        self.last_loaded_at_ms
    }

    /// Mark a load as started.
    pub fn begin(&mut self) {
        self.status = ContentStatus::Loading;
        self.last_error = None;
    }

    /// Record the result of a load. A failure keeps any earlier catalog.
    pub fn finish(&mut self, result: Result<Vec<CardDefinition>, ApiError>, now_ms: u64) {
        match result {
            Ok(cards) => {
                self.registry = CardRegistry::from_definitions(cards.into_iter().filter(|c| !c.id.is_blank()));
                self.status = ContentStatus::Ok;
                self.last_error = None;
                self.last_loaded_at_ms = Some(now_ms);
            }
            Err(err) => {
                self.status = if self.registry.is_empty() {
                    ContentStatus::Error
                } else {
                    ContentStatus::Ok
                };
                self.last_error = Some(err.explain());
            }
        }
    }

    /// Fetch the catalog through `transport`.
    pub fn load<T: Transport + ?Sized>(&mut self, transport: &mut T, now_ms: u64) -> ContentStatus {
        self.begin();
        let result = transport.card_definitions();
        if let Err(err) = &result {
            log::warn!(target: "duel_tower::sync", "card catalog load failed: {}", err.explain());
        }
        self.finish(result, now_ms);
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_catalog() {
        let mut content = ContentState::default();
        assert_eq!(content.status(), ContentStatus::Idle);

        content.begin();
        content.finish(Err(ApiError::transport("down")), 1);
        assert_eq!(content.status(), ContentStatus::Error);
        assert_eq!(content.last_error(), Some("down"));

        content.finish(Ok(vec![CardDefinition::new("C001", "Strike", 1)]), 2);
        assert_eq!(content.status(), ContentStatus::Ok);
        assert_eq!(content.registry().len(), 1);

        content.begin();
        content.finish(Err(ApiError::status(500, None)), 3);
        assert_eq!(content.status(), ContentStatus::Ok);
        assert_eq!(content.registry().len(), 1);
        assert_eq!(content.last_loaded_at_ms(), Some(2));
    }

    #[test]
    fn test_blank_ids_dropped() {
        let mut content = ContentState::default();
        content.finish(
            Ok(vec![
                CardDefinition::new("", "Nothing", 0),
                CardDefinition::new("C002", "Recovery", 1),
            ]),
            1,
        );
        assert_eq!(content.registry().len(), 1);
    }
}
