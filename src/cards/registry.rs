//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition known to the client,
//! either ingested from `GET /content/cards` or the built-in demo catalog.
//! It provides fast lookup by `CardDefId` and iteration in insertion order.

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::definition::CardDefinition;
use super::instance::CardInstance;
use crate::core::{CardDefId, InstanceId, SessionState};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use duel_tower_sync::cards::{CardDefinition, CardRegistry};
/// use duel_tower_sync::core::CardDefId;
///
/// let mut registry = CardRegistry::new();
/// registry.insert(CardDefinition::new("C001", "Strike", 1));
///
/// let found = registry.get(&CardDefId::new("C001")).unwrap();
/// assert_eq!(found.name, "Strike");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardDefId, CardDefinition>,
    order: Vec<CardDefId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, card: CardDefinition) {
        if !self.cards.contains_key(&card.id) {
            self.order.push(card.id.clone());
        }
        self.cards.insert(card.id.clone(), card);
    }

    /// Ingest an untyped content list. Entries with a blank id are skipped;
    /// the rest are coerced. Returns the number of definitions stored.
    pub fn ingest(&mut self, raw: &[Value]) -> usize {
        let mut stored = 0;
        for entry in raw {
            let def = CardDefinition::from_raw(entry);
            if def.id.is_blank() {
                log::debug!(target: "duel_tower::sync", "skipping card entry without id");
                continue;
            }
            self.insert(def);
            stored += 1;
        }
        stored
    }

    /// Build a registry from a list of definitions.
    #[must_use]
    pub fn from_definitions(defs: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(def);
        }
        registry
    }

    /// Get a card definition by id.
    #[must_use]
    pub fn get(&self, id: &CardDefId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Resolve the definition behind an instance in `state`.
    #[must_use]
    pub fn definition_of(&self, state: &SessionState, id: &InstanceId) -> Option<&CardDefinition> {
        state.card(id).and_then(|card| self.get(&card.def_id))
    }

    /// Resolve the definition behind an instance.
    #[must_use]
    pub fn definition_for(&self, card: &CardInstance) -> Option<&CardDefinition> {
        self.get(&card.def_id)
    }

    /// Check if a definition id is registered.
    #[must_use]
    pub fn contains(&self, id: &CardDefId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.iter().filter(move |c| predicate(c))
    }

    /// Built-in catalog used by the offline engine.
    #[must_use]
    pub fn demo_catalog() -> Self {
        Self::from_definitions([
            CardDefinition::new("C001", "Strike", 1)
                .with_type("ATTACK")
                .with_text("Deal damage to a single target."),
            CardDefinition::new("C002", "Recovery", 1)
                .with_type("SUPPORT")
                .with_text("Restore HP and grant regeneration."),
            CardDefinition::new("C003", "Guard", 1)
                .with_type("DEFENSE")
                .with_text("Grant a barrier."),
            CardDefinition::new("C004", "Weakness", 1)
                .with_type("CURSE")
                .with_text("Apply weakness."),
            CardDefinition::new("C005", "Tactical Search", 1)
                .with_type("SEARCH")
                .with_text("Search the deck for one card, then shuffle."),
            CardDefinition::new("C006", "Install Turret", 2)
                .with_type("INSTALL")
                .with_text("Install on the field."),
            CardDefinition::new("C007", "Charge", 1)
                .with_type("SUPPORT")
                .with_text("Empower the next attack."),
            CardDefinition::new("C008", "Bash", 2)
                .with_type("ATTACK")
                .with_text("Deal damage and apply vulnerable."),
            CardDefinition::new("C009", "Stun", 2)
                .with_type("CURSE")
                .with_text("Apply stun."),
            CardDefinition::new("EX901", "Bandage Wrap", 1)
                .with_type("EX")
                .with_text("Restore a little HP to an ally."),
        ])
    }

    /// Default twelve-card demo deck.
    #[must_use]
    pub fn demo_deck() -> Vec<CardDefId> {
        [
            ("C001", 3),
            ("C003", 3),
            ("C002", 2),
            ("C005", 2),
            ("C006", 2),
        ]
        .into_iter()
        .flat_map(|(id, count)| std::iter::repeat(CardDefId::new(id)).take(count))
        .collect()
    }

    /// EX card handed to every joining player.
    #[must_use]
    pub fn demo_ex() -> CardDefId {
        CardDefId::new("EX901")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardClass;
    use serde_json::json;

    #[test]
    fn test_registry_basic() {
        let mut registry = CardRegistry::new();
        registry.insert(CardDefinition::new("C001", "Strike", 1));
        registry.insert(CardDefinition::new("C002", "Recovery", 1));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&CardDefId::new("C001")));
        assert!(!registry.contains(&CardDefId::new("C099")));
    }

    #[test]
    fn test_insert_replaces_and_keeps_order() {
        let mut registry = CardRegistry::new();
        registry.insert(CardDefinition::new("C001", "Strike", 1));
        registry.insert(CardDefinition::new("C002", "Recovery", 1));
        registry.insert(CardDefinition::new("C001", "Heavy Strike", 2));

        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Heavy Strike", "Recovery"]);
    }

    #[test]
    fn test_ingest_skips_blank_ids() {
        let mut registry = CardRegistry::new();
        let stored = registry.ingest(&[
            json!({"id": "C001", "name": "Strike", "cost": 1}),
            json!({"name": "no id"}),
            json!({"id": {"value": "C002"}}),
        ]);

        assert_eq!(stored, 2);
        assert_eq!(registry.get(&CardDefId::new("C002")).unwrap().name, "C002");
    }

    #[test]
    fn test_demo_catalog() {
        let registry = CardRegistry::demo_catalog();
        let deck = CardRegistry::demo_deck();

        assert_eq!(deck.len(), 12);
        assert!(deck.iter().all(|id| registry.contains(id)));
        assert_eq!(
            registry.get(&CardRegistry::demo_ex()).unwrap().class(),
            CardClass::Ex
        );
        let searches = registry.find(|c| c.class() == CardClass::Search).count();
        assert_eq!(searches, 1);
    }
}
