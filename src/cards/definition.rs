//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type, as served
//! by `GET /content/cards`. Instance-specific data (zone, owner, counters)
//! lives in `CardInstance`.
//!
//! ## Ingestion
//!
//! Content arrives loosely typed. `CardDefinition::from_raw` never fails:
//! - `id` may be `"C001"` or `{"value": "C001"}`
//! - a missing name falls back to the id
//! - a missing, negative or non-numeric cost becomes 0
//! - missing keywords become an empty set

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::CardDefId;
use crate::zones::Zone;

/// How the local engine resolves a played card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardClass {
    /// Damage cards; resolve to the grave.
    Attack,
    /// Everything without special routing; resolves to the grave.
    Utility,
    /// Stays on the field, subject to the field limit.
    Install,
    /// Opens a candidate view over the deck.
    Search,
    /// Lives in the EX slot; used through `USE_EX` only.
    Ex,
}

/// Static definition of a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    /// Definition id.
    pub id: CardDefId,
    /// Display name.
    pub name: String,
    /// Free-form type label (`"ATTACK"`, `"INSTALL"`, `"EX"`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// AP cost.
    #[serde(default)]
    pub cost: u32,
    /// Keyword set.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Zone the card goes to after it resolves, overriding its class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_to: Option<Zone>,
    /// Tokens vanish instead of entering the deck, grave, excluded or EX zones.
    #[serde(default)]
    pub token: bool,
    /// Rules text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CardDefinition {
    /// Create a definition with no keywords.
    #[must_use]
    pub fn new(id: impl Into<CardDefId>, name: impl Into<String>, cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_type: None,
            cost,
            keywords: Vec::new(),
            resolve_to: None,
            token: false,
            text: None,
        }
    }

    /// Set the type label.
    #[must_use]
    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    /// Add a keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Set rules text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the zone the card resolves to.
    #[must_use]
    pub fn resolving_to(mut self, zone: Zone) -> Self {
        self.resolve_to = Some(zone);
        self
    }

    /// Mark as a token.
    #[must_use]
    pub fn as_token(mut self) -> Self {
        self.token = true;
        self
    }

    /// Build a definition from an untyped content entry, coercing bad fields.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let id = flatten_id(raw.get("id")).unwrap_or_default();
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| id.clone(), str::to_string);
        let cost = raw
            .get("cost")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .map_or(0, |c| u32::try_from(c.max(0)).unwrap_or(u32::MAX));
        let keywords = raw
            .get("keywords")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|k| flatten_id(Some(k)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: CardDefId::new(id),
            name,
            card_type: raw.get("type").and_then(Value::as_str).map(str::to_string),
            cost,
            keywords,
            resolve_to: raw
                .get("resolveTo")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            token: raw.get("token").and_then(Value::as_bool).unwrap_or(false),
            text: raw.get("text").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// Check for a keyword, ignoring ASCII case.
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Routing class used by the local engine.
    #[must_use]
    pub fn class(&self) -> CardClass {
        let labels = || {
            self.card_type
                .iter()
                .chain(self.keywords.iter())
                .map(|s| s.to_ascii_uppercase())
        };

        if labels().any(|l| l == "EX") || self.id.as_str().starts_with("EX") {
            CardClass::Ex
        } else if labels().any(|l| l.contains("SEARCH") || l.contains("서치"))
            || self.name.contains("Search")
        {
            CardClass::Search
        } else if labels().any(|l| {
            l.contains("INSTALL") || l.contains("SUMMON") || l.contains("설치") || l.contains("소환")
        }) {
            CardClass::Install
        } else if labels().any(|l| l.contains("ATTACK") || l.contains("공격")) {
            CardClass::Attack
        } else {
            CardClass::Utility
        }
    }
}

/// Accept `"X"` or `{"value": "X"}`; numbers are stringified.
fn flatten_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => flatten_id(map.get("value")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_flattens_wrapped_id() {
        let def = CardDefinition::from_raw(&json!({
            "id": {"value": "C001"},
            "name": "Strike",
            "cost": 1,
            "keywords": ["ATTACK"]
        }));
        assert_eq!(def.id.as_str(), "C001");
        assert_eq!(def.name, "Strike");
        assert_eq!(def.cost, 1);
        assert_eq!(def.class(), CardClass::Attack);
    }

    #[test]
    fn test_from_raw_coerces_missing_fields() {
        let def = CardDefinition::from_raw(&json!({"id": "C009"}));
        assert_eq!(def.name, "C009");
        assert_eq!(def.cost, 0);
        assert!(def.keywords.is_empty());

        let def = CardDefinition::from_raw(&json!({"name": "Nameless", "cost": -3}));
        assert!(def.id.is_blank());
        assert_eq!(def.cost, 0);

        let def = CardDefinition::from_raw(&json!("garbage"));
        assert!(def.id.is_blank());
        assert!(def.name.is_empty());
    }

    #[test]
    fn test_classes() {
        let search = CardDefinition::new("C005", "Tactical Search", 1);
        assert_eq!(search.class(), CardClass::Search);

        let turret = CardDefinition::new("C006", "Install Turret", 2).with_keyword("install");
        assert_eq!(turret.class(), CardClass::Install);

        let ex = CardDefinition::new("EX901", "Bandage Wrap", 1);
        assert_eq!(ex.class(), CardClass::Ex);

        let guard = CardDefinition::new("C003", "Guard", 1).with_type("DEFENSE");
        assert_eq!(guard.class(), CardClass::Utility);
    }

    #[test]
    fn test_resolve_to_zone() {
        let def = CardDefinition::from_raw(&json!({"id": "C011", "resolveTo": "EXCLUDED"}));
        assert_eq!(def.resolve_to, Some(Zone::Excluded));

        let def = CardDefinition::from_raw(&json!({"id": "C012", "resolveTo": "NOWHERE"}));
        assert_eq!(def.resolve_to, None);
    }

    #[test]
    fn test_keyword_case() {
        let def = CardDefinition::new("C010", "Anchor", 0).with_keyword("Immovable");
        assert!(def.has_keyword("IMMOVABLE"));
    }
}
