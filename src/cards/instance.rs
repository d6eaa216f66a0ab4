//! Card instances - runtime card state.
//!
//! `CardInstance` represents one physical card in a session. It records the
//! zone it currently occupies so the placement can be cross-checked against
//! the owner's zone lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{CardDefId, InstanceId, PlayerId};
use crate::zones::Zone;

/// A card instance in a session.
///
/// Counters are plain integers keyed by name (`"charge"`, `"turns"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    /// Unique id within the session.
    pub instance_id: InstanceId,
    /// Definition this instance was made from.
    pub def_id: CardDefId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Zone the instance currently occupies.
    pub zone: Zone,
    /// Named integer counters.
    #[serde(default)]
    pub counters: BTreeMap<String, i64>,
}

impl CardInstance {
    /// Create an instance with no counters.
    #[must_use]
    pub fn new(instance_id: InstanceId, def_id: CardDefId, owner_id: PlayerId, zone: Zone) -> Self {
        Self {
            instance_id,
            def_id,
            owner_id,
            zone,
            counters: BTreeMap::new(),
        }
    }

    /// Read a counter (0 when absent).
    #[must_use]
    pub fn counter(&self, key: &str) -> i64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Set a counter; zero removes it.
    pub fn set_counter(&mut self, key: impl Into<String>, value: i64) {
        let key = key.into();
        if value == 0 {
            self.counters.remove(&key);
        } else {
            self.counters.insert(key, value);
        }
    }

    /// Add `delta` to a counter and return the new value.
    pub fn modify_counter(&mut self, key: &str, delta: i64) -> i64 {
        let value = self.counter(key).saturating_add(delta);
        self.set_counter(key, value);
        value
    }
}
