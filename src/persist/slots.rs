//! Named persistence slots.
//!
//! Four independent slots, each a JSON document under a versioned key. A
//! slot that is absent, unreadable or of the wrong shape loads as its
//! fallback; startup never fails because of stored data.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::KeyValueStore;
use super::PersistError;

/// A persisted slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Session metadata (code, phase, ids, lobby players).
    Session,
    /// Run map (seed, floor, history, choices).
    Run,
    /// Held combat snapshot and sync bookkeeping.
    Combat,
    /// Log entries and notifications.
    Log,
}

impl Slot {
    /// Every slot.
    pub const ALL: [Slot; 4] = [Slot::Session, Slot::Run, Slot::Combat, Slot::Log];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Slot::Session => "dt.session.v1",
            Slot::Run => "dt.run.v1",
            Slot::Combat => "dt.combat.v1",
            Slot::Log => "dt.log.v1",
        }
    }
}

/// Read a slot, or `None` when absent or unusable.
pub fn try_load<T: DeserializeOwned>(store: &dyn KeyValueStore, slot: Slot) -> Option<T> {
    let body = match store.get(slot.key()) {
        Ok(Some(body)) => body,
        Ok(None) => return None,
        Err(err) => {
            log::warn!(target: "duel_tower::persist", "{}: {err}", slot.key());
            return None;
        }
    };
    match serde_json::from_str(&body) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!(
                target: "duel_tower::persist",
                "{}: discarding unreadable value: {err}",
                slot.key()
            );
            None
        }
    }
}

/// Read a slot, falling back to `T::default()`.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, slot: Slot) -> T {
    try_load(store, slot).unwrap_or_default()
}

/// Write a slot.
pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, slot: Slot, value: &T) -> Result<(), PersistError> {
    let body = serde_json::to_string(value).map_err(|source| PersistError::Json {
        key: slot.key().to_string(),
        source,
    })?;
    store.set(slot.key(), &body)
}

/// Remove a slot.
pub fn clear(store: &mut dyn KeyValueStore, slot: Slot) -> Result<(), PersistError> {
    store.remove(slot.key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct RunMarker {
        floor: u32,
    }

    #[test]
    fn test_keys() {
        let keys: Vec<&str> = Slot::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["dt.session.v1", "dt.run.v1", "dt.combat.v1", "dt.log.v1"]);
    }

    #[test]
    fn test_fallbacks() {
        let mut store = MemoryStore::new();
        assert_eq!(load_or_default::<RunMarker>(&store, Slot::Run), RunMarker::default());

        store.set(Slot::Run.key(), "{not json").unwrap();
        assert_eq!(try_load::<RunMarker>(&store, Slot::Run), None);

        store.set(Slot::Run.key(), r#"{"floor": "three"}"#).unwrap();
        assert_eq!(try_load::<RunMarker>(&store, Slot::Run), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save(&mut store, Slot::Run, &RunMarker { floor: 4 }).unwrap();
        assert_eq!(try_load::<RunMarker>(&store, Slot::Run), Some(RunMarker { floor: 4 }));

        clear(&mut store, Slot::Run).unwrap();
        assert_eq!(try_load::<RunMarker>(&store, Slot::Run), None);
    }
}
