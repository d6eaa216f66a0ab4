//! Zone names.

use serde::{Deserialize, Serialize};

/// Named partition of a player's cards.
///
/// Every zone is player scoped; there are no shared zones. `Ex` is a single
/// slot rather than a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    /// Draw pile; index 0 is the top.
    Deck,
    /// Cards held by the player.
    Hand,
    /// Discard pile.
    Grave,
    /// Installed cards.
    Field,
    /// Removed from play but still owned.
    Excluded,
    /// The single EX slot.
    Ex,
}

impl Zone {
    /// Every zone, in display order.
    pub const ALL: [Zone; 6] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Grave,
        Zone::Field,
        Zone::Excluded,
        Zone::Ex,
    ];

    /// Wire name (`"DECK"`, `"HAND"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Deck => "DECK",
            Zone::Hand => "HAND",
            Zone::Grave => "GRAVE",
            Zone::Field => "FIELD",
            Zone::Excluded => "EXCLUDED",
            Zone::Ex => "EX",
        }
    }

    /// Zones a token may not enter; it vanishes instead.
    #[must_use]
    pub const fn removes_tokens(self) -> bool {
        matches!(self, Zone::Deck | Zone::Grave | Zone::Excluded | Zone::Ex)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for zone in Zone::ALL {
            let json = serde_json::to_string(&zone).unwrap();
            assert_eq!(json, format!("\"{}\"", zone.as_str()));
        }
    }

    #[test]
    fn test_token_zones() {
        assert!(Zone::Grave.removes_tokens());
        assert!(!Zone::Hand.removes_tokens());
        assert!(!Zone::Field.removes_tokens());
    }
}
