//! Deck catalog client (`/content/decks`).
//!
//! Decks are stored by the authority; the client only lists and edits them.
//! Each deck is a named list of `(cardId, count)` pairs scoped to a
//! `DeckType`.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::HttpTransport;
use crate::core::CardDefId;
use crate::error::ApiError;

/// Who a deck is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckType {
    /// Player deck.
    Player,
    /// Enemy deck.
    Enemy,
}

/// One `(cardId, count)` line of a deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    /// Card definition.
    pub card_id: CardDefId,
    /// Copies; the authority treats a missing count as one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl DeckCard {
    /// A line with an explicit count.
    #[must_use]
    pub fn new(card_id: impl Into<CardDefId>, count: u32) -> Self {
        Self {
            card_id: card_id.into(),
            count: Some(count),
        }
    }
}

/// A stored deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Storage id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Scope.
    #[serde(rename = "type")]
    pub deck_type: DeckType,
    /// Sum of all counts.
    #[serde(default)]
    pub total_cards: u32,
    /// Card lines.
    #[serde(default)]
    pub cards: Vec<DeckCard>,
}

/// Body of create and update requests. Absent fields are left unchanged on
/// update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEdit {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New scope.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub deck_type: Option<DeckType>,
    /// Replacement (or added) card lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<DeckCard>>,
}

/// Deck CRUD against the authority.
pub trait DeckCatalog {
    /// `GET /content/decks`
    fn list_decks(&self) -> Result<Vec<Deck>, ApiError>;
    /// `GET /content/decks/{id}`
    fn deck(&self, id: i64) -> Result<Deck, ApiError>;
    /// `POST /content/decks`
    fn create_deck(&self, edit: &DeckEdit) -> Result<Deck, ApiError>;
    /// `PUT /content/decks/{id}`
    fn update_deck(&self, id: i64, edit: &DeckEdit) -> Result<Deck, ApiError>;
    /// `DELETE /content/decks/{id}`
    fn delete_deck(&self, id: i64) -> Result<(), ApiError>;
    /// `POST /content/decks/{id}/cards/add`
    fn add_deck_cards(&self, id: i64, cards: &[DeckCard]) -> Result<Deck, ApiError>;
}

impl DeckCatalog for HttpTransport {
    fn list_decks(&self) -> Result<Vec<Deck>, ApiError> {
        self.call(Method::GET, &["content", "decks"], None)
    }

    fn deck(&self, id: i64) -> Result<Deck, ApiError> {
        self.call(Method::GET, &["content", "decks", id.to_string().as_str()], None)
    }

    fn create_deck(&self, edit: &DeckEdit) -> Result<Deck, ApiError> {
        self.call(Method::POST, &["content", "decks"], Some(edit))
    }

    fn update_deck(&self, id: i64, edit: &DeckEdit) -> Result<Deck, ApiError> {
        self.call(Method::PUT, &["content", "decks", id.to_string().as_str()], Some(edit))
    }

    fn delete_deck(&self, id: i64) -> Result<(), ApiError> {
        self.call(Method::DELETE, &["content", "decks", id.to_string().as_str()], None)
    }

    fn add_deck_cards(&self, id: i64, cards: &[DeckCard]) -> Result<Deck, ApiError> {
        let body = DeckEdit {
            cards: Some(cards.to_vec()),
            ..DeckEdit::default()
        };
        self.call(
            Method::POST,
            &["content", "decks", id.to_string().as_str(), "cards", "add"],
            Some(&body),
        )
    }
}
