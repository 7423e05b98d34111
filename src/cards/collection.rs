//! Collection store: the user's explicitly saved cards.
//!
//! The whole collection is persisted as one JSON array under `savedCards`.
//! Membership is unique per quote's chinese text; cards are never mutated or
//! deleted individually - only appended, or wiped wholesale by reset.

use crate::cards::catalog::{Quote, UniverseReply};
use crate::core::error::YinianError;
use crate::core::kv::KvStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub const KEY_SAVED_CARDS: &str = "savedCards";

/// Advertised collection limit. Not enforced on insertion; surfaced to the
/// user as a reminder only, matching the original app's behavior.
pub const CAPACITY: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub id: String,
    pub date: NaiveDate,
    pub quote: Quote,
    pub universe_reply: Option<UniverseReply>,
}

impl SavedCard {
    pub fn new(date: NaiveDate, quote: Quote, universe_reply: Option<UniverseReply>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            date,
            quote,
            universe_reply,
        }
    }
}

/// Load the persisted collection in insertion order. A missing or
/// undecodable blob reads as an empty collection.
pub fn load(kv: &dyn KvStore) -> Vec<SavedCard> {
    kv.get(KEY_SAVED_CARDS)
        .ok()
        .flatten()
        .and_then(|blob| serde_json::from_str(&blob).ok())
        .unwrap_or_default()
}

/// Whether a card with this quote text is already saved.
pub fn contains(kv: &dyn KvStore, chinese: &str) -> bool {
    load(kv).iter().any(|card| card.quote.chinese == chinese)
}

/// Append iff no existing entry matches the quote's chinese text exactly.
/// Returns whether the card was added.
pub fn append(kv: &mut dyn KvStore, card: SavedCard) -> Result<bool, YinianError> {
    let mut cards = load(kv);
    if cards.iter().any(|c| c.quote.chinese == card.quote.chinese) {
        return Ok(false);
    }
    cards.push(card);
    kv.set(KEY_SAVED_CARDS, &serde_json::to_string(&cards)?)?;
    Ok(true)
}

/// All saved cards, most recent first. Pure read.
pub fn list(kv: &dyn KvStore) -> Vec<SavedCard> {
    let mut cards = load(kv);
    cards.reverse();
    cards
}

/// Empty the collection. Used only by full reset.
pub fn clear(kv: &mut dyn KvStore) -> Result<(), YinianError> {
    kv.delete(KEY_SAVED_CARDS)
}
