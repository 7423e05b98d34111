//! Embedded quote and universe-reply catalogs.
//!
//! Both catalogs are baked into the binary at compile time for hermetic
//! deployment - no external files required. A catalog that fails to parse
//! degrades to a placeholder quote instead of an error; the draw surface
//! never fails.

use crate::core::rng::RandomSource;
use serde::{Deserialize, Serialize};

pub const QUOTES_JSON: &str = include_str!("../../catalogs/quotes.json");
pub const REPLIES_JSON: &str = include_str!("../../catalogs/replies.json");

/// One affirmation card. `sent_to_universe` is the only mutable field and is
/// flipped exactly once per daily cycle by the send action.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub chinese: String,
    pub english: String,
    #[serde(default)]
    pub sent_to_universe: bool,
}

impl Quote {
    pub fn new(chinese: &str, english: &str) -> Self {
        Self {
            chinese: chinese.to_string(),
            english: english.to_string(),
            sent_to_universe: false,
        }
    }

    /// Substitute for an empty or missing catalog.
    pub fn file_not_found() -> Self {
        Self::new("文件未找到", "File not found")
    }

    /// Substitute for a catalog that exists but does not parse.
    pub fn load_failed() -> Self {
        Self::new("加载失败", "Failed to load")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UniverseReply {
    pub chinese: String,
    pub english: String,
}

/// Read-only pools of quotes and replies, loaded once at startup.
pub struct Catalog {
    quotes: Vec<Quote>,
    replies: Vec<UniverseReply>,
}

impl Catalog {
    /// Load the embedded catalogs. Parse failures leave the affected pool
    /// empty; the draw methods handle that case.
    pub fn load() -> Self {
        Self::from_json(QUOTES_JSON, REPLIES_JSON)
    }

    pub fn from_json(quotes_json: &str, replies_json: &str) -> Self {
        let quotes = match serde_json::from_str::<Vec<Quote>>(quotes_json) {
            Ok(qs) => qs,
            Err(_) => vec![Quote::load_failed()],
        };
        let replies = serde_json::from_str::<Vec<UniverseReply>>(replies_json).unwrap_or_default();
        Self { quotes, replies }
    }

    /// Uniform random quote. Repeats across days are allowed and expected.
    pub fn draw_quote(&self, rng: &mut dyn RandomSource) -> Quote {
        if self.quotes.is_empty() {
            return Quote::file_not_found();
        }
        self.quotes[rng.pick(self.quotes.len())].clone()
    }

    /// Uniform random reply, or `None` when the pool is empty.
    pub fn draw_reply(&self, rng: &mut dyn RandomSource) -> Option<UniverseReply> {
        if self.replies.is_empty() {
            return None;
        }
        Some(self.replies[rng.pick(self.replies.len())].clone())
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }
}
