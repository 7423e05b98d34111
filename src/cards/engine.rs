//! Affirmation engine: the daily-draw state machine.
//!
//! The engine owns every decision the presentation layer renders: which of
//! the mutually exclusive screens is active, whether today's card was sent,
//! whether a universe reply arrived, and whether the card is already in the
//! collection. All of it is reconstructed on every start from plain
//! key-value state with no schema versioning, so every read fails open:
//! absent, stale, or undecodable state resolves to `Initial`, never to an
//! error.
//!
//! Persisted keys owned by the engine:
//! - `lastDrawDate` - calendar day of the current draw (ISO `YYYY-MM-DD`)
//! - `dailyQuote` - JSON quote including the sent flag
//! - `universeReply` - JSON reply, present only when one was granted
//! - `selectedLanguage` - raw language value

use crate::cards::catalog::{Catalog, Quote, UniverseReply};
use crate::cards::collection::{self, SavedCard};
use crate::cards::language::Language;
use crate::core::clock::Clock;
use crate::core::error::YinianError;
use crate::core::kv::KvStore;
use crate::core::rng::RandomSource;
use chrono::NaiveDate;
use serde::Serialize;

pub const KEY_LAST_DRAW_DATE: &str = "lastDrawDate";
pub const KEY_DAILY_QUOTE: &str = "dailyQuote";
pub const KEY_UNIVERSE_REPLY: &str = "universeReply";
pub const KEY_SELECTED_LANGUAGE: &str = "selectedLanguage";

/// Reply granted iff a uniform 1..=100 roll is at or below this.
pub const REPLY_CHANCE_PCT: u32 = 20;

/// The three mutually exclusive screens of the daily cycle.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No card drawn today; pre-draw screen.
    Initial,
    /// A card was drawn today and not yet sent.
    Drawn,
    /// Today's card has been sent to the universe.
    Received,
}

/// Which face of the card is currently showing. Runtime-only; not persisted.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardFace {
    Quote,
    Reply,
}

/// Everything the presentation layer needs to render one screen.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub phase: Phase,
    pub quote: Option<Quote>,
    pub reply: Option<UniverseReply>,
    pub sent: bool,
    pub saved: bool,
    pub language: Language,
    pub front: CardFace,
}

/// The engine. Collaborators are injected so tests run against `MemoryKv`,
/// `FixedClock`, and `SeededRandom`.
pub struct Engine<'a> {
    kv: &'a mut dyn KvStore,
    catalog: &'a Catalog,
    clock: &'a dyn Clock,
    rng: &'a mut dyn RandomSource,
    front: CardFace,
}

/// Fail-open JSON read: any store or decode failure reads as absent.
fn read_json<T: serde::de::DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Option<T> {
    kv.get(key)
        .ok()
        .flatten()
        .and_then(|blob| serde_json::from_str(&blob).ok())
}

impl<'a> Engine<'a> {
    pub fn new(
        kv: &'a mut dyn KvStore,
        catalog: &'a Catalog,
        clock: &'a dyn Clock,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            kv,
            catalog,
            clock,
            rng,
            front: CardFace::Quote,
        }
    }

    /// Startup reconciliation: decide today's phase from persisted state.
    ///
    /// Comparison is by local calendar day, not a rolling 24 hours. A record
    /// from any earlier day means a fresh `Initial`; the stale record stays
    /// persisted until the next draw overwrites it.
    pub fn resolve_state(&self) -> StateSnapshot {
        let language = self.language();

        let last_draw = self
            .kv
            .get(KEY_LAST_DRAW_DATE)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse::<NaiveDate>().ok());

        let today = self.clock.today();
        let quote = match last_draw {
            Some(day) if day == today => read_json::<Quote>(&*self.kv, KEY_DAILY_QUOTE),
            _ => None,
        };

        let Some(quote) = quote else {
            return StateSnapshot {
                phase: Phase::Initial,
                quote: None,
                reply: None,
                sent: false,
                saved: false,
                language,
                front: self.front,
            };
        };

        let reply = read_json::<UniverseReply>(&*self.kv, KEY_UNIVERSE_REPLY);
        let sent = quote.sent_to_universe;
        let saved = collection::contains(&*self.kv, &quote.chinese);

        StateSnapshot {
            phase: if sent { Phase::Received } else { Phase::Drawn },
            quote: Some(quote),
            reply,
            sent,
            saved,
            language,
            front: self.front,
        }
    }

    /// Draw today's card, superseding any previous record in place.
    pub fn draw(&mut self) -> Result<StateSnapshot, YinianError> {
        let quote = self.catalog.draw_quote(self.rng);
        let today = self.clock.today();

        self.kv
            .set(KEY_DAILY_QUOTE, &serde_json::to_string(&quote)?)?;
        self.kv.set(KEY_LAST_DRAW_DATE, &today.to_string())?;
        self.kv.delete(KEY_UNIVERSE_REPLY)?;
        self.front = CardFace::Quote;

        Ok(self.resolve_state())
    }

    /// Send today's card to the universe. Effective only from `Drawn`;
    /// from any other phase this is a no-op returning the current snapshot.
    ///
    /// With probability 20% a random reply is attached. An empty reply pool
    /// means no reply regardless of the roll.
    pub fn send(&mut self) -> Result<StateSnapshot, YinianError> {
        let snapshot = self.resolve_state();
        if snapshot.phase != Phase::Drawn {
            return Ok(snapshot);
        }
        let Some(mut quote) = snapshot.quote else {
            return Ok(self.resolve_state());
        };

        quote.sent_to_universe = true;
        self.kv
            .set(KEY_DAILY_QUOTE, &serde_json::to_string(&quote)?)?;

        if self.rng.d100() <= REPLY_CHANCE_PCT {
            if let Some(reply) = self.catalog.draw_reply(self.rng) {
                self.kv
                    .set(KEY_UNIVERSE_REPLY, &serde_json::to_string(&reply)?)?;
            }
        }

        Ok(self.resolve_state())
    }

    /// Toggle which face is front. No-op when no reply is attached.
    pub fn flip(&mut self) -> StateSnapshot {
        let snapshot = self.resolve_state();
        if snapshot.reply.is_some() {
            self.front = match self.front {
                CardFace::Quote => CardFace::Reply,
                CardFace::Reply => CardFace::Quote,
            };
        }
        self.resolve_state()
    }

    /// Save today's card to the collection. Idempotent: a second save of the
    /// same quote text returns `false`. With no active card, returns `false`.
    pub fn save(&mut self) -> Result<bool, YinianError> {
        let snapshot = self.resolve_state();
        let Some(quote) = snapshot.quote else {
            return Ok(false);
        };
        let card = SavedCard::new(self.clock.today(), quote, snapshot.reply);
        collection::append(self.kv, card)
    }

    /// Best-effort erase of all persisted state: draw record, language,
    /// reminder time, and the collection.
    pub fn reset(&mut self) -> Result<(), YinianError> {
        self.front = CardFace::Quote;
        self.kv.clear()
    }

    /// Persisted language preference, defaulting to chinese.
    pub fn language(&self) -> Language {
        match self.kv.get(KEY_SELECTED_LANGUAGE) {
            Ok(Some(raw)) => Language::from_raw(&raw),
            _ => Language::default(),
        }
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), YinianError> {
        self.kv.set(KEY_SELECTED_LANGUAGE, language.raw())
    }
}
