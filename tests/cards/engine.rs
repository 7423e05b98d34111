use chrono::NaiveDate;
use yinian::cards::catalog::Catalog;
use yinian::cards::collection;
use yinian::cards::engine::{
    CardFace, Engine, KEY_DAILY_QUOTE, KEY_LAST_DRAW_DATE, KEY_UNIVERSE_REPLY, Phase,
};
use yinian::cards::language::Language;
use yinian::cards::reminder;
use yinian::core::clock::FixedClock;
use yinian::core::kv::{KvStore, MemoryKv};
use yinian::core::rng::{RandomSource, SeededRandom};

const QUOTES: &str = r#"[
    { "chinese": "我值得被温柔以待。", "english": "I deserve to be treated gently." },
    { "chinese": "小小的进步也是进步。", "english": "Small progress is still progress." },
    { "chinese": "每一天都是新的一页。", "english": "Every day is a fresh page." }
]"#;

const REPLIES: &str = r#"[
    { "chinese": "宇宙收到了你的心意。", "english": "The universe has received your intention." },
    { "chinese": "你并不孤单。", "english": "You are not alone." }
]"#;

/// Random source with fixed outcomes, for steering the 20% reply roll.
struct ScriptedRandom {
    pick: usize,
    roll: u32,
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.pick % len
    }

    fn d100(&mut self) -> u32 {
        self.roll
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_fresh_store_resolves_initial() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = SeededRandom::new(1);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    let snapshot = engine.resolve_state();
    assert_eq!(snapshot.phase, Phase::Initial);
    assert!(snapshot.quote.is_none());
    assert!(snapshot.reply.is_none());
    assert!(!snapshot.sent);
    assert!(!snapshot.saved);
    assert_eq!(snapshot.language, Language::Chinese);
}

#[test]
fn test_same_day_resume_returns_drawn_with_persisted_quote() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));

    let drawn_quote = {
        let mut rng = SeededRandom::new(7);
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.draw().unwrap().quote.unwrap()
    };

    // New process, same calendar day
    let mut rng = SeededRandom::new(99);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    let snapshot = engine.resolve_state();
    assert_eq!(snapshot.phase, Phase::Drawn);
    assert_eq!(snapshot.quote.unwrap(), drawn_quote);
    assert!(!snapshot.sent);
}

#[test]
fn test_day_rollover_returns_initial_even_after_send() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);

    {
        let clock = FixedClock(day(2025, 9, 18));
        let mut rng = ScriptedRandom { pick: 0, roll: 100 };
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.draw().unwrap();
        let snapshot = engine.send().unwrap();
        assert_eq!(snapshot.phase, Phase::Received);
    }

    // Next calendar day: stale record is superseded, not resumed
    let clock = FixedClock(day(2025, 9, 19));
    let mut rng = SeededRandom::new(1);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    assert_eq!(engine.resolve_state().phase, Phase::Initial);

    // Multi-day gap behaves the same
    let clock = FixedClock(day(2025, 10, 2));
    let mut rng = SeededRandom::new(1);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    assert_eq!(engine.resolve_state().phase, Phase::Initial);
}

#[test]
fn test_send_grants_reply_when_roll_within_chance() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 20 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    let snapshot = engine.send().unwrap();
    assert_eq!(snapshot.phase, Phase::Received);
    assert!(snapshot.sent);
    assert!(snapshot.reply.is_some());
}

#[test]
fn test_send_withholds_reply_when_roll_above_chance() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 21 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    let snapshot = engine.send().unwrap();
    assert_eq!(snapshot.phase, Phase::Received);
    assert!(snapshot.sent);
    assert!(snapshot.reply.is_none());
}

#[test]
fn test_send_with_empty_reply_pool_never_grants() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, "[]");
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    let snapshot = engine.send().unwrap();
    assert_eq!(snapshot.phase, Phase::Received);
    assert!(snapshot.reply.is_none());
}

#[test]
fn test_send_from_initial_is_noop() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    let snapshot = engine.send().unwrap();
    assert_eq!(snapshot.phase, Phase::Initial);
    assert!(kv.get(KEY_DAILY_QUOTE).unwrap().is_none());
}

#[test]
fn test_second_send_does_not_reroll() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 21 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    engine.send().unwrap();

    // A lucky roll on the second send must not matter: already Received.
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    let snapshot = engine.send().unwrap();
    assert_eq!(snapshot.phase, Phase::Received);
    assert!(snapshot.reply.is_none());
}

#[test]
fn test_reply_probability_within_expected_band() {
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = SeededRandom::new(20250918);

    let trials = 10_000;
    let mut granted = 0;
    for _ in 0..trials {
        let mut kv = MemoryKv::new();
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.draw().unwrap();
        if engine.send().unwrap().reply.is_some() {
            granted += 1;
        }
    }

    let fraction = granted as f64 / trials as f64;
    assert!(
        (0.18..=0.22).contains(&fraction),
        "reply fraction {} outside 18-22% band",
        fraction
    );
}

#[test]
fn test_flip_without_reply_is_noop() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 100 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    engine.send().unwrap();
    let snapshot = engine.flip();
    assert_eq!(snapshot.front, CardFace::Quote);
}

#[test]
fn test_flip_with_reply_toggles_front_face() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    engine.send().unwrap();
    assert_eq!(engine.resolve_state().front, CardFace::Quote);
    assert_eq!(engine.flip().front, CardFace::Reply);
    assert_eq!(engine.flip().front, CardFace::Quote);
}

#[test]
fn test_new_draw_drops_previous_reply() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };

    {
        let clock = FixedClock(day(2025, 9, 18));
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.draw().unwrap();
        assert!(engine.send().unwrap().reply.is_some());
    }

    let clock = FixedClock(day(2025, 9, 19));
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    let snapshot = engine.draw().unwrap();
    assert_eq!(snapshot.phase, Phase::Drawn);
    assert!(snapshot.reply.is_none());
    assert!(!snapshot.sent);
    assert!(kv.get(KEY_UNIVERSE_REPLY).unwrap().is_none());
}

#[test]
fn test_corrupted_daily_quote_resolves_initial() {
    let mut kv = MemoryKv::new();
    kv.set(KEY_LAST_DRAW_DATE, "2025-09-18").unwrap();
    kv.set(KEY_DAILY_QUOTE, "{not valid json").unwrap();

    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = SeededRandom::new(1);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    assert_eq!(engine.resolve_state().phase, Phase::Initial);
}

#[test]
fn test_corrupted_draw_date_resolves_initial() {
    let mut kv = MemoryKv::new();
    kv.set(KEY_LAST_DRAW_DATE, "someday").unwrap();
    kv.set(
        KEY_DAILY_QUOTE,
        r#"{"chinese":"x","english":"y","sentToUniverse":true}"#,
    )
    .unwrap();

    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = SeededRandom::new(1);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    assert_eq!(engine.resolve_state().phase, Phase::Initial);
}

#[test]
fn test_saved_flag_reflects_collection_membership() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 1, roll: 100 };
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    engine.draw().unwrap();
    assert!(!engine.resolve_state().saved);
    assert!(engine.save().unwrap());
    assert!(engine.resolve_state().saved);
}

#[test]
fn test_save_without_draw_returns_false() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = SeededRandom::new(1);
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    assert!(!engine.save().unwrap());
    assert!(collection::load(&kv).is_empty());
}

#[test]
fn test_reset_clears_everything() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));
    let mut rng = ScriptedRandom { pick: 0, roll: 1 };

    {
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.draw().unwrap();
        engine.send().unwrap();
        assert!(engine.save().unwrap());
        engine.set_language(Language::Bilingual).unwrap();
    }
    reminder::set(&mut kv, chrono::NaiveTime::from_hms_opt(8, 30, 0).unwrap()).unwrap();

    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    engine.reset().unwrap();
    let snapshot = engine.resolve_state();
    assert_eq!(snapshot.phase, Phase::Initial);
    assert_eq!(snapshot.language, Language::Chinese);

    assert!(collection::load(&kv).is_empty());
    assert!(kv.get(KEY_LAST_DRAW_DATE).unwrap().is_none());
    assert!(kv.get(KEY_DAILY_QUOTE).unwrap().is_none());
    assert!(kv.get(reminder::KEY_REMINDER_TIME).unwrap().is_none());
}

#[test]
fn test_language_preference_persists_across_engines() {
    let mut kv = MemoryKv::new();
    let catalog = Catalog::from_json(QUOTES, REPLIES);
    let clock = FixedClock(day(2025, 9, 18));

    {
        let mut rng = SeededRandom::new(1);
        let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
        engine.set_language(Language::English).unwrap();
    }

    let mut rng = SeededRandom::new(2);
    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
    assert_eq!(engine.language(), Language::English);
    assert_eq!(engine.resolve_state().language, Language::English);
}
