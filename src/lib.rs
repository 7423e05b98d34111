//! Yinian (一念): a daemonless, local-first daily affirmation card engine.
//!
//! **One thought a day.** Each day the user draws an affirmation card, may
//! send it to the universe (with a small chance of a reply card), can flip
//! between the quote and the reply, and may save cards to a bounded personal
//! collection.
//!
//! # Core Principles
//!
//! - **Local-first**: All state is one SQLite key-value database under
//!   `~/.yinian/data`; nothing leaves the machine
//! - **Fail-open**: Missing, stale, or corrupted state resolves to the
//!   pre-draw screen, never to an error
//! - **Presentation-agnostic**: The engine decides; this CLI (or any other
//!   shell) only renders snapshots and forwards intents
//!
//! # Crate Structure
//!
//! - [`core`]: shared primitives (key-value store, errors, clock, randomness)
//! - [`cards`]: catalogs, the daily-draw engine, and the collection

pub mod cards;
pub mod core;

use cards::catalog::{Catalog, Quote, UniverseReply};
use cards::collection;
use cards::engine::{CardFace, Engine, Phase, StateSnapshot};
use cards::language::Language;
use cards::reminder;
use core::clock::SystemClock;
use core::error::YinianError;
use core::kv::SqliteKv;
use core::rng::SystemRandom;
use core::store::Store;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "yinian",
    version = env!("CARGO_PKG_VERSION"),
    about = "每日一念 - draw one affirmation a day, send it to the universe, keep the replies"
)]
struct Cli {
    /// Data directory (defaults to ~/.yinian/data).
    #[clap(long, global = true)]
    dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show today's state (pre-draw, drawn, or sent)
    #[clap(name = "status", visible_alias = "s")]
    Status {
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },

    /// Draw today's card
    #[clap(name = "draw", visible_alias = "d")]
    Draw,

    /// Send today's card to the universe
    #[clap(name = "send")]
    Send,

    /// Flip between the quote and the universe reply
    #[clap(name = "flip", visible_alias = "f")]
    Flip,

    /// Save today's card to the collection
    #[clap(name = "save")]
    Save,

    /// Browse the saved-card collection
    #[clap(name = "collection", visible_alias = "c")]
    Collection(CollectionCli),

    /// Display-language preference
    #[clap(name = "lang")]
    Lang(LangCli),

    /// Daily reminder time
    #[clap(name = "remind")]
    Remind(RemindCli),

    /// Erase all app data and start over
    #[clap(name = "reset")]
    Reset {
        /// Skip the confirmation prompt.
        #[clap(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
struct CollectionCli {
    #[clap(subcommand)]
    command: CollectionCommand,
}

#[derive(Subcommand, Debug)]
enum CollectionCommand {
    /// List saved cards, most recent first
    List {
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
}

#[derive(clap::Args, Debug)]
struct LangCli {
    #[clap(subcommand)]
    command: LangCommand,
}

#[derive(Subcommand, Debug)]
enum LangCommand {
    /// Show the current language preference
    Show,
    /// Set the language: chinese, english, or bilingual
    Set { language: Language },
}

#[derive(clap::Args, Debug)]
struct RemindCli {
    #[clap(subcommand)]
    command: RemindCommand,
}

#[derive(Subcommand, Debug)]
enum RemindCommand {
    /// Show the reminder time
    Show,
    /// Set the reminder time (HH:MM)
    Set { time: String },
}

/// Render a card's text in the selected language.
fn render_quote(quote: &Quote, language: Language) -> String {
    match language {
        Language::Chinese => quote.chinese.clone(),
        Language::English => quote.english.clone(),
        Language::Bilingual => format!("{}\n{}", quote.chinese, quote.english),
    }
}

fn render_reply(reply: &UniverseReply, language: Language) -> String {
    match language {
        Language::Chinese => reply.chinese.clone(),
        Language::English => reply.english.clone(),
        Language::Bilingual => format!("{}\n{}", reply.chinese, reply.english),
    }
}

fn print_snapshot(snapshot: &StateSnapshot) {
    match snapshot.phase {
        Phase::Initial => {
            println!("{}", "每日一念".bold());
            println!("深呼吸，抽出今日一念 - run {}", "yinian draw".bright_cyan());
        }
        Phase::Drawn | Phase::Received => {
            match (snapshot.front, &snapshot.reply, &snapshot.quote) {
                (CardFace::Reply, Some(reply), _) => {
                    println!("{}", "来自宇宙的回信:".bold().yellow());
                    println!("{}", render_reply(reply, snapshot.language));
                }
                (_, _, Some(quote)) => {
                    println!("{}", render_quote(quote, snapshot.language).bold());
                }
                _ => {}
            }
            println!();
            if snapshot.sent {
                if snapshot.reply.is_some() {
                    println!(
                        "{} sent - a reply arrived, {} to read it",
                        "✓".bright_green(),
                        "yinian flip".bright_cyan()
                    );
                } else {
                    println!("{} sent to the universe", "✓".bright_green());
                }
            } else {
                println!("{} not sent yet - try {}", "▸".bright_yellow(), "yinian send".bright_cyan());
            }
            if snapshot.saved {
                println!("{} in your collection", "✓".bright_green());
            }
        }
    }
}

pub fn run() -> Result<(), YinianError> {
    let cli = Cli::parse();
    let store = Store::resolve(cli.dir)?;

    let mut kv = SqliteKv::open(&store.root)?;
    let catalog = Catalog::load();
    let clock = SystemClock;
    let mut rng = SystemRandom;
    let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);

    match cli.command {
        Command::Status { format } => {
            let snapshot = engine.resolve_state();
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot);
            }
        }
        Command::Draw => {
            let before = engine.resolve_state();
            if before.phase != Phase::Initial {
                println!("{} already drawn today:", "✓".bright_green());
                println!();
                print_snapshot(&before);
                return Ok(());
            }
            let snapshot = engine.draw()?;
            print_snapshot(&snapshot);
        }
        Command::Send => {
            let before = engine.resolve_state();
            match before.phase {
                Phase::Initial => {
                    println!("Nothing to send - draw today's card first: {}", "yinian draw".bright_cyan());
                }
                Phase::Received => {
                    println!("{} already sent today", "✓".bright_green());
                }
                Phase::Drawn => {
                    let snapshot = engine.send()?;
                    if snapshot.reply.is_some() {
                        println!("{}", "宇宙回信了! The universe replied!".bold().yellow());
                        println!("Run {} to read it.", "yinian flip".bright_cyan());
                    } else {
                        println!("{} sent to the universe", "✓".bright_green());
                    }
                }
            }
        }
        Command::Flip => {
            let before = engine.resolve_state();
            if before.reply.is_none() {
                println!("No reply to flip to yet.");
                return Ok(());
            }
            let snapshot = engine.flip();
            print_snapshot(&snapshot);
        }
        Command::Save => {
            let added = engine.save()?;
            let snapshot = engine.resolve_state();
            if snapshot.quote.is_none() {
                println!("Nothing to save - draw today's card first: {}", "yinian draw".bright_cyan());
            } else if added {
                let count = collection::load(&kv).len();
                println!("{} saved to your collection ({} / {})", "✓".bright_green(), count, collection::CAPACITY);
            } else {
                println!("Already in your collection.");
            }
        }
        Command::Collection(collection_cli) => match collection_cli.command {
            CollectionCommand::List { format } => {
                let language = {
                    let engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
                    engine.language()
                };
                let cards = collection::list(&kv);
                if format == "json" {
                    println!("{}", serde_json::to_string_pretty(&cards)?);
                } else if cards.is_empty() {
                    println!("收藏夹是空的 - the collection is empty.");
                } else {
                    for card in &cards {
                        let marker = if card.universe_reply.is_some() {
                            "✉".bright_yellow()
                        } else {
                            "·".normal()
                        };
                        println!(
                            "{} {}  {}",
                            marker,
                            card.date.to_string().bright_black(),
                            render_quote(&card.quote, language)
                        );
                    }
                    println!();
                    println!(
                        "{}",
                        format!("已收藏 {} / {} 张卡片", cards.len(), collection::CAPACITY).bright_black()
                    );
                }
            }
        },
        Command::Lang(lang_cli) => match lang_cli.command {
            LangCommand::Show => {
                println!("{}", engine.language());
            }
            LangCommand::Set { language } => {
                engine.set_language(language)?;
                println!("{} language set to {}", "✓".bright_green(), language);
            }
        },
        Command::Remind(remind_cli) => match remind_cli.command {
            RemindCommand::Show => {
                println!("{}", reminder::get(&kv).format("%H:%M"));
            }
            RemindCommand::Set { time } => {
                let parsed = NaiveTime::parse_from_str(&time, "%H:%M").map_err(|_| {
                    YinianError::ValidationError(format!("invalid time '{}' (expected HH:MM)", time))
                })?;
                reminder::set(&mut kv, parsed)?;
                println!("{} daily reminder set to {}", "✓".bright_green(), parsed.format("%H:%M"));
            }
        },
        Command::Reset { yes } => {
            if !yes {
                println!("This erases today's draw, your language preference, the reminder time,");
                println!("and the whole collection. Re-run with {} to confirm.", "--yes".bright_cyan());
                return Ok(());
            }
            let mut engine = Engine::new(&mut kv, &catalog, &clock, &mut rng);
            engine.reset()?;
            println!("{} all app data erased", "✓".bright_green());
        }
    }

    Ok(())
}
