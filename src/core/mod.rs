//! Core primitives for yinian's engine.
//!
//! Shared infrastructure lives here: the key-value store abstraction, the
//! SQLite backend, the error type, and the injected clock/randomness seams.

pub mod clock;
pub mod db;
pub mod error;
pub mod kv;
pub mod rng;
pub mod store;
