//! Card subsystems: catalogs, the daily-draw engine, and the collection.

pub mod catalog;
pub mod collection;
pub mod engine;
pub mod language;
pub mod reminder;
