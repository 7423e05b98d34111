//! Reminder-time persistence.
//!
//! Scheduling and notification delivery belong to the platform shell; the
//! engine only remembers the chosen time of day and clears it on reset.

use crate::core::error::YinianError;
use crate::core::kv::KvStore;
use chrono::NaiveTime;

pub const KEY_REMINDER_TIME: &str = "reminderTime";

pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// The persisted reminder time, or 09:00 when absent or unparseable.
pub fn get(kv: &dyn KvStore) -> NaiveTime {
    kv.get(KEY_REMINDER_TIME)
        .ok()
        .flatten()
        .and_then(|raw| NaiveTime::parse_from_str(&raw, "%H:%M").ok())
        .unwrap_or_else(default_time)
}

pub fn set(kv: &mut dyn KvStore, time: NaiveTime) -> Result<(), YinianError> {
    kv.set(KEY_REMINDER_TIME, &time.format("%H:%M").to_string())
}
