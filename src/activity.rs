//! Date-keyed log of logged activity.
//!
//! The log is a two-level map, month key to date key to [`Entry`]. Every
//! transition is a pure function of the previous snapshot: callers keep the
//! old value and decide what to do with the new one.

use crate::keys::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DayEntries = BTreeMap<String, Entry>;

static NO_ENTRIES: DayEntries = BTreeMap::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Entry {
    pub label: String,
    pub note: String,
}

/// Serialized as `{"YYYY-MM": {"YYYY-MM-DD": {"label", "note"}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ActivityLog {
    months: BTreeMap<String, DayEntries>,
}

impl Entry {
    pub fn new(label: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            note: note.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.trim().is_empty() && self.note.trim().is_empty()
    }

    pub fn normalized(&self) -> Self {
        Self::new(self.label.trim(), self.note.trim())
    }
}

impl ActivityLog {
    /// Entries for one `YYYY-MM` month; empty when the month was never touched.
    pub fn month_data(&self, month_key: &str) -> &DayEntries {
        self.months.get(month_key).unwrap_or(&NO_ENTRIES)
    }

    pub fn lookup(&self, date_key: &str) -> Option<&Entry> {
        let key = DateKey::parse(date_key)?;
        self.month_data(&key.month_key().to_string()).get(date_key)
    }

    pub fn entry_count(&self) -> usize {
        self.months.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// Records `entry` under `date_key`, replacing whatever was there.
///
/// An empty entry or an unparseable key leaves the log as it was, so a blank
/// submit can never erase a day.
pub fn save_day(log: &ActivityLog, date_key: &str, entry: Entry) -> ActivityLog {
    if entry.is_empty() {
        return log.clone();
    }
    let Some(key) = DateKey::parse(date_key) else {
        return log.clone();
    };

    let month_key = key.month_key().to_string();
    let mut month = log.month_data(&month_key).clone();
    month.insert(date_key.to_string(), entry);

    let mut next = log.clone();
    next.months.insert(month_key, month);
    next
}

/// Removes the entry for `date_key`.
///
/// The month map stays in place even when this leaves it empty.
pub fn clear_day(log: &ActivityLog, date_key: &str) -> ActivityLog {
    let Some(key) = DateKey::parse(date_key) else {
        return log.clone();
    };
    let month_key = key.month_key().to_string();
    let Some(month) = log.months.get(&month_key) else {
        return log.clone();
    };

    let mut month = month.clone();
    month.remove(date_key);

    let mut next = log.clone();
    next.months.insert(month_key, month);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workout() -> Entry {
        Entry::new("Workout A", "felt strong")
    }

    #[test]
    fn save_into_empty_log_creates_month() {
        let log = save_day(&ActivityLog::default(), "2025-01-15", workout());
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!({"2025-01": {"2025-01-15": {"label": "Workout A", "note": "felt strong"}}})
        );
    }

    #[test]
    fn clear_after_save_keeps_empty_month() {
        let saved = save_day(&ActivityLog::default(), "2025-01-15", workout());
        let cleared = clear_day(&saved, "2025-01-15");
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({"2025-01": {}}));
        assert_eq!(clear_day(&cleared, "2025-01-15"), cleared);
    }

    #[test]
    fn save_then_lookup_returns_entry() {
        let log = save_day(&ActivityLog::default(), "2024-02-29", workout());
        assert_eq!(log.lookup("2024-02-29"), Some(&workout()));
        assert_eq!(log.month_data("2024-02").get("2024-02-29"), Some(&workout()));
        assert_eq!(log.lookup("2024-02-28"), None);
    }

    #[test]
    fn empty_entry_is_ignored() {
        let log = save_day(&ActivityLog::default(), "2025-01-15", workout());
        for blank in [Entry::default(), Entry::new("  ", "\n\t")] {
            assert_eq!(save_day(&log, "2025-01-15", blank.clone()), log);
            assert_eq!(save_day(&log, "2025-01-16", blank), log);
        }
        assert_eq!(log.lookup("2025-01-15"), Some(&workout()));
    }

    #[test]
    fn entry_with_only_a_note_is_kept() {
        let log = save_day(&ActivityLog::default(), "2025-03-02", Entry::new("", "walk"));
        assert_eq!(log.entry_count(), 1);
    }

    #[test]
    fn save_is_idempotent_and_overwrites() {
        let once = save_day(&ActivityLog::default(), "2025-01-15", workout());
        let twice = save_day(&once, "2025-01-15", workout());
        assert_eq!(once, twice);

        let replaced = save_day(&twice, "2025-01-15", Entry::new("Tennis", ""));
        assert_eq!(replaced.lookup("2025-01-15").unwrap().label, "Tennis");
        assert_eq!(replaced.entry_count(), 1);
    }

    #[test]
    fn transitions_leave_input_untouched() {
        let original = save_day(&ActivityLog::default(), "2025-01-15", workout());
        let snapshot = original.clone();
        let _ = save_day(&original, "2025-01-16", Entry::new("Workout B", ""));
        let _ = clear_day(&original, "2025-01-15");
        assert_eq!(original, snapshot);
    }

    #[test]
    fn month_comes_from_the_date_not_the_view() {
        // A trailing cell of the December 2025 grid.
        let log = save_day(&ActivityLog::default(), "2026-01-03", workout());
        assert!(log.month_data("2025-12").is_empty());
        assert_eq!(log.month_data("2026-01").len(), 1);
    }

    #[test]
    fn clear_of_untouched_month_is_noop() {
        let log = save_day(&ActivityLog::default(), "2025-01-15", workout());
        let cleared = clear_day(&log, "2025-02-01");
        assert_eq!(cleared, log);
        assert_eq!(
            serde_json::to_value(&cleared).unwrap(),
            json!({"2025-01": {"2025-01-15": {"label": "Workout A", "note": "felt strong"}}})
        );
    }

    #[test]
    fn invalid_keys_are_noops() {
        let log = save_day(&ActivityLog::default(), "2025-01-15", workout());
        for raw in ["", "2025-02-30", "2025-1-15", "garbage"] {
            assert_eq!(save_day(&log, raw, workout()), log);
            assert_eq!(clear_day(&log, raw), log);
            assert_eq!(log.lookup(raw), None);
        }
    }

    #[test]
    fn blob_round_trip() {
        let log = save_day(&ActivityLog::default(), "2025-01-15", workout());
        let log = save_day(&log, "2025-02-01", Entry::new("Run", "5k"));
        let log = clear_day(&log, "2025-02-01");

        let blob = serde_json::to_string(&log).unwrap();
        let parsed: ActivityLog = serde_json::from_str(&blob).unwrap();
        assert_eq!(parsed, log);
    }

    #[test]
    fn normalized_trims_both_fields() {
        let entry = Entry::new("  Workout B ", " legs\n").normalized();
        assert_eq!(entry, Entry::new("Workout B", "legs"));
    }
}
