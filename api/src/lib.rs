pub mod cache;
pub mod client;
pub mod scores365;

use chrono::{Days, NaiveDate};
use scores365::id_to_string;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Sentinels — substituted for data the provider leaves out
// ---------------------------------------------------------------------------

pub const UNAVAILABLE: &str = "Unavailable";
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";
pub const UNKNOWN_COMPETITION: &str = "Unknown Competition";
pub const HOME_PLACEHOLDER: &str = "Team A";
pub const AWAY_PLACEHOLDER: &str = "Team B";

/// True when `value` is the "Unavailable" marker (case-insensitive).
pub fn is_unavailable(value: &str) -> bool {
    value.eq_ignore_ascii_case(UNAVAILABLE)
}

// ---------------------------------------------------------------------------
// Domain types, independent of the provider wire format
// ---------------------------------------------------------------------------

/// One scheduled or in-progress event, already normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Provider ids may arrive as strings or numbers; anything else becomes empty.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_sub_category")]
    pub sub_category: String,
    #[serde(default = "default_home")]
    pub home_participant: String,
    #[serde(default = "default_away")]
    pub away_participant: String,
    #[serde(default)]
    pub home_participant_image: Option<String>,
    #[serde(default)]
    pub away_participant_image: Option<String>,
    /// `DD/MM/YYYY HH:MM[:SS]` in the display timezone, or [`UNAVAILABLE`].
    #[serde(default = "default_unavailable")]
    pub start_time: String,
    /// Comma-joined channel names, or [`UNAVAILABLE`].
    #[serde(default = "default_unavailable")]
    pub broadcast_channels: String,
}

impl Default for EventRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            category: default_category(),
            sub_category: default_sub_category(),
            home_participant: default_home(),
            away_participant: default_away(),
            home_participant_image: None,
            away_participant_image: None,
            start_time: default_unavailable(),
            broadcast_channels: default_unavailable(),
        }
    }
}

impl EventRecord {
    pub fn has_broadcast(&self) -> bool {
        !is_unavailable(&self.broadcast_channels)
    }

    pub fn has_start_time(&self) -> bool {
        !is_unavailable(self.start_time.trim())
    }

    pub fn title(&self) -> String {
        format!("{} x {}", self.home_participant, self.away_participant)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(id_to_string).unwrap_or_default())
}

fn default_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

fn default_sub_category() -> String {
    UNKNOWN_COMPETITION.to_string()
}

fn default_home() -> String {
    HOME_PLACEHOLDER.to_string()
}

fn default_away() -> String {
    AWAY_PLACEHOLDER.to_string()
}

fn default_unavailable() -> String {
    UNAVAILABLE.to_string()
}

/// Navigation axis over calendar days, relative to today. Clamped to yesterday..=tomorrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DayOffset(i8);

impl DayOffset {
    pub const MIN: i8 = -1;
    pub const MAX: i8 = 1;

    pub const YESTERDAY: DayOffset = DayOffset(-1);
    pub const TODAY: DayOffset = DayOffset(0);
    pub const TOMORROW: DayOffset = DayOffset(1);

    pub const ALL: [DayOffset; 3] = [Self::YESTERDAY, Self::TODAY, Self::TOMORROW];

    pub fn new(offset: i8) -> Self {
        Self(offset.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> i8 {
        self.0
    }

    /// Move by `delta` days, saturating at the supported range.
    pub fn shifted(self, delta: i8) -> Self {
        Self::new(self.0.saturating_add(delta))
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            -1 => "Yesterday",
            0 => "Today",
            _ => "Tomorrow",
        }
    }

    pub fn date(self, today: NaiveDate) -> NaiveDate {
        let days = Days::new(u64::from(self.0.unsigned_abs()));
        let shifted = if self.0 < 0 {
            today.checked_sub_days(days)
        } else {
            today.checked_add_days(days)
        };
        shifted.unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_offset_is_clamped() {
        assert_eq!(DayOffset::new(5), DayOffset::TOMORROW);
        assert_eq!(DayOffset::new(-9), DayOffset::YESTERDAY);
        assert_eq!(DayOffset::TOMORROW.shifted(1), DayOffset::TOMORROW);
        assert_eq!(DayOffset::TODAY.shifted(-1), DayOffset::YESTERDAY);
        assert_eq!(DayOffset::YESTERDAY.shifted(0), DayOffset::YESTERDAY);
    }

    #[test]
    fn day_offset_resolves_calendar_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            DayOffset::YESTERDAY.date(today),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(DayOffset::TODAY.date(today), today);
        assert_eq!(
            DayOffset::TOMORROW.date(today),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
    }

    #[test]
    fn missing_fields_deserialize_to_sentinels() {
        let record: EventRecord = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.category, UNKNOWN_CATEGORY);
        assert_eq!(record.sub_category, UNKNOWN_COMPETITION);
        assert_eq!(record.home_participant, HOME_PLACEHOLDER);
        assert_eq!(record.away_participant, AWAY_PLACEHOLDER);
        assert!(record.home_participant_image.is_none());
        assert!(!record.has_start_time());
        assert!(!record.has_broadcast());
    }

    #[test]
    fn ids_resolve_from_strings_and_numbers() {
        let records: Vec<EventRecord> =
            serde_json::from_str(r#"[{"id":42},{"id":" 7 "},{"category":"Football"},{"id":null},{"id":[1]}]"#)
                .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "7", "", "", ""]);
    }

    #[test]
    fn unavailable_marker_is_case_insensitive() {
        assert!(is_unavailable("Unavailable"));
        assert!(is_unavailable("UNAVAILABLE"));
        assert!(!is_unavailable("ESPN, Globo"));
    }
}
