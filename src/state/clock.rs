use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scores_api::is_unavailable;

/// A record's `start_time`, parsed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTime {
    /// The provider had no start time.
    Unavailable,
    /// Calendar date-time in the display timezone, minute precision.
    At(NaiveDateTime),
    /// Neither the sentinel nor `DD/MM/YYYY HH:MM[:SS]`.
    Unparseable,
}

impl StartTime {
    pub fn parse(raw: &str) -> Self {
        if is_unavailable(raw.trim()) {
            return StartTime::Unavailable;
        }
        parse_date_time(raw).map_or(StartTime::Unparseable, StartTime::At)
    }
}

/// Where an event sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
    Unknown,
    Upcoming,
    Started,
}

impl Elapsed {
    /// Only a known past start counts; `Unknown` is treated as upcoming by the filters.
    pub fn has_started(self) -> bool {
        self == Elapsed::Started
    }
}

/// Classify `start_time` against `now`. Never fails: anything unreadable is `Unknown`.
pub fn classify(start_time: &str, now: NaiveDateTime) -> Elapsed {
    match StartTime::parse(start_time) {
        StartTime::At(at) if at >= now => Elapsed::Upcoming,
        StartTime::At(_) => Elapsed::Started,
        StartTime::Unavailable | StartTime::Unparseable => Elapsed::Unknown,
    }
}

/// The `HH:MM` part of the time segment, when there is one to show or search.
pub fn time_prefix(start_time: &str) -> Option<String> {
    if is_unavailable(start_time.trim()) {
        return None;
    }
    let (_, time) = start_time.trim().split_once(' ')?;
    let prefix: Vec<&str> = time.trim().split(':').take(2).collect();
    Some(prefix.join(":"))
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let (date, time) = raw.trim().split_once(' ')?;
    // Locale formatting sometimes leaves "DD/MM/YYYY," before the time.
    let date = date.trim_end_matches(',');

    let mut date_parts = date.split('/');
    let day: u32 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let year: i32 = date_parts.next()?.parse().ok()?;
    if date_parts.next().is_some() {
        return None;
    }

    let mut time_parts = time.trim().split(':');
    let hour: u32 = time_parts.next()?.parse().ok()?;
    let minute: u32 = time_parts.next()?.parse().ok()?;
    if let Some(second) = time_parts.next() {
        second.parse::<u32>().ok().filter(|s| *s < 60)?;
    }
    if time_parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(date.and_time(time))
}
