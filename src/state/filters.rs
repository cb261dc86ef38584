use crate::state::clock::{classify, time_prefix};
use chrono::NaiveDateTime;
use scores_api::EventRecord;

/// The user-controlled gates a record must pass to be listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub search_query: String,
    pub include_no_broadcast: bool,
    pub include_started: bool,
}

impl EventFilter {
    /// Lowercased, trimmed query; `None` when the query gate is open.
    pub fn normalized_query(&self) -> Option<String> {
        let query = self.search_query.trim();
        (!query.is_empty()).then(|| query.to_lowercase())
    }

    pub fn matches(&self, event: &EventRecord, now: NaiveDateTime) -> bool {
        self.passes_broadcast(event)
            && self.passes_elapsed(event, now)
            && self
                .normalized_query()
                .is_none_or(|query| matches_query(event, &query))
    }

    pub fn apply<'a, I>(&self, events: I, now: NaiveDateTime) -> Vec<&'a EventRecord>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let query = self.normalized_query();
        events
            .into_iter()
            .filter(|event| {
                self.passes_broadcast(event)
                    && self.passes_elapsed(event, now)
                    && query.as_deref().is_none_or(|q| matches_query(event, q))
            })
            .collect()
    }

    fn passes_broadcast(&self, event: &EventRecord) -> bool {
        self.include_no_broadcast || event.has_broadcast()
    }

    fn passes_elapsed(&self, event: &EventRecord, now: NaiveDateTime) -> bool {
        self.include_started || !classify(&event.start_time, now).has_started()
    }
}

/// Substring match of an already-lowercased query against competition, participants and start time.
pub fn matches_query(event: &EventRecord, query: &str) -> bool {
    event.sub_category.to_lowercase().contains(query)
        || event.home_participant.to_lowercase().contains(query)
        || event.away_participant.to_lowercase().contains(query)
        || time_prefix(&event.start_time).is_some_and(|hhmm| hhmm.contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scores_api::UNAVAILABLE;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn event(id: &str, start: &str, broadcast: &str) -> EventRecord {
        EventRecord {
            id: id.into(),
            category: "Football".into(),
            sub_category: "League X".into(),
            home_participant: "Flamengo".into(),
            away_participant: "Palmeiras".into(),
            start_time: start.into(),
            broadcast_channels: broadcast.into(),
            ..Default::default()
        }
    }

    fn filter(query: &str, include_no_broadcast: bool, include_started: bool) -> EventFilter {
        EventFilter {
            search_query: query.into(),
            include_no_broadcast,
            include_started,
        }
    }

    #[test]
    fn unbroadcast_event_hidden_by_default() {
        let events = vec![event("1", "01/01/2030 10:00", UNAVAILABLE)];
        assert!(filter("", false, false).apply(&events, now()).is_empty());
    }

    #[test]
    fn permissive_gates_keep_event_past_or_future() {
        let future = vec![event("1", "01/01/2030 10:00", UNAVAILABLE)];
        let past = vec![event("1", "01/01/2020 10:00", UNAVAILABLE)];
        let open = filter("", true, true);
        assert_eq!(open.apply(&future, now()).len(), 1);
        assert_eq!(open.apply(&past, now()).len(), 1);
    }

    #[test]
    fn query_matches_time_prefix() {
        let events = vec![event("1", "01/01/2030 10:00", UNAVAILABLE)];
        let result = filter("10:0", true, false).apply(&events, now());
        assert_eq!(result.len(), 1);

        let no_time = vec![event("2", UNAVAILABLE, "Globo")];
        assert!(filter("10:0", true, true).apply(&no_time, now()).is_empty());
    }

    #[test]
    fn query_does_not_look_at_seconds_or_date() {
        let events = vec![event("1", "01/01/2030 10:00:45", "Globo")];
        assert!(filter("45", false, false).apply(&events, now()).is_empty());
        assert!(filter("2030", false, false).apply(&events, now()).is_empty());
    }

    #[test]
    fn query_is_trimmed_and_case_insensitive() {
        let events = vec![event("1", "01/01/2030 10:00", "Globo")];
        assert_eq!(filter("  FLAMENGO ", false, false).apply(&events, now()).len(), 1);
        assert_eq!(filter("palm", false, false).apply(&events, now()).len(), 1);
        assert_eq!(filter("league x", false, false).apply(&events, now()).len(), 1);
        assert!(filter("corinthians", false, false).apply(&events, now()).is_empty());
    }

    #[test]
    fn whitespace_query_leaves_gate_open() {
        let events = vec![event("1", "01/01/2030 10:00", "Globo")];
        assert_eq!(filter("   ", false, false).apply(&events, now()).len(), 1);
    }

    #[test]
    fn started_events_hidden_unless_included() {
        let events = vec![
            event("past", "17/10/2026 11:59", "Globo"),
            event("future", "17/10/2026 12:00", "Globo"),
            event("unknown", "whenever", "Globo"),
        ];
        let visible: Vec<&str> = filter("", false, false)
            .apply(&events, now())
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(visible, vec!["future", "unknown"]);
        assert_eq!(filter("", false, true).apply(&events, now()).len(), 3);
    }

    #[test]
    fn including_unbroadcast_only_adds_records() {
        let events = vec![
            event("1", "01/01/2030 10:00", UNAVAILABLE),
            event("2", "01/01/2030 11:00", "Globo"),
            event("3", "01/01/2020 11:00", UNAVAILABLE),
            event("4", "01/01/2020 11:00", "ESPN"),
        ];
        for (query, started) in [("", false), ("", true), ("flamengo", false), ("11:", true)] {
            let narrow = filter(query, false, started).apply(&events, now());
            let wide = filter(query, true, started).apply(&events, now());
            assert!(narrow.iter().all(|e| wide.contains(e)), "{query} {started}");
            assert!(wide.len() >= narrow.len());
        }
    }

    #[test]
    fn matches_agrees_with_apply() {
        let events = vec![
            event("1", "01/01/2030 10:00", UNAVAILABLE),
            event("2", "01/01/2020 11:00", "Globo"),
        ];
        let f = filter("flamengo", true, false);
        let applied = f.apply(&events, now());
        for e in &events {
            assert_eq!(f.matches(e, now()), applied.contains(&e));
        }
    }
}
