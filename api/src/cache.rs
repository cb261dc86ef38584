use crate::EventRecord;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedDay {
    stored_at: Instant,
    events: Vec<EventRecord>,
}

/// Normalised event lists keyed by calendar day, each expiring `ttl` after it was stored.
/// Clones share the same storage.
#[derive(Debug, Clone)]
pub struct DayCache {
    ttl: Duration,
    days: Arc<Mutex<HashMap<NaiveDate, CachedDay>>>,
}

impl Default for DayCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl DayCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, days: Arc::default() }
    }

    pub fn get(&self, day: NaiveDate) -> Option<Vec<EventRecord>> {
        self.get_at(day, Instant::now())
    }

    pub fn insert(&self, day: NaiveDate, events: Vec<EventRecord>) {
        self.insert_at(day, events, Instant::now());
    }

    fn get_at(&self, day: NaiveDate, now: Instant) -> Option<Vec<EventRecord>> {
        let mut days = self.days.lock().unwrap_or_else(|e| e.into_inner());
        let expired = days
            .get(&day)
            .map(|cached| now.saturating_duration_since(cached.stored_at) >= self.ttl)?;
        if expired {
            days.remove(&day);
            return None;
        }
        days.get(&day).map(|cached| cached.events.clone())
    }

    fn insert_at(&self, day: NaiveDate, events: Vec<EventRecord>, now: Instant) {
        let mut days = self.days.lock().unwrap_or_else(|e| e.into_inner());
        days.insert(day, CachedDay { stored_at: now, events });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn record(id: &str) -> EventRecord {
        EventRecord { id: id.into(), ..Default::default() }
    }

    #[test]
    fn returns_entries_before_expiry() {
        let cache = DayCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at(day(17), vec![record("1")], start);
        let hit = cache.get_at(day(17), start + Duration::from_secs(59));
        assert_eq!(hit.map(|e| e.len()), Some(1));
        assert!(cache.get_at(day(18), start).is_none());
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = DayCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at(day(17), vec![record("1")], start);
        assert!(cache.get_at(day(17), start + Duration::from_secs(60)).is_none());
        assert!(cache.get_at(day(17), start).is_none(), "expired entry must be removed");
    }

    #[test]
    fn clones_share_storage() {
        let cache = DayCache::default();
        let other = cache.clone();
        other.insert(day(17), vec![record("9")]);
        assert_eq!(cache.get(day(17)).unwrap()[0].id, "9");
    }
}
