use crate::state::deep_link::DeepLink;
use crate::state::filters::EventFilter;
use crate::state::grouping::group_events;
use chrono::NaiveDateTime;
use log::{debug, error};
use scores_api::{DayOffset, EventRecord};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Identifies a competition within a sport, for collapse state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubCategoryKey {
    pub category: String,
    pub sub_category: String,
}

impl SubCategoryKey {
    pub fn new(category: &str, sub_category: &str) -> Self {
        Self {
            category: category.to_string(),
            sub_category: sub_category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub day_offset: DayOffset,
    /// First category of the loaded day until the user picks another one.
    pub active_category: Option<String>,
    /// Search text and the two inclusion toggles.
    pub filter: EventFilter,
    /// Competitions whose rows are hidden. Headers stay visible.
    pub collapsed: HashSet<SubCategoryKey>,
    /// Event opened from a deep link; shown alone while it resolves.
    pub selected_event_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Actions and effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Action {
    /// Seed search and selection from a deep link. Honoured once per session.
    Bootstrap(DeepLink),
    /// Move by -1, 0 or +1 days. `0` loads the current day if it has not been fetched.
    ChangeDay(i8),
    EventsLoaded {
        day_offset: DayOffset,
        seq: u64,
        events: Vec<EventRecord>,
    },
    FetchFailed {
        day_offset: DayOffset,
        seq: u64,
        message: String,
    },
    SetSearchQuery(String),
    ToggleIncludeNoBroadcast,
    ToggleIncludeStarted,
    SetActiveCategory(String),
    /// Step through the loaded day's categories, wrapping around.
    CycleCategory(i8),
    ToggleCollapse(SubCategoryKey),
    ClearSelectedEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFetch {
    pub day_offset: DayOffset,
    pub seq: u64,
}

/// Side effects requested by a transition; run by the network worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch(PendingFetch),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Session state: the view, every day fetched so far, and the fetch in flight.
#[derive(Debug, Default)]
pub struct Schedule {
    pub view: ViewState,
    days: HashMap<DayOffset, Vec<EventRecord>>,
    failures: HashMap<DayOffset, String>,
    pending: Option<PendingFetch>,
    next_seq: u64,
    bootstrapped: bool,
}

impl Schedule {
    pub fn reduce(&mut self, action: Action) -> Effect {
        match action {
            Action::Bootstrap(link) => {
                if self.bootstrapped {
                    debug!("ignoring repeated bootstrap");
                    return Effect::None;
                }
                self.bootstrapped = true;
                if let Some(query) = link.search_query {
                    self.view.filter.search_query = query;
                }
                self.view.selected_event_id = link.event_id;
                Effect::None
            }
            Action::ChangeDay(delta) => self.change_day(delta),
            Action::EventsLoaded { day_offset, seq, events } => {
                self.on_events_loaded(day_offset, seq, events);
                Effect::None
            }
            Action::FetchFailed { day_offset, seq, message } => {
                error!("loading {} failed: {message}", day_offset.label());
                if self.pending.is_some_and(|p| p.seq == seq) {
                    self.pending = None;
                }
                if !self.days.contains_key(&day_offset) {
                    self.failures.insert(day_offset, message);
                }
                Effect::None
            }
            Action::SetSearchQuery(query) => {
                self.view.filter.search_query = query;
                Effect::None
            }
            Action::ToggleIncludeNoBroadcast => {
                self.view.filter.include_no_broadcast = !self.view.filter.include_no_broadcast;
                Effect::None
            }
            Action::ToggleIncludeStarted => {
                self.view.filter.include_started = !self.view.filter.include_started;
                Effect::None
            }
            Action::SetActiveCategory(category) => {
                self.view.active_category = Some(category);
                Effect::None
            }
            Action::CycleCategory(delta) => {
                self.cycle_category(delta);
                Effect::None
            }
            Action::ToggleCollapse(key) => {
                if !self.view.collapsed.remove(&key) {
                    self.view.collapsed.insert(key);
                }
                Effect::None
            }
            Action::ClearSelectedEvent => {
                self.view.selected_event_id = None;
                Effect::None
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<PendingFetch> {
        self.pending
    }

    /// Records for the day on screen, if that day has been fetched.
    pub fn current_events(&self) -> Option<&[EventRecord]> {
        self.days.get(&self.view.day_offset).map(Vec::as_slice)
    }

    pub fn is_cached(&self, day_offset: DayOffset) -> bool {
        self.days.contains_key(&day_offset)
    }

    /// The deep-linked event, when it exists in the current day's records.
    pub fn selected_event(&self) -> Option<&EventRecord> {
        let id = self.view.selected_event_id.as_deref()?;
        self.current_events()?.iter().find(|e| e.id == id)
    }

    pub fn derive(&self, now: NaiveDateTime) -> Rendered<'_> {
        if let Some(event) = self.selected_event() {
            return Rendered::Detail(event);
        }
        match self.current_events() {
            Some(events) => Rendered::List(derive_view(events, &self.view, now)),
            None => match self.failures.get(&self.view.day_offset) {
                Some(message) if !self.is_loading() => Rendered::Failed(message.as_str()),
                _ => Rendered::Loading,
            },
        }
    }

    fn change_day(&mut self, delta: i8) -> Effect {
        let target = self.view.day_offset.shifted(delta);

        if self.days.contains_key(&target) {
            self.view.day_offset = target;
            self.pending = None;
            self.reconcile_active_category();
            return Effect::None;
        }

        self.view.day_offset = target;
        if self.pending.is_some_and(|p| p.day_offset == target) {
            return Effect::None;
        }

        self.next_seq += 1;
        let fetch = PendingFetch { day_offset: target, seq: self.next_seq };
        self.pending = Some(fetch);
        self.failures.remove(&target);
        debug!("requesting {} (seq {})", target.label(), fetch.seq);
        Effect::Fetch(fetch)
    }

    fn on_events_loaded(&mut self, day_offset: DayOffset, seq: u64, events: Vec<EventRecord>) {
        debug!("{} events for {} (seq {seq})", events.len(), day_offset.label());
        // A day's list is replaced wholesale, never edited.
        self.days.insert(day_offset, events);
        self.failures.remove(&day_offset);

        if day_offset != self.view.day_offset {
            debug!("{} is no longer selected; cached only", day_offset.label());
            return;
        }
        if self.pending.is_some_and(|p| p.day_offset == day_offset) {
            self.pending = None;
        }
        self.reconcile_active_category();
    }

    /// Keep the active category when the day has it, otherwise fall back to the first one.
    fn reconcile_active_category(&mut self) {
        let Some(events) = self.days.get(&self.view.day_offset) else {
            return;
        };
        let present = self
            .view
            .active_category
            .as_deref()
            .is_some_and(|active| events.iter().any(|e| e.category == active));
        if !present {
            self.view.active_category = events.first().map(|e| e.category.clone());
        }
    }

    fn cycle_category(&mut self, delta: i8) {
        let Some(events) = self.current_events() else {
            return;
        };
        let names = group_events(events).category_names();
        if names.is_empty() {
            return;
        }
        let len = names.len() as isize;
        let current = self
            .view
            .active_category
            .as_deref()
            .and_then(|active| names.iter().position(|n| *n == active))
            .map_or(0, |i| i as isize);
        let next = (current + isize::from(delta)).rem_euclid(len) as usize;
        let name = names[next].to_string();
        self.view.active_category = Some(name);
    }
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Which categories the list draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    ActiveCategory(Option<&'a str>),
    AllCategories,
}

impl<'a> Scope<'a> {
    /// Search widens scope: a non-empty query looks across every category,
    /// otherwise only the active tab is listed.
    pub fn for_query(filter: &EventFilter, active_category: Option<&'a str>) -> Self {
        if filter.normalized_query().is_some() {
            Scope::AllCategories
        } else {
            Scope::ActiveCategory(active_category)
        }
    }

    fn includes(&self, category: &str) -> bool {
        match self {
            Scope::AllCategories => true,
            Scope::ActiveCategory(active) => *active == Some(category),
        }
    }
}

/// One competition header plus its visible events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub category: &'a str,
    pub sub_category: &'a str,
    pub events: Vec<&'a EventRecord>,
    /// Rows hidden; the header is still drawn.
    pub collapsed: bool,
}

impl Section<'_> {
    pub fn key(&self) -> SubCategoryKey {
        SubCategoryKey::new(self.category, self.sub_category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleView<'a> {
    pub day_offset: DayOffset,
    /// Category tabs, from the unfiltered day.
    pub categories: Vec<&'a str>,
    pub active_category: Option<&'a str>,
    pub scope: Scope<'a>,
    pub sections: Vec<Section<'a>>,
}

impl ScheduleView<'_> {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.sections.iter().map(|s| s.events.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<'a> {
    Loading,
    Failed(&'a str),
    Detail(&'a EventRecord),
    List(ScheduleView<'a>),
}

/// Group the whole day, filter each competition, keep the scoped categories and
/// drop competitions left empty.
pub fn derive_view<'a>(
    events: &'a [EventRecord],
    view: &'a ViewState,
    now: NaiveDateTime,
) -> ScheduleView<'a> {
    let grouped = group_events(events);
    let active_category = view.active_category.as_deref();
    let scope = Scope::for_query(&view.filter, active_category);

    let sections = grouped
        .categories
        .iter()
        .filter(|category| scope.includes(category.name))
        .flat_map(|category| {
            category.sub_categories.iter().filter_map(move |sub| {
                let visible = view.filter.apply(sub.events.iter().copied(), now);
                if visible.is_empty() {
                    return None;
                }
                let key = SubCategoryKey::new(category.name, sub.name);
                Some(Section {
                    category: category.name,
                    sub_category: sub.name,
                    events: visible,
                    collapsed: view.collapsed.contains(&key),
                })
            })
        })
        .collect();

    ScheduleView {
        day_offset: view.day_offset,
        categories: grouped.category_names(),
        active_category,
        scope,
        sections,
    }
}
