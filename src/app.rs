use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, InputMode};
use crate::state::deep_link::DeepLink;
use crate::state::grouping::group_events;
use crate::state::messages::NetworkRequest;
use crate::state::view::{Action, Effect, Rendered};
use chrono::{Local, NaiveDateTime};
use scores_api::{DayOffset, EventRecord};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

/// Wall-clock "now" in local time, taken fresh for every derivation.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl App {
    pub fn new() -> Self {
        let app = Self {
            state: AppState::new(),
            settings: AppSettings::load(),
        };

        log::set_max_level(app.settings.log_level);
        tui_logger::set_default_level(app.settings.log_level);

        app
    }

    /// Run an action through the schedule and turn its effect into a network request.
    pub fn dispatch(&mut self, action: Action) -> Option<NetworkRequest> {
        match self.state.schedule.reduce(action) {
            Effect::None => None,
            Effect::Fetch(fetch) => Some(NetworkRequest::LoadEvents {
                day_offset: fetch.day_offset,
                seq: fetch.seq,
            }),
        }
    }

    pub fn bootstrap(&mut self, link: DeepLink) {
        self.dispatch(Action::Bootstrap(link));
    }

    /// Load the current day on startup.
    pub fn start(&mut self) -> Option<NetworkRequest> {
        self.dispatch(Action::ChangeDay(0))
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_events_loaded(&mut self, day_offset: DayOffset, seq: u64, events: Vec<EventRecord>) {
        self.state.last_error = None;
        self.dispatch(Action::EventsLoaded { day_offset, seq, events });
        self.clamp_cursor();
    }

    pub fn on_fetch_failed(&mut self, day_offset: DayOffset, seq: u64, message: String) {
        self.state.last_error = Some(message.clone());
        self.dispatch(Action::FetchFailed { day_offset, seq, message });
    }

    // -----------------------------------------------------------------------
    // Day and category navigation
    // -----------------------------------------------------------------------

    pub fn change_day(&mut self, delta: i8) -> Option<NetworkRequest> {
        let request = self.dispatch(Action::ChangeDay(delta));
        self.state.cursor = 0;
        request
    }

    pub fn cycle_category(&mut self, delta: i8) {
        self.dispatch(Action::CycleCategory(delta));
        self.state.cursor = 0;
    }

    /// Jump to the category tab at `index`, counting from zero.
    pub fn select_category(&mut self, index: usize) {
        let name = self
            .state
            .schedule
            .current_events()
            .and_then(|events| group_events(events).category_names().get(index).map(|n| n.to_string()));
        if let Some(name) = name {
            self.dispatch(Action::SetActiveCategory(name));
            self.state.cursor = 0;
        }
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn toggle_include_no_broadcast(&mut self) {
        self.dispatch(Action::ToggleIncludeNoBroadcast);
        self.clamp_cursor();
    }

    pub fn toggle_include_started(&mut self) {
        self.dispatch(Action::ToggleIncludeStarted);
        self.clamp_cursor();
    }

    pub fn begin_search(&mut self) {
        self.state.input_mode = InputMode::Searching;
    }

    pub fn end_search(&mut self) {
        self.state.input_mode = InputMode::Browsing;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.search_query().to_string();
        query.push(c);
        self.set_search_query(query);
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.search_query().to_string();
        query.pop();
        self.set_search_query(query);
    }

    pub fn clear_search(&mut self) {
        self.set_search_query(String::new());
    }

    pub fn search_query(&self) -> &str {
        &self.state.schedule.view.filter.search_query
    }

    fn set_search_query(&mut self, query: String) {
        self.dispatch(Action::SetSearchQuery(query));
        self.state.cursor = 0;
    }

    // -----------------------------------------------------------------------
    // List cursor and collapse
    // -----------------------------------------------------------------------

    pub fn cursor_down(&mut self) {
        let max = self.section_count().saturating_sub(1);
        if self.state.cursor < max {
            self.state.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.state.cursor = self.state.cursor.saturating_sub(1);
    }

    /// Collapse or expand the competition under the cursor.
    pub fn toggle_collapse_at_cursor(&mut self) {
        let key = match self.state.schedule.derive(now()) {
            Rendered::List(view) => view.sections.get(self.state.cursor).map(|s| s.key()),
            _ => None,
        };
        if let Some(key) = key {
            self.dispatch(Action::ToggleCollapse(key));
        }
    }

    pub fn is_detail_mode(&self) -> bool {
        self.state.schedule.selected_event().is_some()
    }

    pub fn close_detail(&mut self) {
        self.dispatch(Action::ClearSelectedEvent);
        self.state.cursor = 0;
    }

    fn section_count(&self) -> usize {
        match self.state.schedule.derive(now()) {
            Rendered::List(view) => view.sections.len(),
            _ => 0,
        }
    }

    fn clamp_cursor(&mut self) {
        let max = self.section_count().saturating_sub(1);
        self.state.cursor = self.state.cursor.min(max);
    }

    // -----------------------------------------------------------------------
    // Chrome
    // -----------------------------------------------------------------------

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
