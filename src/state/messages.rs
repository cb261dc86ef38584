use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use scores_api::{DayOffset, EventRecord};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Fetch one day's events; `seq` ties the answer back to the request.
    LoadEvents { day_offset: DayOffset, seq: u64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    EventsLoaded { day_offset: DayOffset, seq: u64, events: Vec<EventRecord> },
    Error { day_offset: DayOffset, seq: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
