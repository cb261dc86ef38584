use crate::state::view::Schedule;

/// Where key presses go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browsing,
    /// Typing into the search box.
    Searching,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub schedule: Schedule,
    pub input_mode: InputMode,
    /// Index of the highlighted competition header in the current list.
    pub cursor: usize,
    pub show_help: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
