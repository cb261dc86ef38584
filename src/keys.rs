use crate::app::App;
use crate::state::app_state::InputMode;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    if guard.state.input_mode == InputMode::Searching {
        match key_event.code {
            KeyCode::Enter => guard.end_search(),
            KeyCode::Esc => {
                guard.clear_search();
                guard.end_search();
            }
            KeyCode::Backspace => guard.pop_search_char(),
            Char(c) => guard.push_search_char(c),
            _ => {}
        }
        return;
    }

    if guard.state.show_help {
        match key_event.code {
            Char('?') | KeyCode::Esc => guard.toggle_help(),
            Char('q') => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    let mut request = None;

    match (guard.is_detail_mode(), key_event.code) {
        // Quit
        (_, Char('q')) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Detail view
        (true, KeyCode::Esc | KeyCode::Backspace) => guard.close_detail(),

        // Day navigation
        (_, Char('h') | KeyCode::Left) => request = guard.change_day(-1),
        (_, Char('l') | KeyCode::Right) => request = guard.change_day(1),

        // Category tabs
        (false, KeyCode::Tab) => guard.cycle_category(1),
        (false, KeyCode::BackTab) => guard.cycle_category(-1),
        (false, Char(d @ '1'..='9')) => guard.select_category(d as usize - '1' as usize),

        // Filters
        (false, Char('/')) => guard.begin_search(),
        (false, KeyCode::Esc) => guard.clear_search(),
        (false, Char('b')) => guard.toggle_include_no_broadcast(),
        (false, Char('s')) => guard.toggle_include_started(),

        // List
        (false, Char('j') | KeyCode::Down) => guard.cursor_down(),
        (false, Char('k') | KeyCode::Up) => guard.cursor_up(),
        (false, KeyCode::Enter | Char(' ')) => guard.toggle_collapse_at_cursor(),

        // Global
        (_, Char('?')) => guard.toggle_help(),
        (_, Char('f')) => guard.toggle_full_screen(),
        (_, Char('"')) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(request) = request {
        drop(guard);
        let _ = network_requests.send(request).await;
    }
}
