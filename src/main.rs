mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::deep_link::DeepLink;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

enum CliAction {
    Exit,
    Run { link: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let link = match handle_cli_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Run { link } => DeepLink::from_args_or_env(link),
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Trace)?;

    let mut app = App::new();
    info!("starting with {link:?}");
    app.bootstrap(link);
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Trigger today's load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliAction {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return CliAction::Run { link: None };
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliAction::Exit
        }
        "-V" | "--version" => {
            println!("matchday {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        flag if flag.starts_with('-') => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
        _ => CliAction::Run { link: Some(arg) },
    }
}

fn usage_text() -> &'static str {
    "matchday - daily sports schedule in the terminal

Usage:
  matchday [LINK]
  matchday --help
  matchday --version

LINK is a query string such as '?q=flamengo' or '?game=4452871'.

Environment:
  MATCHDAY_LINK            Deep link used when LINK is not given
  MATCHDAY_API_URL         Scores provider base URL (default https://webws.365scores.com)
  MATCHDAY_TIMEZONE        Timezone sent to the provider (default America/Sao_Paulo)
  MATCHDAY_CACHE_TTL_SECS  Seconds a fetched day stays cached (default 3600)
  MATCHDAY_EVENTS_JSON     Path to a local events snapshot; '{offset}' becomes -1, 0 or 1
  MATCHDAY_LOG_LEVEL       off, error, warn, info, debug or trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &network_requests).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match ui_event {
        UiEvent::AppStarted => {
            let request = app.lock().await.start();
            if let Some(request) = request {
                let _ = network_requests.send(request).await;
            }
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
        }
        UiEvent::Resize => {}
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::EventsLoaded { day_offset, seq, events } => {
            let mut guard = app.lock().await;
            guard.on_events_loaded(day_offset, seq, events);
        }
        NetworkResponse::Error { day_offset, seq, message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_fetch_failed(day_offset, seq, message);
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    );
    let _ = terminal::enable_raw_mode();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
