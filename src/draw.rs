use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, now};
use crate::components::event_list::{EventDetail, EventList};
use crate::components::skeleton::SkeletonLoader;
use crate::state::app_state::InputMode;
use crate::state::grouping::{Grouped, group_events};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::view::{PendingFetch, Rendered, Schedule, ScheduleView, Scope};
use crate::ui::layout::LayoutAreas;
use scores_api::DayOffset;

const HELP_LINES: &[(&str, &str)] = &[
    ("h / ←", "previous day"),
    ("l / →", "next day"),
    ("Tab / Shift-Tab", "next / previous sport"),
    ("1-9", "jump to a sport"),
    ("/", "search (Enter keeps it, Esc clears it)"),
    ("b", "include events without a broadcast"),
    ("s", "include events that already started"),
    ("j / k", "move between competitions"),
    ("Enter / Space", "collapse or expand a competition"),
    ("Esc", "leave the event view, or clear the search"),
    ("f", "full screen"),
    ("\"", "logs"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let now = now();

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);
        let rendered = app.state.schedule.derive(now);

        let schedule = &app.state.schedule;
        let grouped = schedule.current_events().map(group_events);

        if !app.settings.full_screen {
            draw_day_tabs(f, layout.tab_bar, schedule, grouped.as_ref());
            draw_category_tabs(f, layout.category_bar, &rendered, grouped.as_ref());
            draw_filter_bar(f, layout.filter_bar, app);
        }

        match &rendered {
            Rendered::Loading => draw_skeleton(f, layout.main, schedule.pending()),
            Rendered::Failed(message) => draw_placeholder(
                f,
                layout.main,
                &format!("Could not load events: {message}\n\nChange day to retry."),
            ),
            Rendered::Detail(event) => {
                let block = default_border(Color::White).title(" Event ");
                let inner = block.inner(layout.main);
                f.render_widget(block, layout.main);
                let listed = schedule.view.filter.matches(event, now);
                f.render_widget(EventDetail { event, now, listed }, inner);
            }
            Rendered::List(view) if view.is_empty() => {
                draw_placeholder(f, layout.main, "No events match the current filters.")
            }
            Rendered::List(view) => draw_schedule(f, layout.main, view, app.state.cursor, now),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }
        if app.state.show_help {
            draw_help(f, f.area());
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_day_tabs(f: &mut Frame, tab_bar: [Rect; 2], schedule: &Schedule, grouped: Option<&Grouped>) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;
    let day_offset = schedule.view.day_offset;

    let selected = DayOffset::ALL
        .iter()
        .position(|d| *d == day_offset)
        .unwrap_or(1);
    let titles: Vec<Line> = DayOffset::ALL
        .iter()
        .map(|d| match grouped {
            Some(grouped) if *d == day_offset => {
                Line::from(format!("{} ({})", d.label(), grouped.len()))
            }
            _ if schedule.is_cached(*d) => Line::from(d.label()),
            _ => Line::styled(d.label(), Style::default().fg(Color::DarkGray)),
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(selected)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_category_tabs(f: &mut Frame, area: Rect, rendered: &Rendered, grouped: Option<&Grouped>) {
    let block = default_border(Color::DarkGray).title(" Sports ");
    let (Rendered::List(view), Some(grouped)) = (rendered, grouped) else {
        f.render_widget(block, area);
        return;
    };

    let selected = view
        .active_category
        .and_then(|active| view.categories.iter().position(|c| *c == active));
    let mut highlight = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    if view.scope == Scope::AllCategories {
        // Search spans every sport; the tab only marks where Esc returns to.
        highlight = Style::default().fg(Color::DarkGray);
    }
    let titles = view.categories.iter().map(|name| {
        let count = grouped.category(name).map_or(0, |c| c.events().count());
        Line::from(format!("{name} {count}"))
    });
    let tabs = Tabs::new(titles)
        .block(block)
        .highlight_style(highlight)
        .select(selected)
        .style(Style::default().fg(Color::White));
    f.render_widget(tabs, area);
}

fn draw_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let searching = app.state.input_mode == InputMode::Searching;
    let query = app.search_query();
    let filter = &app.state.schedule.view.filter;

    let search = if searching {
        Span::styled(format!("/{query}█"), Style::default().fg(Color::Yellow))
    } else if query.is_empty() {
        Span::styled("/ to search", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(format!("/{query}"), Style::default().fg(Color::White))
    };

    let line = Line::from(vec![
        search,
        Span::raw("   "),
        toggle("b", "no broadcast", filter.include_no_broadcast),
        Span::raw("  "),
        toggle("s", "started", filter.include_started),
    ]);

    let border = if searching { Color::Yellow } else { Color::DarkGray };
    f.render_widget(
        Paragraph::new(line).block(default_border(border).title(" Filters ")),
        area,
    );
}

fn toggle(key: &str, label: &str, on: bool) -> Span<'static> {
    let (mark, color) = if on { ("x", Color::Green) } else { (" ", Color::DarkGray) };
    Span::styled(format!("[{mark}] {key}: {label}"), Style::default().fg(color))
}

fn draw_schedule(
    f: &mut Frame,
    area: Rect,
    view: &ScheduleView,
    cursor: usize,
    now: chrono::NaiveDateTime,
) {
    let title = format!(
        " {} · {} events ",
        view.day_offset.label(),
        view.event_count()
    );
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(EventList { view, cursor, now }, inner);
}

fn draw_skeleton(f: &mut Frame, area: Rect, pending: Option<PendingFetch>) {
    let title = match pending {
        Some(fetch) => format!(" Loading {} ", fetch.day_offset.label()),
        None => " Loading ".to_string(),
    };
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(SkeletonLoader, inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let height = HELP_LINES.len() as u16 + 2;
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(60)])
        .flex(Flex::Center)
        .areas(popup);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>16}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(default_border(Color::White).title(" Keys ")),
        popup,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator('|')
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
