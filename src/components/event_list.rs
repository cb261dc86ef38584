use chrono::NaiveDateTime;
use scores_api::EventRecord;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget, Wrap};

use crate::state::clock::{classify, time_prefix};
use crate::state::view::{ScheduleView, Scope};

const NO_TIME: &str = "--:--";

// ---------------------------------------------------------------------------
// EventList — grouped, collapsible schedule
// ---------------------------------------------------------------------------

/// The filtered day, one header per competition followed by its events.
pub struct EventList<'a> {
    pub view: &'a ScheduleView<'a>,
    /// Index of the highlighted header.
    pub cursor: usize,
    pub now: NaiveDateTime,
}

impl EventList<'_> {
    /// All rows plus the row index of the highlighted header.
    pub fn lines(&self) -> (Vec<Line<'static>>, usize) {
        let mut lines = Vec::with_capacity(self.view.event_count() + self.view.sections.len());
        let mut cursor_row = 0;
        let show_category = self.view.scope == Scope::AllCategories;

        for (idx, section) in self.view.sections.iter().enumerate() {
            let selected = idx == self.cursor;
            if selected {
                cursor_row = lines.len();
            }

            let marker = if section.collapsed { "▸" } else { "▾" };
            let title = if show_category {
                format!("{marker} {} · {}", section.category, section.sub_category)
            } else {
                format!("{marker} {}", section.sub_category)
            };
            let mut header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            if selected {
                header_style = header_style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::styled(title, header_style),
                Span::styled(
                    format!(" ({})", section.events.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));

            if !section.collapsed {
                lines.extend(section.events.iter().map(|event| event_row(event, self.now)));
            }
        }

        (lines, cursor_row)
    }
}

impl Widget for EventList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let (lines, cursor_row) = self.lines();
        // Keep the highlighted header on screen.
        let scroll = cursor_row.saturating_sub(area.height as usize / 2) as u16;
        Paragraph::new(lines).scroll((scroll, 0)).render(area, buf);
    }
}

fn event_row(event: &EventRecord, now: NaiveDateTime) -> Line<'static> {
    let started = classify(&event.start_time, now).has_started();
    let base = if started {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let time = if event.has_start_time() {
        time_prefix(&event.start_time).unwrap_or_else(|| NO_TIME.to_string())
    } else {
        NO_TIME.to_string()
    };
    let channels = if event.has_broadcast() {
        Span::styled(format!("  {}", event.broadcast_channels), Style::default().fg(Color::Cyan))
    } else {
        Span::raw("")
    };

    Line::from(vec![
        Span::styled(format!("   {time}  "), base.add_modifier(Modifier::BOLD)),
        Span::styled(event.title(), base),
        channels,
    ])
}

// ---------------------------------------------------------------------------
// EventDetail — a single deep-linked event
// ---------------------------------------------------------------------------

pub struct EventDetail<'a> {
    pub event: &'a EventRecord,
    pub now: NaiveDateTime,
    /// Whether the event would also appear in the filtered list.
    pub listed: bool,
}

impl Widget for EventDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let event = self.event;
        let label = Style::default().fg(Color::DarkGray);
        let status = if !event.has_start_time() {
            "time to be confirmed"
        } else if classify(&event.start_time, self.now).has_started() {
            "started"
        } else {
            "upcoming"
        };

        let mut lines = vec![
            Line::from(Span::styled(
                event.title(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Sport        ", label),
                Span::raw(event.category.clone()),
            ]),
            Line::from(vec![
                Span::styled("Competition  ", label),
                Span::raw(event.sub_category.clone()),
            ]),
            Line::from(vec![
                Span::styled("Start        ", label),
                Span::raw(format!("{} ({status})", event.start_time)),
            ]),
            Line::from(vec![
                Span::styled("Channels     ", label),
                Span::raw(event.broadcast_channels.clone()),
            ]),
        ];
        for (side, image) in [
            ("Home crest   ", &event.home_participant_image),
            ("Away crest   ", &event.away_participant_image),
        ] {
            if let Some(url) = image {
                lines.push(Line::from(vec![Span::styled(side, label), Span::raw(url.clone())]));
            }
        }
        lines.push(Line::from(""));
        if !self.listed {
            lines.push(Line::from(Span::styled(
                "Hidden from the list by the current filters",
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(Span::styled("Esc: back to the schedule", label)));

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::view::{Section, ViewState, derive_view};
    use chrono::NaiveDate;
    use scores_api::{DayOffset, UNAVAILABLE};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn event(id: &str, category: &str, sub: &str, start: &str, broadcast: &str) -> EventRecord {
        EventRecord {
            id: id.into(),
            category: category.into(),
            sub_category: sub.into(),
            home_participant: format!("Home {id}"),
            away_participant: format!("Away {id}"),
            start_time: start.into(),
            broadcast_channels: broadcast.into(),
            ..Default::default()
        }
    }

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn buffer_rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn headers_and_rows_follow_sections() {
        let events = vec![
            event("1", "Football", "League X", "17/10/2026 18:00", "Globo"),
            event("2", "Football", "Cup Y", "17/10/2026 20:30:00", "ESPN"),
        ];
        let view = ViewState {
            active_category: Some("Football".into()),
            ..Default::default()
        };
        let schedule = derive_view(&events, &view, now());
        let (lines, cursor_row) = EventList { view: &schedule, cursor: 1, now: now() }.lines();
        let rows = text(&lines);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "▾ League X (1)");
        assert_eq!(rows[1], "   18:00  Home 1 x Away 1  Globo");
        assert_eq!(rows[2], "▾ Cup Y (1)");
        assert_eq!(rows[3], "   20:30  Home 2 x Away 2  ESPN");
        assert_eq!(cursor_row, 2);
    }

    #[test]
    fn collapsed_section_keeps_header_only() {
        let first = event("1", "Football", "League X", "17/10/2026 18:00", "Globo");
        let schedule = ScheduleView {
            day_offset: DayOffset::TODAY,
            categories: vec!["Football"],
            active_category: Some("Football"),
            scope: Scope::ActiveCategory(Some("Football")),
            sections: vec![Section {
                category: "Football",
                sub_category: "League X",
                events: vec![&first],
                collapsed: true,
            }],
        };
        let (lines, _) = EventList { view: &schedule, cursor: 0, now: now() }.lines();
        assert_eq!(text(&lines), vec!["▸ League X (1)"]);
    }

    #[test]
    fn search_scope_names_the_category() {
        let events = vec![
            event("1", "Football", "League X", "17/10/2026 18:00", "Globo"),
            event("2", "Tennis", "ATP", "17/10/2026 19:00", "ESPN"),
        ];
        let mut view = ViewState {
            active_category: Some("Football".into()),
            ..Default::default()
        };
        view.filter.search_query = "atp".into();
        let schedule = derive_view(&events, &view, now());
        let (lines, _) = EventList { view: &schedule, cursor: 0, now: now() }.lines();
        assert_eq!(text(&lines)[0], "▾ Tennis · ATP (1)");
    }

    #[test]
    fn missing_time_and_channels_render_placeholders() {
        let row = event_row(&event("9", "Football", "League X", UNAVAILABLE, UNAVAILABLE), now());
        assert_eq!(row.to_string(), "   --:--  Home 9 x Away 9");
    }

    #[test]
    fn detail_marks_missing_start_time() {
        let record = event("8", "Football", "League X", UNAVAILABLE, "Globo");
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        EventDetail { event: &record, now: now(), listed: true }.render(area, &mut buf);
        let rows = buffer_rows(&buf);

        assert!(rows[4].contains("Unavailable (time to be confirmed)"));
        assert!(rows[7].starts_with("Esc: back"));
    }

    #[test]
    fn detail_shows_event_fields() {
        let record = event("7", "Football", "League X", "17/10/2026 18:00", "Globo");
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        EventDetail { event: &record, now: now(), listed: false }.render(area, &mut buf);
        let rows = buffer_rows(&buf);

        assert!(rows[0].starts_with("Home 7 x Away 7"));
        assert!(rows[4].contains("17/10/2026 18:00 (upcoming)"));
        assert!(rows[5].contains("Globo"));
        assert!(rows[7].starts_with("Hidden from the list"));
    }
}
