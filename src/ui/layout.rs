use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const FILTER_BAR_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAreas {
    /// Day tabs on the left, spinner on the right.
    pub tab_bar: [Rect; 2],
    pub category_bar: Rect,
    pub filter_bar: Rect,
    pub main: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let log_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };

        if full_screen {
            let [main, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(log_height)])
                    .areas(area);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                category_bar: Rect::ZERO,
                filter_bar: Rect::ZERO,
                main,
                logs,
            };
        }

        let [tab, category_bar, filter_bar, main, logs] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(log_height),
        ])
        .areas(area);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            category_bar,
            filter_bar,
            main,
            logs,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_hides_chrome() {
        let mut areas = LayoutAreas::new(Size::new(80, 40));
        areas.update(Rect::new(0, 0, 80, 40), true, false);
        assert_eq!(areas.filter_bar, Rect::ZERO);
        assert_eq!(areas.main.height, 40);
        assert_eq!(areas.logs.height, 0);
    }

    #[test]
    fn log_pane_takes_bottom_rows() {
        let mut areas = LayoutAreas::new(Size::new(80, 40));
        areas.update(Rect::new(0, 0, 80, 40), false, true);
        assert_eq!(areas.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(areas.logs.y, 40 - LOG_PANE_HEIGHT);
        assert_eq!(
            areas.main.height,
            40 - 2 * TAB_BAR_HEIGHT - FILTER_BAR_HEIGHT - LOG_PANE_HEIGHT
        );
    }
}
