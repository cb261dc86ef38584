use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;

pub const SKELETON_BLOCKS: u16 = 3;
pub const SKELETON_ROWS: u16 = 4;

const BAR: char = '░';

/// Placeholder shown while a day has no records yet: a few header bars, each
/// followed by shorter row bars.
pub struct SkeletonLoader;

impl Widget for SkeletonLoader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Style::default().fg(Color::Gray);
        let row = Style::default().fg(Color::DarkGray);

        let mut y = area.y;
        for _ in 0..SKELETON_BLOCKS {
            for line in 0..=SKELETON_ROWS {
                if y >= area.bottom() {
                    return;
                }
                let (indent, width, style) = if line == 0 {
                    (0, area.width / 3, header)
                } else {
                    (3, area.width.saturating_sub(3) * 2 / 3, row)
                };
                let bar: String = std::iter::repeat_n(BAR, width as usize).collect();
                buf.set_stringn(area.x + indent, y, bar, area.width.saturating_sub(indent) as usize, style);
                y += 1;
            }
            y += 1;
        }
    }
}
