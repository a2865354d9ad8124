use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // inside the outer border
    pub tabs_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub info_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Smallest usable terminal. Width fits a 25 column sidebar plus an
    /// 11 column main pane; height fits tabs, one content row, the info box
    /// and the status line.
    pub const MIN_WIDTH: u16 = 38;
    pub const MIN_HEIGHT: u16 = 10;

    const SIDEBAR_MIN: u16 = 25;
    const SIDEBAR_MAX_PERCENT: u16 = 40;
    const MAIN_MIN: u16 = 10;
    const INFO_HEIGHT: u16 = 4;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested = inner_area.width * sidebar_width_percent / 100;
            let max = inner_area.width * Self::SIDEBAR_MAX_PERCENT / 100;
            requested
                .max(Self::SIDEBAR_MIN)
                .min(max)
                .min(inner_area.width.saturating_sub(Self::MAIN_MIN))
        };

        // Shrink the info box before the content area disappears
        let info_height = if inner_area.height >= 14 { Self::INFO_HEIGHT } else { 3 };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(info_height),
                Constraint::Length(1),
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            info_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
