pub mod blog_feed;
pub mod color;
pub mod confirm_delete;
pub mod detail;
pub mod help;
pub mod info_box;
pub mod input;
pub mod journal_feed;
pub mod snapshot_list;
pub mod stats;
pub mod status_bar;
pub mod tabs;
pub mod task_list;

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

/// Centered rect taking a percentage of `area`, as in the ratatui popup example
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Cut `text` to `max_width` characters, ending in "..." when shortened
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// Bordered, themed list with a scrollbar once it overflows
pub fn render_themed_list(
    f: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem>,
    list_state: &mut ListState,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = if theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&theme.highlight_fg)
    };

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let (list_area, scrollbar_area) = (areas[0], areas[1]);

    let total_items = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
    f.render_stateful_widget(list, list_area, list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if total_items > visible_items && visible_items > 0 && scrollbar_area.width > 0 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );
        let selected = list_state.selected().unwrap_or(0);
        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(selected.saturating_sub(visible_items - 1));
        render_scrollbar(f, scrollbar_inner_area, &mut scrollbar_state);
    }
}

pub fn render_scrollbar(f: &mut Frame, area: Rect, state: &mut ScrollbarState) {
    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");
    f.render_stateful_widget(scrollbar, area, state);
}
