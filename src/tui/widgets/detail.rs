use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, ScrollbarState, Wrap};
use ratatui::Frame;
use ratskin::RatSkin;
use std::cmp;
use termimad::minimad::Text as MinimadText;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::render_scrollbar;
use crate::Config;

/// Render markdown into styled lines wrapped at `width`
pub fn markdown_lines(markdown: &str, width: u16) -> Vec<Line<'static>> {
    RatSkin::default()
        .parse(MinimadText::from(markdown), width)
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.to_string(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Largest useful scroll offset for `total` lines in a `viewport` of rows
pub fn max_scroll(total: usize, viewport: usize) -> usize {
    total.saturating_sub(viewport)
}

/// Bordered markdown pane scrolled by `scroll_offset` lines. Returns the
/// offset actually used, clamped to the content.
pub fn render_detail(
    f: &mut Frame,
    area: Rect,
    title: &str,
    markdown: &str,
    config: &Config,
    scroll_offset: usize,
) -> usize {
    if area.width < 2 || area.height < 2 {
        return 0;
    }

    let horizontal = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let (content_area, scrollbar_area) = (horizontal[0], horizontal[1]);

    let viewport_height = area.height.saturating_sub(2) as usize;
    let lines = markdown_lines(markdown, content_area.width.saturating_sub(2));
    let total_lines = lines.len();
    let scroll_offset = cmp::min(scroll_offset, max_scroll(total_lines, viewport_height));

    let end_line = cmp::min(scroll_offset + viewport_height, total_lines);
    let visible = if scroll_offset < total_lines {
        Text::from(lines[scroll_offset..end_line].to_vec())
    } else {
        Text::default()
    };

    // trim off keeps nested list indentation
    let paragraph = Paragraph::new(visible)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(parse_color(&config.get_active_theme().fg)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, content_area);

    if total_lines > viewport_height {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            content_area.y + 1,
            scrollbar_area.width,
            content_area.height.saturating_sub(2),
        );
        let mut state = ScrollbarState::new(total_lines)
            .viewport_content_length(viewport_height)
            .position(scroll_offset);
        render_scrollbar(f, scrollbar_inner_area, &mut state);
    }
    scroll_offset
}
