use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::tui::app::Tab;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, config: &Config) {
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let tab_bg = parse_color(&theme.tab_bg);
    let tab_fg = get_contrast_text_color(tab_bg);

    // Padded spans on tab_bg make each title look like a box
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(tab_bg)),
                Span::styled(tab.title(), Style::default().fg(tab_fg).bg(tab_bg)),
                Span::styled("  ", Style::default().bg(tab_bg)),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_tab.index())
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider("  ")
        .padding("", "");

    f.render_widget(tabs, area);
}
