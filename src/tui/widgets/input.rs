use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::Config;

/// Single-field prompt. `hint` is an extra line under the text, such as
/// the selected journal mood.
pub fn render_input(
    f: &mut Frame,
    area: Rect,
    prompt: &str,
    buffer: &str,
    hint: Option<&str>,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup = popup_area(area, 60, 40);
    f.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(vec![
            Span::raw(buffer.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
    ];
    if let Some(hint) = hint {
        lines.push(Line::from(hint.to_string()));
    }
    lines.push(Line::from(Span::styled(
        "Enter to submit, Esc to cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(prompt.to_string())
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}
