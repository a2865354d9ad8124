use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::truncate;
use crate::Config;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let max_width = area.width as usize;

    let paragraph = match message {
        Some(msg) => {
            let highlight_bg = parse_color(&theme.highlight_bg);
            Paragraph::new(truncate(msg, max_width)).style(
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => Paragraph::new(fit_hints(key_hints, max_width))
            .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg))),
    };

    f.render_widget(paragraph, area);
}

/// Join as many hints as fit in `max_width`, ending in "..." if some were dropped
pub fn fit_hints(hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let sep = if i == 0 { "" } else { SEPARATOR };
        let would_be = text.chars().count() + sep.chars().count() + hint.chars().count();
        if would_be > max_width {
            if text.is_empty() {
                return truncate(hint, max_width);
            }
            if text.chars().count() + ELLIPSIS.len() > max_width {
                text = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
            }
            text.push_str(ELLIPSIS);
            return text;
        }
        text.push_str(sep);
        text.push_str(hint);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Quit".to_string(), "n: New".to_string(), "F1: Help".to_string()]
    }

    #[test]
    fn all_hints_fit_on_a_wide_bar() {
        assert_eq!(fit_hints(&hints(), 80), "q: Quit • n: New • F1: Help");
    }

    #[test]
    fn overflow_ends_with_ellipsis() {
        assert_eq!(fit_hints(&hints(), 20), "q: Quit • n: New...");
    }

    #[test]
    fn single_long_hint_is_truncated() {
        assert_eq!(fit_hints(&hints(), 5), "q:...");
    }
}
