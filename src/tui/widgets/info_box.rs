use chrono::{Datelike, Local, NaiveDate};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::AppState;
use crate::tips::{quote_for_day, Quote, BLOG_TIPS, WELLNESS_TIPS};
use crate::tui::app::Tab;
use crate::tui::widgets::color::parse_color;
use crate::Config;

/// Title and body of the info box for `tab`
pub fn info_for(tab: Tab, state: &AppState, quotes: &[Quote], today: NaiveDate) -> (String, String) {
    match tab {
        Tab::Tracker => {
            let body = quote_for_day(quotes, today)
                .map(|q| format!("\"{}\" - {}", q.text, q.author))
                .unwrap_or_default();
            ("Quote of the day".to_string(), body)
        }
        Tab::Journal => {
            let tip = WELLNESS_TIPS[today.ordinal0() as usize % WELLNESS_TIPS.len()];
            ("Wellness tip".to_string(), tip.to_string())
        }
        Tab::Blog => {
            let tip = BLOG_TIPS[state.blog.ui.current_tip % BLOG_TIPS.len()];
            (format!("Tip: {}", tip.title), tip.content.to_string())
        }
        Tab::Snapshots => {
            let body = match &state.data.last_saved {
                Some(ts) => format!("Last saved {}. Up to 10 snapshots are kept.", ts),
                None => "Nothing saved yet. Save a snapshot to keep today's progress.".to_string(),
            };
            ("History".to_string(), body)
        }
    }
}

pub fn render_info_box(f: &mut Frame, area: Rect, tab: Tab, state: &AppState, quotes: &[Quote], config: &Config) {
    let theme = config.get_active_theme();
    let (title, body) = info_for(tab, state, quotes, Local::now().date_naive());

    let paragraph = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg))),
        )
        .style(Style::default().fg(parse_color(&theme.fg)))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BlogAction;
    use crate::tips::fallback_quotes;

    #[test]
    fn blog_box_follows_current_tip() {
        let mut state = AppState::default();
        state.blog.reduce(BlogAction::SetCurrentTip(2));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (title, body) = info_for(Tab::Blog, &state, &[], date);
        assert_eq!(title, format!("Tip: {}", BLOG_TIPS[2].title));
        assert_eq!(body, BLOG_TIPS[2].content);
    }

    #[test]
    fn tracker_box_shows_a_quote() {
        let quotes = fallback_quotes();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (_, body) = info_for(Tab::Tracker, &AppState::default(), &quotes, date);
        assert_eq!(body, format!("\"{}\" - {}", quotes[0].text, quotes[0].author));
    }

    #[test]
    fn snapshots_box_mentions_last_save() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (_, body) = info_for(Tab::Snapshots, &AppState::default(), &[], date);
        assert!(body.starts_with("Nothing saved yet"));
    }
}
