use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, ListState};
use ratatui::Frame;

use crate::models::JournalPost;
use crate::store::JournalState;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::{render_themed_list, truncate};
use crate::Config;

const NEW_BADGE: &str = " NEW";

pub fn render_journal_list(
    f: &mut Frame,
    area: Rect,
    journal: &JournalState,
    list_state: &mut ListState,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let badge_style = Style::default()
        .fg(parse_color(&theme.highlight_bg))
        .add_modifier(Modifier::BOLD);
    // fading in: dim until the first tick clears the flag
    let base_style = if journal.animate_in {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = journal
        .posts
        .iter()
        .map(|post| {
            let badge_width = if post.is_new { NEW_BADGE.len() } else { 0 };
            let heart = if journal.is_liked(post.id) { "♥" } else { "♡" };
            let likes = journal.effective_likes(post.id).unwrap_or(post.likes);
            let first = truncate(
                &format!("{} {}", post.mood.emoji(), post.caption),
                max_width.saturating_sub(badge_width),
            );
            let mut spans = vec![Span::raw(first)];
            if post.is_new {
                spans.push(Span::styled(NEW_BADGE, badge_style));
            }
            let second = truncate(
                &format!("  {} {} · 💬 {} · {}", heart, likes, post.comments.len(), post.timestamp),
                max_width,
            );
            ListItem::new(vec![Line::from(spans), Line::from(second)]).style(base_style)
        })
        .collect();

    render_themed_list(f, area, format!("Feed ({})", journal.posts.len()), items, list_state, config);
}

/// Detail view of a post: mood, caption, likes and, when toggled on, comments
pub fn post_markdown(journal: &JournalState, post: &JournalPost) -> String {
    let likes = journal.effective_likes(post.id).unwrap_or(post.likes);
    let mut content = format!(
        "**{} {}** · {}\n\n{}\n\n",
        post.mood.emoji(),
        post.mood.label(),
        post.timestamp,
        post.caption
    );
    let liked = if journal.is_liked(post.id) { " (you liked this)" } else { "" };
    content.push_str(&format!("**Likes:** {}{}\n", likes, liked));

    if journal.comments_visible(post.id) {
        content.push_str(&format!("\n**Comments ({})**\n\n", post.comments.len()));
        if post.comments.is_empty() {
            content.push_str("No comments yet.\n");
        }
        for comment in &post.comments {
            content.push_str(&format!("* *{}*: {}\n", comment.username, comment.text));
        }
    } else {
        content.push_str(&format!("\n{} comments (hidden)\n", post.comments.len()));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JournalAction;

    #[test]
    fn comments_show_only_when_toggled() {
        let mut journal = JournalState::default();
        let post = journal.posts[0].clone();

        let hidden = post_markdown(&journal, &post);
        assert!(hidden.contains("2 comments (hidden)"));
        assert!(!hidden.contains("fit_life"));

        journal.reduce(JournalAction::ToggleComments(post.id));
        let shown = post_markdown(&journal, &post);
        assert!(shown.contains("* *fit_life*: Absolutely agree!"));
    }

    #[test]
    fn like_is_counted_in_detail() {
        let mut journal = JournalState::default();
        let post = journal.posts[0].clone();
        journal.reduce(JournalAction::ToggleLike(post.id));
        let text = post_markdown(&journal, &post);
        assert!(text.contains(&format!("**Likes:** {} (you liked this)", post.likes + 1)));
    }
}
