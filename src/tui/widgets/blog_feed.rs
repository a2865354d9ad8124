use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::models::{BlogPost, BlogPostType, MediaRef};
use crate::store::blog::BlogUi;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::detail::render_detail;
use crate::tui::widgets::{render_themed_list, truncate};
use crate::Config;

pub fn render_blog_list(
    f: &mut Frame,
    area: Rect,
    posts: &[BlogPost],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if posts.is_empty() {
        vec![ListItem::new(truncate("Nothing posted yet", max_width))]
    } else {
        posts
            .iter()
            .map(|post| {
                let lock = if post.is_private() { "🔒 " } else { "" };
                ListItem::new(vec![
                    Line::from(truncate(&format!("{}{}", lock, post.summary()), max_width)),
                    Line::from(truncate(&format!("  {}", post.timestamp()), max_width)),
                ])
            })
            .collect()
    };
    render_themed_list(f, area, format!("Posts ({})", posts.len()), items, list_state, config);
}

/// Post-type selector and privacy toggle above the post view
pub fn composer_line(ui: &BlogUi) -> Vec<(String, bool)> {
    let mut parts: Vec<(String, bool)> = BlogPostType::ALL
        .iter()
        .map(|kind| (format!(" {} ", capitalize(kind.label())), *kind == ui.active_tab))
        .collect();
    let privacy = if ui.is_private { " 🔒 Private " } else { " 🌐 Public " };
    parts.push((privacy.to_string(), false));
    parts
}

pub fn render_blog_main(
    f: &mut Frame,
    area: Rect,
    ui: &BlogUi,
    selected: Option<&BlogPost>,
    config: &Config,
    scroll_offset: usize,
) -> usize {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let active = Style::default()
        .fg(get_contrast_text_color(highlight_bg))
        .bg(highlight_bg)
        .add_modifier(Modifier::BOLD);

    let [header_area, post_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let spans: Vec<Span> = composer_line(ui)
        .into_iter()
        .map(|(text, is_active)| {
            if is_active {
                Span::styled(text, active)
            } else {
                Span::raw(text)
            }
        })
        .collect();
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Create")
            .style(Style::default().fg(fg_color).bg(bg_color)),
    );
    f.render_widget(header, header_area);

    match selected {
        Some(post) => {
            let title = format!("{} post", capitalize(post.kind().label()));
            render_detail(f, post_area, &title, &post_markdown(post), config, scroll_offset)
        }
        None => render_detail(
            f,
            post_area,
            "Post",
            "Share something: pick a post type and press the *new* key.",
            config,
            0,
        ),
    }
}

pub fn post_markdown(post: &BlogPost) -> String {
    let visibility = if post.is_private() { "Private" } else { "Public" };
    let mut content = format!("*{}* · {}\n\n", post.timestamp(), visibility);
    match post {
        BlogPost::Text(p) => content.push_str(&p.content),
        BlogPost::Image(p) => content.push_str(&media_markdown("Image", &p.image)),
        BlogPost::Music(p) => content.push_str(&media_markdown("Track", &p.music)),
    }
    content.push('\n');
    content
}

fn media_markdown(heading: &str, media: &MediaRef) -> String {
    format!(
        "**{}:** {}\n\n**Type:** {}\n**Size:** {}\n**Stored as:** `{}`\n",
        heading,
        media.file_name,
        media.mime_type,
        format_size(media.size),
        media.id
    )
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImagePost, TextPost};

    #[test]
    fn composer_marks_active_type_and_privacy() {
        let ui = BlogUi {
            active_tab: BlogPostType::Music,
            is_private: true,
            ..BlogUi::default()
        };
        let parts = composer_line(&ui);
        assert_eq!(parts[2], (" Music ".to_string(), true));
        assert!(!parts[0].1);
        assert_eq!(parts[3].0, " 🔒 Private ");
    }

    #[test]
    fn text_post_body_is_the_markdown() {
        let post = BlogPost::Text(TextPost {
            content: "# Hello\nworld".to_string(),
            is_private: false,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        });
        let md = post_markdown(&post);
        assert!(md.starts_with("*2024-01-01T00:00:00.000Z* · Public"));
        assert!(md.contains("# Hello\nworld"));
    }

    #[test]
    fn image_post_lists_media_metadata() {
        let post = BlogPost::Image(ImagePost {
            image: MediaRef {
                id: "abc".to_string(),
                file_name: "sunset.png".to_string(),
                mime_type: "image/png".to_string(),
                size: 2048,
            },
            is_private: true,
            timestamp: "t".to_string(),
        });
        let md = post_markdown(&post);
        assert!(md.contains("**Image:** sunset.png"));
        assert!(md.contains("**Size:** 2.0 KB"));
        assert!(md.contains("Private"));
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }
}
