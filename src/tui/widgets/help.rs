use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup = popup_area(area, 60, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let sections: [(&str, Vec<(String, &str)>); 5] = [
        (
            "Navigation",
            vec![
                (format!("{} / {}", key(&kb.tab_left), key(&kb.tab_right)), "Switch pages"),
                (
                    format!("{} / {} / {} / {}", key(&kb.tab_1), key(&kb.tab_2), key(&kb.tab_3), key(&kb.tab_4)),
                    "Tracker / Journal / Blog / Snapshots",
                ),
                (format!("{} / {} or ↑/↓", key(&kb.list_up), key(&kb.list_down)), "Move in list"),
                (format!("{} / {}", key(&kb.prev_day), key(&kb.next_day)), "Previous / next day or post type"),
                (key(&kb.toggle_sidebar), "Toggle sidebar"),
            ],
        ),
        (
            "Tracker",
            vec![
                (key(&kb.new), "New task for the selected day"),
                (key(&kb.toggle_status), "Mark task done / not done"),
                (key(&kb.delete), "Delete task"),
                (key(&kb.cycle_mood), "Cycle mood"),
                (key(&kb.edit_wellness), "Enter sleep, steps and water"),
                (key(&kb.toggle_stats), "Show / hide stats overview"),
            ],
        ),
        (
            "Journal",
            vec![
                (key(&kb.new), "Write a post (Tab cycles the mood)"),
                (key(&kb.like), "Like / unlike"),
                (key(&kb.comment), "Add a comment"),
                (key(&kb.select), "Show / hide comments"),
            ],
        ),
        (
            "Blog",
            vec![
                (key(&kb.new), "New text post, or attach a file for image/music"),
                (key(&kb.toggle_private), "Toggle private"),
                ("PgUp / PgDn".to_string(), "Scroll post"),
            ],
        ),
        (
            "General",
            vec![
                (key(&kb.save_snapshot), "Save snapshot"),
                (key(&kb.export), "Copy snapshot JSON to clipboard"),
                (key(&kb.help), "Show / hide help"),
                (key(&kb.quit), "Quit"),
            ],
        ),
    ];

    let mut text = String::new();
    for (title, entries) in sections {
        text.push_str(title);
        text.push_str(":\n");
        for (keys, description) in entries {
            text.push_str(&format!("  {}: {}\n", keys, description));
        }
        text.push('\n');
    }
    text
}
