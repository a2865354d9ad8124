use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::{InputTarget, Mode, Tab};
use crate::tui::widgets::{
    blog_feed::{render_blog_list, render_blog_main},
    color::parse_color,
    confirm_delete::render_confirm_delete,
    detail::render_detail,
    help::render_help,
    info_box::render_info_box,
    input::render_input,
    journal_feed::{post_markdown, render_journal_list},
    snapshot_list::{render_snapshot_list, snapshot_markdown},
    stats::render_wellness,
    status_bar::render_status_bar,
    tabs::render_tabs,
    task_list::render_task_list,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("LifeLog")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    if !app.sidebar_collapsed() && layout.sidebar_area.width > 0 {
        render_sidebar(f, app, layout);
    }
    app.ui.detail_scroll = render_main(f, app, layout);

    render_info_box(
        f,
        layout.info_area,
        app.ui.current_tab,
        app.store.state(),
        &app.quotes,
        &app.config,
    );

    match app.ui.mode {
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::ConfirmDelete => {
            if let Some(ref pending) = app.delete_confirmation {
                render_confirm_delete(f, f.area(), pending, app.delete_modal_selection, &app.config);
            }
        }
        Mode::Input => {
            if let Some(ref target) = app.input.target {
                let hint = input_hint(app, target);
                render_input(f, f.area(), &target.prompt(), &app.input.buffer, hint.as_deref(), &app.config);
            }
        }
        Mode::View => {}
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &app.config);
}

fn render_sidebar(f: &mut Frame, app: &mut App, layout: &Layout) {
    let area = layout.sidebar_area;
    match app.ui.current_tab {
        Tab::Tracker => {
            let tasks = &app.store.state().tasks;
            render_task_list(
                f,
                area,
                tasks.active_day,
                tasks.active_day_tasks(),
                &mut app.ui.list_state,
                &app.config,
            );
        }
        Tab::Journal => {
            render_journal_list(f, area, &app.store.state().journal, &mut app.ui.list_state, &app.config);
        }
        Tab::Blog => {
            let posts = app.store.state().blog.all_posts();
            render_blog_list(f, area, &posts, &mut app.ui.list_state, &app.config);
        }
        Tab::Snapshots => {
            render_snapshot_list(
                f,
                area,
                &app.store.state().data.snapshots,
                &mut app.ui.list_state,
                &app.config,
            );
        }
    }
}

/// Draws the main pane and returns the clamped detail scroll
fn render_main(f: &mut Frame, app: &App, layout: &Layout) -> usize {
    let area = layout.main_area;
    let state = app.store.state();
    let scroll = app.ui.detail_scroll;

    match app.ui.current_tab {
        Tab::Tracker => {
            let stats = state.ui.show_stats.then(|| state.tasks.stats());
            render_wellness(f, area, &state.wellness, stats, &app.config);
            0
        }
        Tab::Journal => {
            let post = app.selected_post_id().and_then(|id| state.journal.post(id));
            match post {
                Some(post) => {
                    render_detail(f, area, "Post", &post_markdown(&state.journal, post), &app.config, scroll)
                }
                None => render_detail(f, area, "Post", "No posts yet. Share how you feel!", &app.config, 0),
            }
        }
        Tab::Blog => {
            let selected = app.selected_blog_post();
            render_blog_main(f, area, &state.blog.ui, selected.as_ref(), &app.config, scroll)
        }
        Tab::Snapshots => match app.selected_snapshot() {
            Some(snapshot) => {
                render_detail(f, area, "Snapshot", &snapshot_markdown(snapshot), &app.config, scroll)
            }
            None => render_detail(
                f,
                area,
                "Snapshot",
                "Save a snapshot to record today's tasks and wellness.",
                &app.config,
                0,
            ),
        },
    }
}

fn input_hint(app: &App, target: &InputTarget) -> Option<String> {
    match target {
        InputTarget::JournalCaption => {
            let mood = app.store.state().journal.draft.mood;
            Some(format!("Mood: {} {} (Tab to change)", mood.emoji(), mood.label()))
        }
        InputTarget::BlogText => {
            let private = app.store.state().blog.ui.is_private;
            Some(format!("Markdown supported · {}", if private { "private" } else { "public" }))
        }
        InputTarget::BlogAttach(_) => Some("~ expands to your home directory".to_string()),
        _ => None,
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Input => {
            let mut hints = vec!["Enter: Submit".to_string(), "Esc: Cancel".to_string()];
            if app.input.target == Some(InputTarget::JournalCaption) {
                hints.push("Tab: Mood".to_string());
            }
            hints
        }
        Mode::ConfirmDelete => vec![
            "↑/↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::View => {
            let mut hints = vec![format!("{}: Quit", key(&kb.quit))];
            match app.ui.current_tab {
                Tab::Tracker => {
                    hints.push(format!("{}: New task", key(&kb.new)));
                    hints.push(format!("{}: Done", key(&kb.toggle_status)));
                    hints.push(format!("{}: Delete", key(&kb.delete)));
                    hints.push(format!("{}/{}: Day", key(&kb.prev_day), key(&kb.next_day)));
                    hints.push(format!("{}: Mood", key(&kb.cycle_mood)));
                    hints.push(format!("{}: Wellness", key(&kb.edit_wellness)));
                    hints.push(format!("{}: Stats", key(&kb.toggle_stats)));
                }
                Tab::Journal => {
                    hints.push(format!("{}: Post", key(&kb.new)));
                    hints.push(format!("{}: Like", key(&kb.like)));
                    hints.push(format!("{}: Comment", key(&kb.comment)));
                    hints.push(format!("{}: Comments", key(&kb.select)));
                }
                Tab::Blog => {
                    hints.push(format!("{}: New post", key(&kb.new)));
                    hints.push(format!("{}/{}: Type", key(&kb.prev_day), key(&kb.next_day)));
                    hints.push(format!("{}: Private", key(&kb.toggle_private)));
                }
                Tab::Snapshots => {
                    hints.push(format!("{}: Export", key(&kb.export)));
                }
            }
            hints.push(format!("{}: Save", key(&kb.save_snapshot)));
            hints.push(format!("{}: Sidebar", key(&kb.toggle_sidebar)));
            hints.push(format!("{}: Help", key(&kb.help)));
            hints
        }
    }
}
