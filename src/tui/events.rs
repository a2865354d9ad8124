use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};

use crate::tui::app::{Mode, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::confirm_delete::OPTIONS;
use crate::tui::App;
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const PAGE_SCROLL: usize = 10;

/// Restores the terminal when dropped, including on panic. A terminal left in
/// raw mode or on the alternate screen is unusable for the user.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; drop becomes a no-op afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // already cleaning up, errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    log::info!("TUI started ({}x{})", width, height);

    loop {
        app.check_status_message_timeout();
        app.tick(Instant::now());

        let size = terminal.size()?;
        let rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(rect, app.config.sidebar_width_percent, app.sidebar_collapsed());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                // Press only: Windows also reports releases
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event)? {
                        break;
                    }
                }
                // size is re-read on the next draw
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    guard.restore()?;
    log::info!("TUI closed");
    Ok(())
}

/// Handle one key press. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Input => handle_input_mode(app, key_event),
        Mode::ConfirmDelete => handle_delete_confirmation_modal(app, key_event),
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || pressed(key_event, &app.config.key_bindings.help)? {
        app.toggle_help();
    }
    Ok(false)
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let last = OPTIONS.len() - 1;
    match key_event.code {
        KeyCode::Up => {
            app.delete_modal_selection = if app.delete_modal_selection == 0 {
                last
            } else {
                app.delete_modal_selection - 1
            };
        }
        KeyCode::Down => {
            app.delete_modal_selection = if app.delete_modal_selection >= last {
                0
            } else {
                app.delete_modal_selection + 1
            };
        }
        KeyCode::Enter => app.confirm_delete(),
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_input_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Tab => app.cycle_draft_mood(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => app.input_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if pressed(key_event, &kb.quit)? {
        return Ok(true);
    }
    if pressed(key_event, &kb.help)? {
        app.toggle_help();
        return Ok(false);
    }
    if pressed(key_event, &kb.toggle_sidebar)? {
        app.toggle_sidebar();
        return Ok(false);
    }

    // Pages
    if pressed(key_event, &kb.tab_left)? {
        app.switch_tab(app.ui.current_tab.prev());
        return Ok(false);
    }
    if pressed(key_event, &kb.tab_right)? {
        app.switch_tab(app.ui.current_tab.next());
        return Ok(false);
    }
    for (binding, tab) in [(&kb.tab_1, Tab::Tracker), (&kb.tab_2, Tab::Journal), (&kb.tab_3, Tab::Blog), (&kb.tab_4, Tab::Snapshots)] {
        if pressed(key_event, binding)? {
            app.switch_tab(tab);
            return Ok(false);
        }
    }

    // Lists and scrolling
    if key_event.code == KeyCode::Up || pressed(key_event, &kb.list_up)? {
        app.move_selection_up();
        return Ok(false);
    }
    if key_event.code == KeyCode::Down || pressed(key_event, &kb.list_down)? {
        app.move_selection_down();
        return Ok(false);
    }
    match key_event.code {
        KeyCode::PageUp => {
            app.scroll_detail_up(PAGE_SCROLL);
            return Ok(false);
        }
        KeyCode::PageDown => {
            app.scroll_detail_down(PAGE_SCROLL);
            return Ok(false);
        }
        _ => {}
    }

    // Available everywhere
    if pressed(key_event, &kb.save_snapshot)? {
        app.save_snapshot();
        return Ok(false);
    }
    if pressed(key_event, &kb.export)? {
        if let Err(e) = app.export_to_clipboard() {
            log::warn!("Export failed: {}", e);
            app.set_status_message(e.to_string());
        }
        return Ok(false);
    }
    if pressed(key_event, &kb.new)? {
        app.begin_new_item();
        return Ok(false);
    }
    if pressed(key_event, &kb.prev_day)? {
        app.shift(false);
        return Ok(false);
    }
    if pressed(key_event, &kb.next_day)? {
        app.shift(true);
        return Ok(false);
    }

    match app.ui.current_tab {
        Tab::Tracker => handle_tracker_keys(app, key_event, &kb)?,
        Tab::Journal => handle_journal_keys(app, key_event, &kb)?,
        Tab::Blog => {
            if pressed(key_event, &kb.toggle_private)? {
                app.toggle_private();
            }
        }
        Tab::Snapshots => {}
    }
    Ok(false)
}

fn handle_tracker_keys(
    app: &mut App,
    key_event: KeyEvent,
    kb: &crate::config::KeyBindings,
) -> Result<(), TuiError> {
    if pressed(key_event, &kb.toggle_status)? || pressed(key_event, &kb.select)? {
        app.toggle_selected_task();
    } else if pressed(key_event, &kb.delete)? {
        app.request_delete_selected_task();
    } else if pressed(key_event, &kb.cycle_mood)? {
        app.cycle_mood();
    } else if pressed(key_event, &kb.edit_wellness)? {
        app.begin_wellness_edit();
    } else if pressed(key_event, &kb.toggle_stats)? {
        app.toggle_stats();
    }
    Ok(())
}

fn handle_journal_keys(
    app: &mut App,
    key_event: KeyEvent,
    kb: &crate::config::KeyBindings,
) -> Result<(), TuiError> {
    if pressed(key_event, &kb.like)? {
        app.toggle_like_selected();
    } else if pressed(key_event, &kb.comment)? {
        app.begin_comment();
    } else if pressed(key_event, &kb.select)? {
        app.toggle_comments_selected();
    }
    Ok(())
}

fn pressed(key_event: KeyEvent, binding: &str) -> Result<bool, TuiError> {
    let parsed = parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    Ok(matches_key_event(key_event, &parsed))
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Primary modifier is Ctrl, or Option on macOS
    if binding.requires_ctrl != has_primary_modifier(key_event.modifiers) {
        return false;
    }
    binding.key_code == key_event.code
}
