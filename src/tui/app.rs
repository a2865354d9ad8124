use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::models::{BlogPost, BlogPostType, Mood, Snapshot, Task, Weekday};
use crate::storage::Backend;
use crate::store::{Action, BlogAction, JournalAction, Store, TaskAction, UiAction, WellnessAction};
use crate::tips::{quotes_or_fallback, FallbackQuotes, Quote};
use crate::tui::error::TuiError;
use crate::utils;
use crate::Config;

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);
const TIP_ROTATION: Duration = Duration::from_secs(8);
const ANIMATE_IN: Duration = Duration::from_millis(400);
/// How long a new journal post keeps its "NEW" badge once the feed is visible
const NEW_BADGE: Duration = Duration::from_secs(3);

const JOURNAL_FEED: &str = "journal";
const JOURNAL_COMPOSE: &str = "compose";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tracker,
    Journal,
    Blog,
    Snapshots,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Tracker, Tab::Journal, Tab::Blog, Tab::Snapshots];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tracker => "Tracker",
            Tab::Journal => "Journal",
            Tab::Blog => "Blog",
            Tab::Snapshots => "Snapshots",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Next tab to the right; stays put on the last one
    pub fn next(self) -> Self {
        Self::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    pub fn prev(self) -> Self {
        self.index().checked_sub(1).map(|i| Self::ALL[i]).unwrap_or(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Input,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellnessField {
    Sleep,
    Steps,
    Water,
}

impl WellnessField {
    pub fn label(self) -> &'static str {
        match self {
            WellnessField::Sleep => "Hours of sleep (0-10)",
            WellnessField::Steps => "Steps today",
            WellnessField::Water => "Cups of water (0-8)",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WellnessField::Sleep => Some(WellnessField::Steps),
            WellnessField::Steps => Some(WellnessField::Water),
            WellnessField::Water => None,
        }
    }
}

/// What the input prompt is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    Task(Weekday),
    JournalCaption,
    Comment(u64),
    BlogText,
    BlogAttach(BlogPostType),
    Wellness(WellnessField),
}

impl InputTarget {
    pub fn prompt(&self) -> String {
        match self {
            InputTarget::Task(day) => format!("New task for {}", day),
            InputTarget::JournalCaption => "How are you feeling today?".to_string(),
            InputTarget::Comment(_) => "Add a comment".to_string(),
            InputTarget::BlogText => "New text post (markdown)".to_string(),
            InputTarget::BlogAttach(kind) => format!("Path to {} file", kind.label()),
            InputTarget::Wellness(field) => field.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub day: Weekday,
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub list_state: ListState,
    pub detail_scroll: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub target: Option<InputTarget>,
    pub buffer: String,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone)]
struct Timers {
    last_tip: Instant,
    journal_shown: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub store: Store<Backend>,
    pub ui: UiState,
    pub input: InputState,
    pub status: StatusState,
    pub delete_confirmation: Option<PendingDelete>,
    /// 0 = Delete, 1 = Cancel
    pub delete_modal_selection: usize,
    pub quotes: Vec<Quote>,
    timers: Timers,
}

impl App {
    pub fn new(config: Config, mut store: Store<Backend>) -> Self {
        store.load_snapshots();

        let mut app = Self {
            config,
            store,
            ui: UiState {
                current_tab: Tab::Tracker,
                sidebar_state: SidebarState::Expanded,
                mode: Mode::View,
                list_state: ListState::default(),
                detail_scroll: 0,
            },
            input: InputState::default(),
            status: StatusState::default(),
            delete_confirmation: None,
            delete_modal_selection: 0,
            quotes: quotes_or_fallback(&FallbackQuotes),
            timers: Timers {
                last_tip: Instant::now(),
                journal_shown: None,
            },
        };
        app.sync_list_state();
        app
    }

    /// Dispatch through the store and surface any write failure in the status bar
    pub fn dispatch(&mut self, action: impl Into<Action>) -> bool {
        let changed = self.store.dispatch(action);
        self.report_store_error();
        changed
    }

    fn report_store_error(&mut self) {
        if let Some(e) = self.store.take_error() {
            self.set_status_message(format!("Failed to save: {}", e));
        }
    }

    // ---- selection ----

    pub fn item_count(&self) -> usize {
        let state = self.store.state();
        match self.ui.current_tab {
            Tab::Tracker => state.tasks.active_day_tasks().len(),
            Tab::Journal => state.journal.posts.len(),
            Tab::Blog => state.blog.posts.len(),
            Tab::Snapshots => state.data.snapshots.len(),
        }
    }

    /// Keep the list selection inside the current list
    pub fn sync_list_state(&mut self) {
        let count = self.item_count();
        if count == 0 {
            self.ui.list_state.select(None);
        } else {
            let index = self.ui.list_state.selected().unwrap_or(0).min(count - 1);
            self.ui.list_state.select(Some(index));
        }
    }

    fn select(&mut self, index: usize) {
        self.ui.list_state.select(Some(index));
        self.sync_list_state();
        self.on_selection_changed();
    }

    pub fn move_selection_up(&mut self) {
        if let Some(i) = self.ui.list_state.selected() {
            self.select(i.saturating_sub(1));
        }
    }

    pub fn move_selection_down(&mut self) {
        if let Some(i) = self.ui.list_state.selected() {
            self.select(i + 1);
        }
    }

    fn on_selection_changed(&mut self) {
        self.ui.detail_scroll = 0;
        if let Some(id) = self.selected_post_id() {
            self.dispatch(JournalAction::HighlightPost(id));
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        if self.ui.current_tab != Tab::Tracker {
            return None;
        }
        let index = self.ui.list_state.selected()?;
        self.store.state().tasks.active_day_tasks().get(index)
    }

    pub fn selected_post_id(&self) -> Option<u64> {
        if self.ui.current_tab != Tab::Journal {
            return None;
        }
        let index = self.ui.list_state.selected()?;
        self.store.state().journal.posts.get(index).map(|p| p.id)
    }

    pub fn selected_blog_post(&self) -> Option<BlogPost> {
        if self.ui.current_tab != Tab::Blog {
            return None;
        }
        let index = self.ui.list_state.selected()?;
        self.store.state().blog.all_posts().into_iter().nth(index)
    }

    pub fn selected_snapshot(&self) -> Option<&Snapshot> {
        if self.ui.current_tab != Tab::Snapshots {
            return None;
        }
        let index = self.ui.list_state.selected()?;
        self.store.state().data.snapshots.get(index)
    }

    // ---- navigation ----

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.ui.current_tab == tab {
            return;
        }
        if self.ui.current_tab == Tab::Journal {
            self.dispatch(JournalAction::ResetHighlight);
            self.dispatch(JournalAction::SetAnimateIn(false));
            self.timers.journal_shown = None;
        }

        self.ui.current_tab = tab;
        self.ui.detail_scroll = 0;
        self.ui.list_state.select(Some(0));

        match tab {
            Tab::Journal => {
                self.dispatch(JournalAction::SetAnimateIn(true));
                self.timers.journal_shown = Some(Instant::now());
            }
            Tab::Snapshots => {
                self.store.load_snapshots();
            }
            Tab::Blog => {
                self.timers.last_tip = Instant::now();
            }
            Tab::Tracker => {}
        }

        self.sync_list_state();
        self.on_selection_changed();
    }

    pub fn toggle_sidebar(&mut self) {
        if self.ui.current_tab == Tab::Blog {
            self.dispatch(BlogAction::ToggleSidebar);
            return;
        }
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    pub fn sidebar_collapsed(&self) -> bool {
        match self.ui.current_tab {
            Tab::Blog => self.store.state().blog.ui.sidebar_collapsed,
            _ => self.ui.sidebar_state == SidebarState::Collapsed,
        }
    }

    /// Previous/next day on the tracker, previous/next post type on the blog
    pub fn shift(&mut self, forward: bool) {
        match self.ui.current_tab {
            Tab::Tracker => {
                let day = self.store.state().tasks.active_day;
                let day = if forward { day.next() } else { day.prev() };
                self.dispatch(TaskAction::SetActiveDay(day));
                self.ui.list_state.select(Some(0));
                self.sync_list_state();
            }
            Tab::Blog => {
                let current = self.store.state().blog.ui.active_tab;
                let len = BlogPostType::ALL.len();
                let i = BlogPostType::ALL.iter().position(|t| *t == current).unwrap_or(0);
                let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
                self.dispatch(BlogAction::SetActiveTab(BlogPostType::ALL[next]));
            }
            Tab::Journal | Tab::Snapshots => {}
        }
    }

    pub fn scroll_detail_up(&mut self, lines: usize) {
        self.ui.detail_scroll = self.ui.detail_scroll.saturating_sub(lines);
    }

    /// Clamped against the content height at render time
    pub fn scroll_detail_down(&mut self, lines: usize) {
        self.ui.detail_scroll = self.ui.detail_scroll.saturating_add(lines);
    }

    // ---- status ----

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.clear_status_message();
            }
        }
    }

    // ---- modes ----

    pub fn toggle_help(&mut self) {
        self.ui.mode = if self.ui.mode == Mode::Help { Mode::View } else { Mode::Help };
    }

    // ---- tracker ----

    pub fn toggle_selected_task(&mut self) {
        let day = self.store.state().tasks.active_day;
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.dispatch(TaskAction::ToggleTask { day, id });
        }
    }

    pub fn request_delete_selected_task(&mut self) {
        let day = self.store.state().tasks.active_day;
        if let Some(task) = self.selected_task() {
            self.delete_confirmation = Some(PendingDelete {
                day,
                id: task.id.clone(),
                text: task.text.clone(),
            });
            self.delete_modal_selection = 0;
            self.ui.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.delete_confirmation.take() {
            if self.delete_modal_selection == 0
                && self.dispatch(TaskAction::DeleteTask { day: pending.day, id: pending.id })
            {
                self.set_status_message(format!("Deleted \"{}\"", pending.text));
            }
        }
        self.ui.mode = Mode::View;
        self.sync_list_state();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = None;
        self.ui.mode = Mode::View;
    }

    pub fn cycle_mood(&mut self) {
        let next = match self.store.state().wellness.mood {
            None => Mood::ALL[0],
            Some(mood) => {
                let i = Mood::ALL.iter().position(|m| *m == mood).unwrap_or(0);
                Mood::ALL[(i + 1) % Mood::ALL.len()]
            }
        };
        self.dispatch(WellnessAction::SetMood(Some(next)));
    }

    pub fn toggle_stats(&mut self) {
        self.dispatch(UiAction::ToggleStats);
    }

    // ---- journal ----

    pub fn toggle_like_selected(&mut self) {
        if let Some(id) = self.selected_post_id() {
            self.dispatch(JournalAction::ToggleLike(id));
        }
    }

    pub fn toggle_comments_selected(&mut self) {
        if let Some(id) = self.selected_post_id() {
            self.dispatch(JournalAction::ToggleComments(id));
        }
    }

    pub fn begin_comment(&mut self) {
        if let Some(id) = self.selected_post_id() {
            self.begin_input(InputTarget::Comment(id));
        }
    }

    // ---- blog ----

    pub fn toggle_private(&mut self) {
        self.dispatch(BlogAction::TogglePrivate);
    }

    // ---- input ----

    /// Start the "new" flow for the current page
    pub fn begin_new_item(&mut self) {
        let target = match self.ui.current_tab {
            Tab::Tracker => InputTarget::Task(self.store.state().tasks.active_day),
            Tab::Journal => InputTarget::JournalCaption,
            Tab::Blog => match self.store.state().blog.ui.active_tab {
                BlogPostType::Text => InputTarget::BlogText,
                kind => InputTarget::BlogAttach(kind),
            },
            Tab::Snapshots => {
                self.save_snapshot();
                return;
            }
        };
        self.begin_input(target);
    }

    pub fn begin_wellness_edit(&mut self) {
        self.begin_input(InputTarget::Wellness(WellnessField::Sleep));
    }

    pub fn begin_input(&mut self, target: InputTarget) {
        let wellness = &self.store.state().wellness;
        self.input.buffer = match target {
            InputTarget::Wellness(WellnessField::Sleep) => wellness.sleep_hours.to_string(),
            InputTarget::Wellness(WellnessField::Steps) => wellness.steps.to_string(),
            InputTarget::Wellness(WellnessField::Water) => wellness.water_cups.to_string(),
            InputTarget::JournalCaption => self.store.state().journal.draft.caption.clone(),
            InputTarget::BlogText => self.store.state().blog.draft.clone(),
            _ => String::new(),
        };
        if target == InputTarget::JournalCaption {
            self.dispatch(JournalAction::SetExpanded(true));
            self.dispatch(JournalAction::SetActiveTab(JOURNAL_COMPOSE.to_string()));
        }
        self.input.target = Some(target);
        self.ui.mode = Mode::Input;
    }

    pub fn input_char(&mut self, c: char) {
        self.input.buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.buffer.pop();
    }

    /// Tab inside the journal composer cycles the draft mood
    pub fn cycle_draft_mood(&mut self) {
        if self.input.target == Some(InputTarget::JournalCaption) {
            let next = self.store.state().journal.draft.mood.next();
            self.dispatch(JournalAction::SetDraftMood(next));
        }
    }

    pub fn cancel_input(&mut self) {
        match self.input.target.take() {
            Some(InputTarget::JournalCaption) => {
                self.close_composer();
                self.dispatch(JournalAction::ResetDraft);
            }
            Some(InputTarget::BlogText) => {
                let draft = std::mem::take(&mut self.input.buffer);
                self.dispatch(BlogAction::SetDraftContent(draft));
            }
            _ => {}
        }
        self.input.buffer.clear();
        self.ui.mode = Mode::View;
    }

    fn close_composer(&mut self) {
        self.dispatch(JournalAction::SetExpanded(false));
        self.dispatch(JournalAction::SetActiveTab(JOURNAL_FEED.to_string()));
    }

    pub fn submit_input(&mut self) {
        let Some(target) = self.input.target.take() else {
            self.ui.mode = Mode::View;
            return;
        };
        let text = std::mem::take(&mut self.input.buffer);
        self.ui.mode = Mode::View;

        match target {
            InputTarget::Task(day) => {
                if self.dispatch(TaskAction::AddTask { day, text }) {
                    let count = self.store.state().tasks.tasks_for(day).len();
                    self.select(count.saturating_sub(1));
                }
            }
            InputTarget::JournalCaption => {
                self.dispatch(JournalAction::SetDraftCaption(text));
                if self.dispatch(JournalAction::AddPost) {
                    self.timers.journal_shown = Some(Instant::now());
                    self.select(0);
                }
                self.close_composer();
            }
            InputTarget::Comment(id) => {
                if self.dispatch(JournalAction::AddComment { id, text })
                    && !self.store.state().journal.comments_visible(id)
                {
                    self.dispatch(JournalAction::ToggleComments(id));
                }
            }
            InputTarget::BlogText => {
                self.dispatch(BlogAction::SetDraftContent(text));
                if self.dispatch(BlogAction::AddTextPost) {
                    self.set_status_message("Post published".to_string());
                    self.select(0);
                }
            }
            InputTarget::BlogAttach(kind) => self.attach_media(&text, kind),
            InputTarget::Wellness(field) => {
                if let Ok(value) = text.trim().parse::<i64>() {
                    let action = match field {
                        WellnessField::Sleep => WellnessAction::SetSleepHours(value),
                        WellnessField::Steps => WellnessAction::SetSteps(value),
                        WellnessField::Water => WellnessAction::SetWaterCups(value),
                    };
                    self.dispatch(action);
                }
                if let Some(next) = field.next() {
                    self.begin_input(InputTarget::Wellness(next));
                }
            }
        }
    }

    fn attach_media(&mut self, raw_path: &str, kind: BlogPostType) {
        let raw_path = raw_path.trim();
        if raw_path.is_empty() {
            return;
        }
        let path = utils::expand_path(raw_path);
        match self.store.import_media(&path, kind) {
            Ok(media) => {
                let name = media.file_name.clone();
                let action = match kind {
                    BlogPostType::Music => BlogAction::AddMusicPost(media),
                    _ => BlogAction::AddImagePost(media),
                };
                if self.dispatch(action) {
                    self.set_status_message(format!("Attached {}", name));
                    self.select(0);
                }
            }
            Err(e) => {
                log::warn!("Failed to attach {}: {}", path.display(), e);
                self.set_status_message(format!("Could not attach file: {}", e));
            }
        }
    }

    // ---- snapshots ----

    pub fn save_snapshot(&mut self) {
        let saved = self.store.save_snapshot().map(|s| s.timestamp.clone());
        if let Some(e) = self.store.take_error() {
            self.set_status_message(format!("Failed to save snapshot: {}", e));
        } else if let Some(timestamp) = saved {
            self.set_status_message(format!("Snapshot saved ({})", timestamp));
        }
        self.sync_list_state();
    }

    /// JSON for the selected snapshot, or the last one saved this session
    pub fn export_json(&self) -> Option<String> {
        let data = &self.store.state().data;
        let snapshot = match self.ui.current_tab {
            Tab::Snapshots => self.selected_snapshot(),
            _ => data.exported.as_ref().or_else(|| data.latest()),
        }?;
        serde_json::to_string_pretty(snapshot).ok()
    }

    pub fn export_to_clipboard(&mut self) -> Result<(), TuiError> {
        let Some(json) = self.export_json() else {
            self.set_status_message("No snapshot to export yet".to_string());
            return Ok(());
        };
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| TuiError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(json)
            .map_err(|e| TuiError::ClipboardError(e.to_string()))?;
        self.set_status_message("Snapshot JSON copied to clipboard".to_string());
        Ok(())
    }

    // ---- timers ----

    /// Advance time-based presentation state: tip rotation, the journal
    /// fade-in flag and "NEW" badges.
    pub fn tick(&mut self, now: Instant) {
        if self.ui.current_tab == Tab::Blog
            && now.saturating_duration_since(self.timers.last_tip) >= TIP_ROTATION
        {
            self.dispatch(BlogAction::IncrementTip);
            self.timers.last_tip = now;
        }

        let Some(shown) = self.timers.journal_shown else {
            return;
        };
        let elapsed = now.saturating_duration_since(shown);
        if self.store.state().journal.animate_in && elapsed >= ANIMATE_IN {
            self.dispatch(JournalAction::SetAnimateIn(false));
        }
        if elapsed >= NEW_BADGE {
            let fresh: Vec<u64> = self
                .store
                .state()
                .journal
                .posts
                .iter()
                .filter(|p| p.is_new)
                .map(|p| p.id)
                .collect();
            for id in fresh {
                self.dispatch(JournalAction::MarkPostAsOld(id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn app() -> App {
        App::new(Config::default(), Store::open(Backend::Memory(MemoryStore::new())))
    }

    #[test]
    fn attach_prompt_names_the_media_kind() {
        assert_eq!(InputTarget::BlogAttach(BlogPostType::Music).prompt(), "Path to music file");
        assert_eq!(InputTarget::Task(Weekday::Monday).prompt(), "New task for Monday");
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn tab_navigation_stops_at_the_ends() {
        assert_eq!(Tab::Tracker.prev(), Tab::Tracker);
        assert_eq!(Tab::Tracker.next(), Tab::Journal);
        assert_eq!(Tab::Snapshots.next(), Tab::Snapshots);
    }

    #[test]
    fn adding_a_task_selects_it() {
        let mut app = app();
        app.begin_new_item();
        assert_eq!(app.ui.mode, Mode::Input);
        type_text(&mut app, "Stretch");
        app.submit_input();

        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.selected_task().map(|t| t.text.as_str()), Some("Stretch"));
        app.toggle_selected_task();
        assert!(app.selected_task().unwrap().completed);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        app.begin_new_item();
        type_text(&mut app, "Temp");
        app.submit_input();

        app.request_delete_selected_task();
        assert_eq!(app.ui.mode, Mode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.item_count(), 1);

        app.request_delete_selected_task();
        app.confirm_delete();
        assert_eq!(app.item_count(), 0);
        assert_eq!(app.ui.list_state.selected(), None);
    }

    #[test]
    fn wellness_prompts_chain_through_fields() {
        let mut app = app();
        app.begin_wellness_edit();
        app.input.buffer = "7".to_string();
        app.submit_input();
        assert_eq!(app.input.target, Some(InputTarget::Wellness(WellnessField::Steps)));
        app.input.buffer = "8000".to_string();
        app.submit_input();
        app.input.buffer = "12".to_string();
        app.submit_input();

        let record = &app.store.state().wellness;
        assert_eq!((record.sleep_hours, record.steps, record.water_cups), (7, 8000, 8));
        assert_eq!(app.ui.mode, Mode::View);
    }

    #[test]
    fn mood_cycles_through_all_values() {
        let mut app = app();
        app.cycle_mood();
        assert_eq!(app.store.state().wellness.mood, Some(Mood::Happy));
        for _ in 0..Mood::ALL.len() {
            app.cycle_mood();
        }
        assert_eq!(app.store.state().wellness.mood, Some(Mood::Happy));
    }

    #[test]
    fn journal_post_gets_badge_then_loses_it() {
        let mut app = app();
        app.switch_tab(Tab::Journal);
        assert!(app.store.state().journal.animate_in);

        app.begin_new_item();
        assert!(app.store.state().journal.expanded);
        type_text(&mut app, "Walked 5k");
        app.submit_input();

        let journal = &app.store.state().journal;
        assert!(!journal.expanded);
        assert_eq!(journal.posts[0].caption, "Walked 5k");
        assert!(journal.posts[0].is_new);

        app.tick(Instant::now() + NEW_BADGE + Duration::from_millis(10));
        let journal = &app.store.state().journal;
        assert!(!journal.animate_in);
        assert!(journal.posts.iter().all(|p| !p.is_new));
    }

    #[test]
    fn like_and_comment_on_selected_post() {
        let mut app = app();
        app.switch_tab(Tab::Journal);
        let id = app.selected_post_id().unwrap();
        let before = app.store.state().journal.effective_likes(id).unwrap();

        app.toggle_like_selected();
        assert_eq!(app.store.state().journal.effective_likes(id), Some(before + 1));

        app.begin_comment();
        type_text(&mut app, "Nice!");
        app.submit_input();
        let journal = &app.store.state().journal;
        assert!(journal.comments_visible(id));
        assert_eq!(journal.post(id).unwrap().comments.last().unwrap().text, "Nice!");
    }

    #[test]
    fn cancelled_composer_resets_draft() {
        let mut app = app();
        app.switch_tab(Tab::Journal);
        app.begin_new_item();
        type_text(&mut app, "half a thought");
        app.cycle_draft_mood();
        app.cancel_input();

        let journal = &app.store.state().journal;
        assert!(!journal.expanded);
        assert_eq!(journal.active_tab, JOURNAL_FEED);
        assert_eq!(journal.posts.len(), 1);
    }

    #[test]
    fn blog_shift_cycles_post_types_and_new_follows_it() {
        let mut app = app();
        app.switch_tab(Tab::Blog);
        app.shift(true);
        assert_eq!(app.store.state().blog.ui.active_tab, BlogPostType::Image);
        app.begin_new_item();
        assert_eq!(app.input.target, Some(InputTarget::BlogAttach(BlogPostType::Image)));
        app.cancel_input();

        app.shift(false);
        app.begin_new_item();
        type_text(&mut app, "# Day one");
        app.submit_input();
        assert!(matches!(app.selected_blog_post(), Some(BlogPost::Text(p)) if p.content == "# Day one"));
    }

    #[test]
    fn attaching_a_missing_file_reports_an_error() {
        let mut app = app();
        app.switch_tab(Tab::Blog);
        app.shift(true);
        app.begin_new_item();
        type_text(&mut app, "/definitely/not/here.png");
        app.submit_input();
        assert!(app.status.message.as_deref().unwrap_or_default().starts_with("Could not attach"));
        assert_eq!(app.item_count(), 0);
    }

    #[test]
    fn blog_sidebar_toggle_is_per_page() {
        let mut app = app();
        app.switch_tab(Tab::Blog);
        app.toggle_sidebar();
        assert!(app.sidebar_collapsed());
        app.switch_tab(Tab::Tracker);
        assert!(!app.sidebar_collapsed());
    }

    #[test]
    fn tips_rotate_only_on_the_blog_page() {
        let mut app = app();
        app.tick(Instant::now() + TIP_ROTATION * 2);
        assert_eq!(app.store.state().blog.ui.current_tip, 0);

        app.switch_tab(Tab::Blog);
        app.tick(Instant::now() + TIP_ROTATION + Duration::from_millis(10));
        assert_eq!(app.store.state().blog.ui.current_tip, 1);
    }

    #[test]
    fn snapshots_page_exports_selected_snapshot() {
        let mut app = app();
        assert_eq!(app.export_json(), None);
        app.save_snapshot();
        app.switch_tab(Tab::Snapshots);
        assert_eq!(app.item_count(), 1);
        let json = app.export_json().unwrap();
        assert!(json.contains("\"stats\""));
    }
}
