//! Application state container.
//!
//! Each domain owns a slice of [`AppState`] and a `reduce` function that only
//! touches that slice. [`Store`] routes an [`Action`] to its reducer and then
//! writes the affected subtree to the injected storage backend.

pub mod blog;
pub mod data;
pub mod journal;
pub mod tasks;
pub mod ui;
pub mod wellness;

use std::path::Path;
use thiserror::Error;

use crate::models::{lenient_number, BlogPostType, MediaRef, Mood, Snapshot, TasksByDay, WellnessRecord};
use crate::storage::{self, keys, BlobStore, KeyValueStore, StorageError};

pub use blog::{BlogAction, BlogBuckets, BlogState};
pub use data::{DataAction, DataState, MAX_SNAPSHOTS};
pub use journal::{JournalAction, JournalState};
pub use tasks::{TaskAction, TasksState};
pub use ui::{UiAction, UiFlags};
pub use wellness::WellnessAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Tasks(TaskAction),
    Wellness(WellnessAction),
    Ui(UiAction),
    Data(DataAction),
    Journal(JournalAction),
    Blog(BlogAction),
}

impl From<TaskAction> for Action {
    fn from(a: TaskAction) -> Self {
        Action::Tasks(a)
    }
}

impl From<WellnessAction> for Action {
    fn from(a: WellnessAction) -> Self {
        Action::Wellness(a)
    }
}

impl From<UiAction> for Action {
    fn from(a: UiAction) -> Self {
        Action::Ui(a)
    }
}

impl From<DataAction> for Action {
    fn from(a: DataAction) -> Self {
        Action::Data(a)
    }
}

impl From<JournalAction> for Action {
    fn from(a: JournalAction) -> Self {
        Action::Journal(a)
    }
}

impl From<BlogAction> for Action {
    fn from(a: BlogAction) -> Self {
        Action::Blog(a)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: TasksState,
    pub wellness: WellnessRecord,
    pub ui: UiFlags,
    pub data: DataState,
    pub journal: JournalState,
    pub blog: BlogState,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("Expected {expected} media, got {actual}")]
    WrongKind { expected: &'static str, actual: String },
}

/// State plus the storage it persists to
pub struct Store<S> {
    state: AppState,
    storage: S,
    last_error: Option<StorageError>,
}

impl<S: KeyValueStore + BlobStore> Store<S> {
    /// Rehydrate tasks, wellness and blog posts from `storage`.
    /// Missing or unreadable keys fall back to defaults.
    pub fn open(storage: S) -> Self {
        let by_day: TasksByDay = storage::load_json_or(&storage, keys::TASKS, crate::models::empty_week());
        let wellness = load_wellness(&storage);
        let posts: BlogBuckets = storage::load_json_or(&storage, keys::BLOG_POSTS, BlogBuckets::default());

        log::info!(
            "Store opened: {} tasks, {} blog posts",
            by_day.values().map(Vec::len).sum::<usize>(),
            posts.len()
        );

        Self {
            state: AppState {
                tasks: TasksState::from_stored(by_day),
                wellness,
                blog: BlogState::with_posts(posts),
                ..AppState::default()
            },
            storage,
            last_error: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The most recent persistence failure, cleared on read
    pub fn take_error(&mut self) -> Option<StorageError> {
        self.last_error.take()
    }

    /// Run `action` through its reducer and persist the affected subtree.
    /// Returns true when the state changed and was stored. When the write
    /// fails the slice is restored to its prior value, the error is kept for
    /// [`Store::take_error`] and false is returned.
    pub fn dispatch(&mut self, action: impl Into<Action>) -> bool {
        let action = action.into();
        log::debug!("dispatch {:?}", action);
        match action {
            Action::Tasks(action) => {
                let persists = action.persists();
                let prior = self.state.tasks.clone();
                if !self.state.tasks.reduce(action) {
                    return false;
                }
                if !persists {
                    return true;
                }
                let result = storage::save_json(&self.storage, keys::TASKS, &self.state.tasks.by_day);
                self.commit(keys::TASKS, result, |state| state.tasks = prior)
            }
            Action::Wellness(action) => {
                let prior = self.state.wellness.clone();
                if !wellness::reduce(&mut self.state.wellness, action) {
                    return false;
                }
                let value = wellness::field_json(&self.state.wellness, &action);
                let result = storage::save_json(&self.storage, action.storage_key(), &value);
                self.commit(action.storage_key(), result, |state| state.wellness = prior)
            }
            Action::Ui(action) => self.state.ui.reduce(action),
            Action::Data(action) => {
                let persists = matches!(action, DataAction::SaveData { .. });
                let prior = self.state.data.clone();
                let changed = self.state.data.reduce(action);
                if !persists {
                    return changed;
                }
                let result = storage::save_json(&self.storage, keys::SNAPSHOTS, &self.state.data.snapshots);
                self.commit(keys::SNAPSHOTS, result, |state| state.data = prior) && changed
            }
            Action::Journal(action) => self.state.journal.reduce(action),
            Action::Blog(action) => {
                let persists = action.persists();
                let prior = self.state.blog.clone();
                if !self.state.blog.reduce(action) {
                    return false;
                }
                if !persists {
                    return true;
                }
                let result = storage::save_json(&self.storage, keys::BLOG_POSTS, &self.state.blog.posts);
                self.commit(keys::BLOG_POSTS, result, |state| state.blog = prior)
            }
        }
    }

    /// Keep the reduced state when `result` is Ok, otherwise roll it back
    fn commit(
        &mut self,
        key: &str,
        result: Result<(), StorageError>,
        rollback: impl FnOnce(&mut AppState),
    ) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to write {} to storage: {}", key, e);
                rollback(&mut self.state);
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Snapshot the current tasks, wellness and stats. None when the
    /// history could not be written.
    pub fn save_snapshot(&mut self) -> Option<&Snapshot> {
        let action = DataAction::SaveData {
            tasks: self.state.tasks.by_day.clone(),
            wellness: self.state.wellness.clone(),
            stats: self.state.tasks.stats(),
        };
        if !self.dispatch(action) {
            return None;
        }
        self.state.data.latest()
    }

    /// Replace the in-memory history with the stored one. Returns false and
    /// leaves the history alone when the key is absent or unreadable.
    pub fn load_snapshots(&mut self) -> bool {
        match storage::load_json::<_, Vec<Snapshot>>(&self.storage, keys::SNAPSHOTS) {
            Ok(Some(snapshots)) => self.dispatch(DataAction::LoadSnapshots(snapshots)),
            Ok(None) => {
                log::debug!("No saved snapshots found");
                false
            }
            Err(e) => {
                log::error!("Error loading saved snapshots: {}", e);
                false
            }
        }
    }

    /// Copy a media file into the blob store
    pub fn import_media(&self, path: &Path, kind: BlogPostType) -> Result<MediaRef, MediaError> {
        let mime = mime_for_path(path)
            .ok_or_else(|| MediaError::UnsupportedType(path.display().to_string()))?;
        let expected = match kind {
            BlogPostType::Image => "image/",
            BlogPostType::Music => "audio/",
            BlogPostType::Text => {
                return Err(MediaError::WrongKind { expected: "image or music", actual: mime.to_string() });
            }
        };
        if !mime.starts_with(expected) {
            return Err(MediaError::WrongKind { expected: kind.label(), actual: mime.to_string() });
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let media = self.storage.put_blob(&file_name, mime, &bytes)?;
        log::info!("Stored media {} ({} bytes) as {}", file_name, media.size, media.id);
        Ok(media)
    }

    /// Import `path` and post it to the image or music bucket, picked by file type
    pub fn attach_media(&mut self, path: &Path) -> Result<MediaRef, MediaError> {
        let kind = media_kind_for_path(path)
            .ok_or_else(|| MediaError::UnsupportedType(path.display().to_string()))?;
        let media = self.import_media(path, kind)?;
        let action = match kind {
            BlogPostType::Music => BlogAction::AddMusicPost(media.clone()),
            _ => BlogAction::AddImagePost(media.clone()),
        };
        if !self.dispatch(action) {
            if let Some(e) = self.last_error.take() {
                return Err(MediaError::Storage(e));
            }
        }
        Ok(media)
    }

    /// Set any of the wellness fields in one go
    pub fn update_wellness(
        &mut self,
        mood: Option<Mood>,
        sleep: Option<i64>,
        steps: Option<i64>,
        water: Option<i64>,
    ) {
        if let Some(mood) = mood {
            self.dispatch(WellnessAction::SetMood(Some(mood)));
        }
        if let Some(hours) = sleep {
            self.dispatch(WellnessAction::SetSleepHours(hours));
        }
        if let Some(steps) = steps {
            self.dispatch(WellnessAction::SetSteps(steps));
        }
        if let Some(cups) = water {
            self.dispatch(WellnessAction::SetWaterCups(cups));
        }
    }
}

fn load_wellness<S: KeyValueStore>(storage: &S) -> WellnessRecord {
    let mood: String = storage::load_json_or(storage, keys::MOOD, String::new());
    let mood = if mood.is_empty() {
        None
    } else {
        match mood.parse::<Mood>() {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("Ignoring stored mood: {}", e);
                None
            }
        }
    };

    // Stored numbers may be out of range if written by hand; clamp on the way in
    let mut record = WellnessRecord { mood, ..WellnessRecord::default() };
    wellness::reduce(&mut record, WellnessAction::SetSleepHours(load_number(storage, keys::SLEEP)));
    wellness::reduce(&mut record, WellnessAction::SetSteps(load_number(storage, keys::STEPS)));
    wellness::reduce(&mut record, WellnessAction::SetWaterCups(load_number(storage, keys::WATER)));
    record
}

/// Numbers were historically stored either as JSON numbers or as strings
fn load_number<S: KeyValueStore>(storage: &S, key: &str) -> i64 {
    let value = storage::load_json_or(storage, key, serde_json::Value::Null);
    lenient_number::parse(&value).unwrap_or_else(|e| {
        log::warn!("Ignoring value under {}: {}", key, e);
        0
    })
}

/// MIME type from the file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        _ => return None,
    };
    Some(mime)
}

pub fn media_kind_for_path(path: &Path) -> Option<BlogPostType> {
    let mime = mime_for_path(path)?;
    if mime.starts_with("image/") {
        Some(BlogPostType::Image)
    } else {
        Some(BlogPostType::Music)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaRef, Weekday};
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    /// Memory store whose writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing.get() {
                return Err(StorageError::DirectoryError(format!("disk full writing {}", key)));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    impl BlobStore for FlakyStore {
        fn put_blob(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<MediaRef, StorageError> {
            self.inner.put_blob(file_name, mime_type, bytes)
        }

        fn get_blob(&self, id: &str) -> Result<Vec<u8>, StorageError> {
            self.inner.get_blob(id)
        }
    }

    #[test]
    fn task_actions_write_the_day_map() {
        let mut store = Store::open(MemoryStore::new());
        store.dispatch(TaskAction::AddTask { day: Weekday::Monday, text: "run".into() });
        let stored: TasksByDay = storage::load_json(store.storage(), keys::TASKS).unwrap().unwrap();
        assert_eq!(stored[&Weekday::Monday][0].text, "run");
    }

    #[test]
    fn noop_actions_do_not_write() {
        let mut store = Store::open(MemoryStore::new());
        store.dispatch(TaskAction::AddTask { day: Weekday::Monday, text: "  ".into() });
        store.dispatch(TaskAction::SetActiveDay(Weekday::Friday));
        assert_eq!(store.storage().get(keys::TASKS).unwrap(), None);
    }

    #[test]
    fn wellness_fields_use_separate_keys() {
        let mut store = Store::open(MemoryStore::new());
        store.update_wellness(Some(Mood::Happy), Some(7), Some(8000), Some(5));
        let s = store.storage();
        assert_eq!(s.get(keys::MOOD).unwrap().as_deref(), Some("\"Happy\""));
        assert_eq!(s.get(keys::SLEEP).unwrap().as_deref(), Some("7"));
        assert_eq!(s.get(keys::STEPS).unwrap().as_deref(), Some("8000"));
        assert_eq!(s.get(keys::WATER).unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn legacy_string_numbers_are_accepted() {
        let storage = MemoryStore::new();
        storage.set(keys::STEPS, "\"4200\"").unwrap();
        storage.set(keys::SLEEP, "\"\"").unwrap();
        let store = Store::open(storage);
        assert_eq!(store.state().wellness.steps, 4200);
        assert_eq!(store.state().wellness.sleep_hours, 0);
    }

    #[test]
    fn load_snapshots_without_key_is_noop() {
        let mut store = Store::open(MemoryStore::new());
        assert!(!store.load_snapshots());
        assert!(store.state().data.snapshots.is_empty());
    }

    #[test]
    fn corrupt_snapshots_leave_history_alone() {
        let mut store = Store::open(MemoryStore::new());
        store.save_snapshot();
        store.storage().set(keys::SNAPSHOTS, "[{oops").unwrap();
        assert!(!store.load_snapshots());
        assert_eq!(store.state().data.snapshots.len(), 1);
    }

    #[test]
    fn failed_writes_leave_state_untouched() {
        let mut store = Store::open(FlakyStore::default());
        store.dispatch(TaskAction::AddTask { day: Weekday::Monday, text: "stretch".into() });
        store.dispatch(WellnessAction::SetSleepHours(6));
        store.save_snapshot();
        let before = store.state().clone();

        store.storage().failing.set(true);
        assert!(!store.dispatch(TaskAction::AddTask { day: Weekday::Monday, text: "run".into() }));
        assert!(store.take_error().is_some());
        assert!(!store.dispatch(WellnessAction::SetSleepHours(7)));
        assert!(store.save_snapshot().is_none());
        store.dispatch(BlogAction::SetDraftContent("hi".into()));
        assert!(!store.dispatch(BlogAction::AddTextPost));

        let after = store.state();
        assert_eq!(after.tasks, before.tasks);
        assert_eq!(after.wellness, before.wellness);
        assert_eq!(after.data, before.data);
        assert!(after.blog.posts.is_empty());
        assert!(store.take_error().is_some());
    }

    #[test]
    fn write_failure_does_not_block_later_writes() {
        let mut store = Store::open(FlakyStore::default());
        store.storage().failing.set(true);
        store.dispatch(TaskAction::AddTask { day: Weekday::Friday, text: "swim".into() });
        store.storage().failing.set(false);
        assert!(store.dispatch(TaskAction::AddTask { day: Weekday::Friday, text: "swim".into() }));
        assert_eq!(store.state().tasks.tasks_for(Weekday::Friday).len(), 1);
        let stored: TasksByDay = storage::load_json(store.storage(), keys::TASKS).unwrap().unwrap();
        assert_eq!(stored[&Weekday::Friday].len(), 1);
    }

    #[test]
    fn snapshots_with_text_numbers_load_and_are_kept() {
        let storage = MemoryStore::new();
        let legacy = r#"[{"id":"2024-03-01T09:00:00.000Z","timestamp":"2024-03-01T09:00:00.000Z",
            "tasks":{"Monday":[],"Tuesday":[],"Wednesday":[],"Thursday":[],"Friday":[],"Saturday":[],"Sunday":[]},
            "wellness":{"mood":"Happy","sleepHours":8,"steps":"8000","waterCups":""},
            "stats":{"completedTasksCount":0,"totalTasksCount":0,"completionRate":0}}]"#;
        storage.set(keys::SNAPSHOTS, legacy).unwrap();
        let mut store = Store::open(storage);

        assert!(store.load_snapshots());
        let loaded = &store.state().data.snapshots[0];
        assert_eq!(loaded.wellness.steps, 8000);
        assert_eq!(loaded.wellness.water_cups, 0);

        store.save_snapshot();
        let stored: Vec<Snapshot> = storage::load_json(store.storage(), keys::SNAPSHOTS).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].timestamp, "2024-03-01T09:00:00.000Z");
    }

    #[test]
    fn journal_is_never_persisted() {
        let mut store = Store::open(MemoryStore::new());
        store.dispatch(JournalAction::SetDraftCaption("hello".into()));
        assert!(store.dispatch(JournalAction::AddPost));
        assert_eq!(store.state().journal.posts.len(), 2);
        let reopened = Store::open(store.into_storage());
        assert_eq!(reopened.state().journal.posts.len(), 1);
    }

    #[test]
    fn mime_detection() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(media_kind_for_path(Path::new("song.mp3")), Some(BlogPostType::Music));
        assert_eq!(media_kind_for_path(Path::new("notes.txt")), None);
    }
}
