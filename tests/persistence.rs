use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

use lifelog::models::{BlogPostType, Mood, Weekday, WellnessRecord};
use lifelog::storage::{keys, BlobStore, KeyValueStore};
use lifelog::store::{BlogAction, TaskAction, MAX_SNAPSHOTS};
use lifelog::{SqliteStore, Store};

fn open(dir: &Path) -> Store<SqliteStore> {
    let path = dir.join("lifelog.db");
    Store::open(SqliteStore::new(path.to_str().unwrap()).unwrap())
}

#[test]
fn wellness_snapshot_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(dir.path());
        store.update_wellness(Some(Mood::Happy), Some(7), Some(8000), Some(5));
        assert!(store.save_snapshot().is_some());
        assert!(store.take_error().is_none());
    }

    let mut store = open(dir.path());
    let expected = WellnessRecord {
        mood: Some(Mood::Happy),
        sleep_hours: 7,
        steps: 8000,
        water_cups: 5,
    };
    assert_eq!(store.state().wellness, expected);

    assert!(store.load_snapshots());
    let snapshots = &store.state().data.snapshots;
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].wellness, expected);
}

#[test]
fn tasks_are_rehydrated_on_open() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(dir.path());
        store.dispatch(TaskAction::AddTask { day: Weekday::Friday, text: "Yoga".to_string() });
        store.dispatch(TaskAction::AddTask { day: Weekday::Friday, text: "Groceries".to_string() });
        let id = store.state().tasks.tasks_for(Weekday::Friday)[0].id.clone();
        store.dispatch(TaskAction::ToggleTask { day: Weekday::Friday, id });
    }

    let store = open(dir.path());
    let friday = store.state().tasks.tasks_for(Weekday::Friday);
    let texts: Vec<(&str, bool)> = friday.iter().map(|t| (t.text.as_str(), t.completed)).collect();
    assert_eq!(texts, vec![("Yoga", true), ("Groceries", false)]);
    assert!(store.state().tasks.tasks_for(Weekday::Monday).is_empty());
}

#[test]
fn history_keeps_the_newest_ten() {
    let dir = TempDir::new().unwrap();
    let mut store = open(dir.path());

    let mut ids = Vec::new();
    for steps in 0..11 {
        store.update_wellness(None, None, Some(steps * 100), None);
        ids.push(store.save_snapshot().unwrap().id.clone());
    }

    let mut store = open(dir.path());
    store.load_snapshots();
    let kept: Vec<String> = store.state().data.snapshots.iter().map(|s| s.id.clone()).collect();
    assert_eq!(kept.len(), MAX_SNAPSHOTS);
    assert!(!kept.contains(&ids[0]));
    assert_eq!(kept[0], ids[10]);
    assert_eq!(store.state().data.snapshots[0].wellness.steps, 1000);
}

#[test]
fn corrupt_values_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(dir.path()).into_storage();
        store.set(keys::TASKS, "{oops").unwrap();
        store.set(keys::SLEEP, "not a number").unwrap();
        store.set(keys::SNAPSHOTS, "[{]").unwrap();
    }

    let mut store = open(dir.path());
    assert!(store.state().tasks.by_day.values().all(Vec::is_empty));
    assert_eq!(store.state().wellness.sleep_hours, 0);
    assert!(!store.load_snapshots());
    assert!(store.state().data.snapshots.is_empty());
}

#[test]
fn media_is_deduplicated_and_persisted() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("sunset.png");
    std::fs::write(&image, b"not really a png").unwrap();

    let first = {
        let mut store = open(dir.path());
        let a = store.import_media(&image, BlogPostType::Image).unwrap();
        let b = store.import_media(&image, BlogPostType::Image).unwrap();
        assert_eq!(a.id, b.id);
        store.dispatch(BlogAction::AddImagePost(a.clone()));
        a
    };

    let store = open(dir.path());
    assert_eq!(store.state().blog.posts.image.len(), 1);
    assert_eq!(store.state().blog.posts.image[0].image, first);
    assert_eq!(store.storage().get_blob(&first.id).unwrap(), b"not really a png".to_vec());
}

#[test]
fn music_cannot_be_posted_as_an_image() {
    let dir = TempDir::new().unwrap();
    let track = dir.path().join("song.mp3");
    std::fs::write(&track, b"ID3").unwrap();

    let store = open(dir.path());
    assert!(store.import_media(&track, BlogPostType::Image).is_err());
    assert!(store.import_media(&track, BlogPostType::Music).is_ok());
}
