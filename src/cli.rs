use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Mood, Weekday};
use crate::storage::{BlobStore, KeyValueStore, StorageError};
use crate::store::{wellness, BlogAction, MediaError, Store, TaskAction};
use crate::tips::{quote_for_day, quotes_or_fallback, FallbackQuotes};

#[derive(Parser)]
#[command(name = "lifelog")]
#[command(about = "LifeLog - daily tracker, journal and blog in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Add a task to a day's list
    AddTask {
        /// Task text
        text: String,
        /// Day of the week (defaults to today)
        #[arg(long)]
        day: Option<Weekday>,
    },
    /// Flip a task between done and not done
    ToggleTask {
        /// Task id
        id: String,
        /// Day of the week (searched across the week if omitted)
        #[arg(long)]
        day: Option<Weekday>,
    },
    /// Remove a task
    DeleteTask {
        /// Task id
        id: String,
        /// Day of the week (searched across the week if omitted)
        #[arg(long)]
        day: Option<Weekday>,
    },
    /// List tasks for a day
    Tasks {
        /// Day of the week (defaults to today)
        #[arg(long)]
        day: Option<Weekday>,
    },
    /// Set wellness values and print today's record
    Wellness {
        #[arg(long)]
        mood: Option<Mood>,
        /// Hours of sleep (0-10)
        #[arg(long, allow_negative_numbers = true)]
        sleep: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        steps: Option<i64>,
        /// Cups of water (0-8)
        #[arg(long, allow_negative_numbers = true)]
        water: Option<i64>,
    },
    /// Show task completion and wellness ratings
    Stats,
    /// Save a snapshot of tasks and wellness
    Save,
    /// List saved snapshots, newest first
    Snapshots,
    /// Print a saved snapshot as JSON
    Export {
        /// Position in the snapshot list (0 is the newest)
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Publish a text post to the blog
    Post {
        /// Post body (markdown)
        text: String,
        #[arg(long)]
        private: bool,
    },
    /// Publish an image or music file to the blog
    Attach {
        path: PathBuf,
        #[arg(long)]
        private: bool,
    },
    /// List blog posts, newest first
    Blog,
    /// Copy an attached image or music file back out of storage
    Media {
        /// Media id, as printed by `attach`
        id: String,
        /// Destination file (defaults to the original file name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Nothing to add: {0}")]
    EmptyInput(&'static str),
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No snapshot at index {index} ({count} saved)")]
    SnapshotNotFound { index: usize, count: usize },
}

/// Run one non-TUI command against `store`, writing human output to `out`
pub fn run_command<S, W>(command: Commands, store: &mut Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    match command {
        Commands::Tui => Ok(()),
        Commands::AddTask { text, day } => handle_add_task(store, text, day, out),
        Commands::ToggleTask { id, day } => handle_toggle_task(store, id, day, out),
        Commands::DeleteTask { id, day } => handle_delete_task(store, id, day, out),
        Commands::Tasks { day } => handle_list_tasks(store, day, out),
        Commands::Wellness { mood, sleep, steps, water } => {
            store.update_wellness(mood, sleep, steps, water);
            check_storage(store)?;
            print_wellness(store, out)
        }
        Commands::Stats => handle_stats(store, out),
        Commands::Save => handle_save(store, out),
        Commands::Snapshots => handle_snapshots(store, out),
        Commands::Export { index } => handle_export(store, index, out),
        Commands::Post { text, private } => handle_post(store, text, private, out),
        Commands::Attach { path, private } => handle_attach(store, path, private, out),
        Commands::Blog => handle_blog(store, out),
        Commands::Media { id, out: path } => handle_media(store, id, path, out),
    }
}

fn check_storage<S: KeyValueStore + BlobStore>(store: &mut Store<S>) -> Result<(), CliError> {
    match store.take_error() {
        Some(e) => Err(CliError::Storage(e)),
        None => Ok(()),
    }
}

/// The day holding task `id`, preferring `day` when given
fn find_task_day<S: KeyValueStore + BlobStore>(store: &Store<S>, id: &str, day: Option<Weekday>) -> Option<Weekday> {
    let tasks = &store.state().tasks;
    let has = |d: Weekday| tasks.tasks_for(d).iter().any(|t| t.id == id);
    match day {
        Some(d) => has(d).then_some(d),
        None => Weekday::ALL.into_iter().find(|d| has(*d)),
    }
}

pub fn handle_add_task<S, W>(store: &mut Store<S>, text: String, day: Option<Weekday>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let day = day.unwrap_or_else(Weekday::today);
    let added = store.dispatch(TaskAction::AddTask { day, text });
    check_storage(store)?;
    if !added {
        return Err(CliError::EmptyInput("task text is blank"));
    }
    if let Some(task) = store.state().tasks.tasks_for(day).last() {
        writeln!(out, "Task added to {} (ID: {})", day, task.id)?;
    }
    Ok(())
}

pub fn handle_toggle_task<S, W>(store: &mut Store<S>, id: String, day: Option<Weekday>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let day = find_task_day(store, &id, day).ok_or_else(|| CliError::TaskNotFound(id.clone()))?;
    store.dispatch(TaskAction::ToggleTask { day, id: id.clone() });
    check_storage(store)?;
    let done = store
        .state()
        .tasks
        .tasks_for(day)
        .iter()
        .any(|t| t.id == id && t.completed);
    writeln!(out, "Task {} marked {}", id, if done { "done" } else { "not done" })?;
    Ok(())
}

pub fn handle_delete_task<S, W>(store: &mut Store<S>, id: String, day: Option<Weekday>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let day = find_task_day(store, &id, day).ok_or_else(|| CliError::TaskNotFound(id.clone()))?;
    store.dispatch(TaskAction::DeleteTask { day, id: id.clone() });
    check_storage(store)?;
    writeln!(out, "Task {} deleted from {}", id, day)?;
    Ok(())
}

pub fn handle_list_tasks<S, W>(store: &Store<S>, day: Option<Weekday>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let day = day.unwrap_or_else(Weekday::today);
    let tasks = store.state().tasks.tasks_for(day);
    writeln!(out, "{} ({} tasks)", day, tasks.len())?;
    for task in tasks {
        let mark = if task.completed { "✓" } else { "○" };
        writeln!(out, "  {} {}  [{}]", mark, task.text, task.id)?;
    }
    Ok(())
}

fn print_wellness<S, W>(store: &Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let record = &store.state().wellness;
    let mood = record
        .mood
        .map(|m| format!("{} {}", m.emoji(), m.name()))
        .unwrap_or_else(|| "not set".to_string());
    writeln!(out, "Mood:  {}", mood)?;
    for metric in wellness::metrics(record) {
        writeln!(out, "{:<6} {} ({})", format!("{}:", metric.label), metric.value, metric.rating.label())?;
    }
    Ok(())
}

pub fn handle_stats<S, W>(store: &Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let stats = store.state().tasks.stats();
    writeln!(
        out,
        "Tasks: {}/{} completed ({}%)",
        stats.completed_tasks_count, stats.total_tasks_count, stats.completion_rate
    )?;
    print_wellness(store, out)?;

    let quotes = quotes_or_fallback(&FallbackQuotes);
    if let Some(quote) = quote_for_day(&quotes, chrono::Local::now().date_naive()) {
        writeln!(out, "\n\"{}\" - {}", quote.text, quote.author)?;
    }
    Ok(())
}

pub fn handle_save<S, W>(store: &mut Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    // Keep the stored history when appending from a fresh process
    store.load_snapshots();
    let id = store.save_snapshot().map(|s| s.id.clone());
    check_storage(store)?;
    if let Some(id) = id {
        writeln!(out, "Snapshot saved ({})", id)?;
    }
    Ok(())
}

pub fn handle_snapshots<S, W>(store: &mut Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    store.load_snapshots();
    let snapshots = &store.state().data.snapshots;
    if snapshots.is_empty() {
        writeln!(out, "No snapshots saved")?;
    }
    for (i, snapshot) in snapshots.iter().enumerate() {
        writeln!(
            out,
            "{:>2}  {}  tasks {}/{}  mood {}",
            i,
            snapshot.timestamp,
            snapshot.stats.completed_tasks_count,
            snapshot.stats.total_tasks_count,
            snapshot.wellness.mood.map(Mood::name).unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn handle_export<S, W>(store: &mut Store<S>, index: usize, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    store.load_snapshots();
    let snapshots = &store.state().data.snapshots;
    let snapshot = snapshots.get(index).ok_or(CliError::SnapshotNotFound {
        index,
        count: snapshots.len(),
    })?;
    writeln!(out, "{}", serde_json::to_string_pretty(snapshot)?)?;
    Ok(())
}

fn set_private<S: KeyValueStore + BlobStore>(store: &mut Store<S>, private: bool) {
    if store.state().blog.ui.is_private != private {
        store.dispatch(BlogAction::TogglePrivate);
    }
}

pub fn handle_post<S, W>(store: &mut Store<S>, text: String, private: bool, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    set_private(store, private);
    store.dispatch(BlogAction::SetDraftContent(text));
    let posted = store.dispatch(BlogAction::AddTextPost);
    check_storage(store)?;
    if !posted {
        return Err(CliError::EmptyInput("post text is blank"));
    }
    writeln!(out, "Text post published{}", if private { " (private)" } else { "" })?;
    Ok(())
}

pub fn handle_attach<S, W>(store: &mut Store<S>, path: PathBuf, private: bool, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    set_private(store, private);
    let media = store.attach_media(&path)?;
    check_storage(store)?;
    writeln!(out, "Attached {} ({}, {} bytes, ID: {})", media.file_name, media.mime_type, media.size, media.id)?;
    Ok(())
}

pub fn handle_blog<S, W>(store: &Store<S>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let posts = store.state().blog.all_posts();
    if posts.is_empty() {
        writeln!(out, "No blog posts yet")?;
    }
    for post in posts {
        let lock = if post.is_private() { " 🔒" } else { "" };
        writeln!(out, "[{}] {}  {}{}", post.kind().label(), post.timestamp(), post.summary(), lock)?;
    }
    Ok(())
}

pub fn handle_media<S, W>(store: &Store<S>, id: String, path: Option<PathBuf>, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + BlobStore,
    W: Write,
{
    let bytes = store.storage().get_blob(&id)?;
    let path = path.unwrap_or_else(|| {
        let posts = &store.state().blog.posts;
        let name = posts
            .image
            .iter()
            .map(|p| &p.image)
            .chain(posts.music.iter().map(|p| &p.music))
            .find(|m| m.id == id)
            .map(|m| m.file_name.clone());
        PathBuf::from(name.unwrap_or_else(|| id.clone()))
    });
    std::fs::write(&path, &bytes).map_err(|source| CliError::WriteFile { path: path.clone(), source })?;
    writeln!(out, "Wrote {} bytes to {}", bytes.len(), path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn run(store: &mut Store<MemoryStore>, command: Commands) -> Result<String, CliError> {
        let mut out = Vec::new();
        run_command(command, store, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn cli_parses_global_flags_and_subcommand() {
        let cli = Cli::try_parse_from(["lifelog", "--ephemeral", "add-task", "stretch", "--day", "fri"]).unwrap();
        assert!(cli.ephemeral);
        match cli.command {
            Some(Commands::AddTask { text, day }) => {
                assert_eq!(text, "stretch");
                assert_eq!(day, Some(Weekday::Friday));
            }
            _ => panic!("expected add-task"),
        }
    }

    #[test]
    fn wellness_accepts_mood_names() {
        let cli = Cli::try_parse_from(["lifelog", "wellness", "--mood", "sleepy", "--sleep", "12"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Wellness { mood: Some(Mood::Sleepy), sleep: Some(12), .. })
        ));
    }

    #[test]
    fn add_then_toggle_without_day() {
        let mut store = Store::open(MemoryStore::new());
        run(&mut store, Commands::AddTask { text: "read".into(), day: Some(Weekday::Tuesday) }).unwrap();
        let id = store.state().tasks.tasks_for(Weekday::Tuesday)[0].id.clone();

        let output = run(&mut store, Commands::ToggleTask { id: id.clone(), day: None }).unwrap();
        assert!(output.contains("marked done"));
        assert!(store.state().tasks.tasks_for(Weekday::Tuesday)[0].completed);
    }

    #[test]
    fn unknown_task_is_an_error() {
        let mut store = Store::open(MemoryStore::new());
        let err = run(&mut store, Commands::DeleteTask { id: "missing".into(), day: None }).unwrap_err();
        assert!(matches!(err, CliError::TaskNotFound(_)));
    }

    #[test]
    fn blank_inputs_are_rejected() {
        let mut store = Store::open(MemoryStore::new());
        assert!(matches!(
            run(&mut store, Commands::AddTask { text: "   ".into(), day: None }),
            Err(CliError::EmptyInput(_))
        ));
        assert!(matches!(
            run(&mut store, Commands::Post { text: "".into(), private: false }),
            Err(CliError::EmptyInput(_))
        ));
    }

    #[test]
    fn wellness_values_are_clamped_in_output() {
        let mut store = Store::open(MemoryStore::new());
        let output = run(
            &mut store,
            Commands::Wellness { mood: Some(Mood::Happy), sleep: Some(14), steps: Some(-5), water: Some(3) },
        )
        .unwrap();
        assert!(output.contains("10 hours"));
        assert!(output.contains("0 steps"));
        assert!(output.contains("3 cups (Low)"));
    }

    #[test]
    fn save_then_export_newest() {
        let mut store = Store::open(MemoryStore::new());
        store.update_wellness(None, Some(7), None, None);
        run(&mut store, Commands::Save).unwrap();
        let json = run(&mut store, Commands::Export { index: 0 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["wellness"]["sleepHours"], 7);

        assert!(matches!(
            run(&mut store, Commands::Export { index: 3 }),
            Err(CliError::SnapshotNotFound { index: 3, count: 1 })
        ));
    }

    #[test]
    fn private_post_is_marked() {
        let mut store = Store::open(MemoryStore::new());
        run(&mut store, Commands::Post { text: "secret".into(), private: true }).unwrap();
        let listing = run(&mut store, Commands::Blog).unwrap();
        assert!(listing.contains("secret"));
        assert!(listing.contains("🔒"));
    }

    #[test]
    fn attached_media_can_be_copied_back_out() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sunset.png");
        std::fs::write(&source, b"not really a png").unwrap();

        let mut store = Store::open(MemoryStore::new());
        run(&mut store, Commands::Attach { path: source, private: false }).unwrap();
        let id = store.state().blog.posts.image[0].image.id.clone();

        let target = dir.path().join("copy.png");
        let output = run(&mut store, Commands::Media { id, out: Some(target.clone()) }).unwrap();
        assert!(output.contains("16 bytes"));
        assert_eq!(std::fs::read(&target).unwrap(), b"not really a png");
    }

    #[test]
    fn unknown_media_id_is_an_error() {
        let mut store = Store::open(MemoryStore::new());
        let err = run(&mut store, Commands::Media { id: "nope".into(), out: None }).unwrap_err();
        assert!(matches!(err, CliError::Storage(StorageError::BlobNotFound(_))));
    }
}
