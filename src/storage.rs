use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::MediaRef;

/// Storage keys, kept stable so existing data keeps loading
pub mod keys {
    pub const TASKS: &str = "dailyTrackerTasks";
    pub const MOOD: &str = "dailyTrackerMood";
    pub const SLEEP: &str = "dailyTrackerSleep";
    pub const STEPS: &str = "dailyTrackerSteps";
    pub const WATER: &str = "dailyTrackerWater";
    pub const SNAPSHOTS: &str = "dailyTracker_savedSnapshots";
    pub const BLOG_POSTS: &str = "lifelogBlogPosts";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
    #[error("Malformed JSON under '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Blob not found: {0}")]
    BlobNotFound(String),
}

/// Synchronous string key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Content-addressed storage for uploaded media
pub trait BlobStore {
    /// Store `bytes` and return a reference whose id is derived from the content.
    /// Storing identical bytes again returns the same id.
    fn put_blob(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<MediaRef, StorageError>;
    fn get_blob(&self, id: &str) -> Result<Vec<u8>, StorageError>;
}

/// Namespace for media ids; ids are UUID v5 over the raw bytes
const MEDIA_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x6c69_6665_6c6f_6700_8000_6d65_6469_6100);

pub fn media_id(bytes: &[u8]) -> String {
    uuid::Uuid::new_v5(&MEDIA_NAMESPACE, bytes).to_string()
}

/// Serialize `value` and write it under `key`
pub fn save_json<S: KeyValueStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Read and parse the value under `key`. `Ok(None)` when the key is absent.
pub fn load_json<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Like [`load_json`], but any failure is logged and replaced by `default`
pub fn load_json_or<S: KeyValueStore + ?Sized, T: DeserializeOwned>(store: &S, key: &str, default: T) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            log::warn!("Error loading {} from storage: {}", key, e);
            default
        }
    }
}

/// SQLite-backed store: one `kv` table for JSON values, one `media` table for blobs
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and initialize the schema
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = SqliteStore { conn };
        store.initialize_schema()?;
        log::debug!("Opened storage at {}", db_path.display());

        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS media (
                id          TEXT PRIMARY KEY,
                file_name   TEXT NOT NULL,
                mime_type   TEXT NOT NULL,
                size        INTEGER NOT NULL,
                data        BLOB NOT NULL,
                created_at  TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, crate::models::now_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

impl BlobStore for SqliteStore {
    fn put_blob(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<MediaRef, StorageError> {
        let media = MediaRef {
            id: media_id(bytes),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
        };
        self.conn.execute(
            "INSERT OR IGNORE INTO media (id, file_name, mime_type, size, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                media.id,
                media.file_name,
                media.mime_type,
                media.size as i64,
                bytes,
                crate::models::now_rfc3339()
            ],
        )?;
        Ok(media)
    }

    fn get_blob(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        self.conn
            .query_row("SELECT data FROM media WHERE id = ?1", [id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StorageError::BlobNotFound(id.to_string()))
    }
}

/// Process-local store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

impl BlobStore for MemoryStore {
    fn put_blob(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<MediaRef, StorageError> {
        let id = media_id(bytes);
        self.blobs
            .borrow_mut()
            .entry(id.clone())
            .or_insert_with(|| bytes.to_vec());
        Ok(MediaRef {
            id,
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
        })
    }

    fn get_blob(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::BlobNotFound(id.to_string()))
    }
}

/// Either backend behind one type, so callers can pick at runtime
pub enum Backend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl KeyValueStore for Backend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Backend::Sqlite(s) => s.get(key),
            Backend::Memory(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Backend::Sqlite(s) => s.set(key, value),
            Backend::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Backend::Sqlite(s) => s.remove(key),
            Backend::Memory(s) => s.remove(key),
        }
    }
}

impl BlobStore for Backend {
    fn put_blob(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<MediaRef, StorageError> {
        match self {
            Backend::Sqlite(s) => s.put_blob(file_name, mime_type, bytes),
            Backend::Memory(s) => s.put_blob(file_name, mime_type, bytes),
        }
    }

    fn get_blob(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Backend::Sqlite(s) => s.get_blob(id),
            Backend::Memory(s) => s.get_blob(id),
        }
    }
}
