pub mod config;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod tips;
pub mod utils;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use storage::{Backend, MemoryStore, SqliteStore};
pub use store::{Action, AppState, Store};
pub use utils::Profile;
