use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const DATABASE_FILE: &str = "lifelog.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default)]
    pub color_overrides: Option<Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
    #[serde(default = "default_tab_3")]
    pub tab_3: String,
    #[serde(default = "default_tab_4")]
    pub tab_4: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_toggle_status")]
    pub toggle_status: String,
    #[serde(default = "default_save_snapshot")]
    pub save_snapshot: String,
    #[serde(default = "default_like")]
    pub like: String,
    #[serde(default = "default_comment")]
    pub comment: String,
    #[serde(default = "default_toggle_private")]
    pub toggle_private: String,
    #[serde(default = "default_export")]
    pub export: String,
    #[serde(default = "default_toggle_stats")]
    pub toggle_stats: String,
    #[serde(default = "default_prev_day")]
    pub prev_day: String,
    #[serde(default = "default_next_day")]
    pub next_day: String,
    #[serde(default = "default_cycle_mood")]
    pub cycle_mood: String,
    #[serde(default = "default_edit_wellness")]
    pub edit_wellness: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut themes = HashMap::new();

        // Shipped as an example of a user-defined theme
        themes.insert(
            "sunrise".to_string(),
            Theme {
                fg: "lightyellow".to_string(),
                bg: "black".to_string(),
                highlight_bg: "#FF8C42".to_string(),
                highlight_fg: String::new(),
                tab_bg: "darkgray".to_string(),
            },
        );

        Self {
            database_path: String::new(),
            log_level: default_log_level(),
            sidebar_width_percent: default_sidebar_width(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes,
            color_overrides: None,
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            toggle_sidebar: default_toggle_sidebar(),
            new: default_new(),
            delete: default_delete(),
            select: default_select(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
            tab_3: default_tab_3(),
            tab_4: default_tab_4(),
            help: default_help(),
            toggle_status: default_toggle_status(),
            save_snapshot: default_save_snapshot(),
            like: default_like(),
            comment: default_comment(),
            toggle_private: default_toggle_private(),
            export: default_export(),
            toggle_stats: default_toggle_stats(),
            prev_day: default_prev_day(),
            next_day: default_next_day(),
            cycle_mood: default_cycle_mood(),
            edit_wellness: default_edit_wellness(),
        }
    }
}

impl KeyBindings {
    /// Every binding as `(name, value)`
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("quit", &self.quit),
            ("toggle_sidebar", &self.toggle_sidebar),
            ("new", &self.new),
            ("delete", &self.delete),
            ("select", &self.select),
            ("list_up", &self.list_up),
            ("list_down", &self.list_down),
            ("tab_left", &self.tab_left),
            ("tab_right", &self.tab_right),
            ("tab_1", &self.tab_1),
            ("tab_2", &self.tab_2),
            ("tab_3", &self.tab_3),
            ("tab_4", &self.tab_4),
            ("help", &self.help),
            ("toggle_status", &self.toggle_status),
            ("save_snapshot", &self.save_snapshot),
            ("like", &self.like),
            ("comment", &self.comment),
            ("toggle_private", &self.toggle_private),
            ("export", &self.export),
            ("toggle_stats", &self.toggle_stats),
            ("prev_day", &self.prev_day),
            ("next_day", &self.next_day),
            ("cycle_mood", &self.cycle_mood),
            ("edit_wellness", &self.edit_wellness),
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
        }
    }
}

impl Theme {
    fn new(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str, tab_bg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            tab_bg: tab_bg.to_string(),
        }
    }

    /// Themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        HashMap::from([
            ("default".to_string(), Theme::new("white", "black", "blue", "white", "gray")),
            ("dark".to_string(), Theme::new("white", "black", "cyan", "black", "gray")),
            ("light".to_string(), Theme::new("black", "white", "blue", "white", "gray")),
            ("green".to_string(), Theme::new("green", "black", "yellow", "black", "gray")),
            ("monochrome".to_string(), Theme::new("white", "black", "white", "black", "gray")),
        ])
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sidebar_width() -> u16 {
    30
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_tab_3() -> String {
    "3".to_string()
}

fn default_tab_4() -> String {
    "4".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_toggle_status() -> String {
    "Space".to_string()
}

fn default_save_snapshot() -> String {
    "Ctrl+s".to_string()
}

fn default_like() -> String {
    "l".to_string()
}

fn default_comment() -> String {
    "c".to_string()
}

fn default_toggle_private() -> String {
    "p".to_string()
}

fn default_export() -> String {
    "e".to_string()
}

fn default_toggle_stats() -> String {
    "s".to_string()
}

fn default_prev_day() -> String {
    "[".to_string()
}

fn default_next_day() -> String {
    "]".to_string()
}

fn default_cycle_mood() -> String {
    "m".to_string()
}

fn default_edit_wellness() -> String {
    "w".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid key binding for {name}: {reason}")]
    KeyBinding { name: &'static str, reason: String },
}

impl Config {
    /// Load the profile's config file, creating it with defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load an explicit config file, creating it with defaults if missing.
    /// An empty `database_path` is resolved against `profile`.
    pub fn load_from_path(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(format!("{}: {}", config_path.display(), e)))?;
            toml::from_str::<Config>(&contents)?
        } else {
            let mut config = Config::default();
            config.save_to_path(config_path)?;
            config
        };

        if config.database_path.trim().is_empty() {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        config.validate_key_bindings()?;
        Ok(config)
    }

    /// Write the config as pretty TOML, creating parent directories
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        Ok(())
    }

    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            return data_dir.join(DATABASE_FILE).to_string_lossy().to_string();
        }
        match profile {
            utils::Profile::Dev => format!("~/.local/share/lifelog-dev/{}", DATABASE_FILE),
            utils::Profile::Prod => format!("~/.local/share/lifelog/{}", DATABASE_FILE),
        }
    }

    /// Database path with `~` expanded
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    pub fn validate_key_bindings(&self) -> Result<(), ConfigError> {
        for (name, value) in self.key_bindings.entries() {
            utils::parse_key_binding(value).map_err(|reason| ConfigError::KeyBinding { name, reason })?;
        }
        Ok(())
    }

    /// Overrides win, then user themes, then presets, then "default".
    /// An empty `highlight_fg` is derived from `highlight_bg`.
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = if let Some(ref overrides) = self.color_overrides {
            overrides.clone()
        } else if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else {
            let presets = Theme::get_preset_themes();
            presets
                .get(&self.current_theme)
                .or_else(|| presets.get("default"))
                .cloned()
                .unwrap_or_default()
        };

        if theme.highlight_fg.is_empty() {
            let calculated_fg = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }
}
