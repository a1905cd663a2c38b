//! Durable browser-style preferences: the theme and the one-time keyboard hint.
//!
//! Two keys are stored, both as plain strings:
//! - `theme`: `"dark"` or `"light"`, read once at startup and written on every toggle
//! - `keyboard-hint-shown`: `"true"` once the keyboard hint has been displayed
//!
//! Storage failures never stop the page; they are logged and the in-memory
//! value wins for the rest of the session.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PreferenceError;

pub const THEME_KEY: &str = "theme";
pub const KEYBOARD_HINT_KEY: &str = "keyboard-hint-shown";

/// Colour scheme of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but the two literals is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key-value storage that outlives the session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Store that forgets everything at exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object of strings on disk.
///
/// The whole file is rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, PreferenceError> {
        let values = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| PreferenceError::Malformed {
                path: path.display().to_string(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(PreferenceError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PreferenceError> {
        let write_err = |source| PreferenceError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // BTreeMap<String, String> always serializes
        let text = serde_json::to_string_pretty(&self.values).unwrap_or_default();
        std::fs::write(&self.path, text).map_err(write_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Typed access to the two preference keys.
pub struct Preferences {
    store: Box<dyn PreferenceStore>,
}

impl Preferences {
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// In-memory preferences, nothing persisted.
    pub fn ephemeral() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Stored theme, or light if unset or unrecognized.
    pub fn load_theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "ignoring unrecognized stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    pub fn save_theme(&mut self, theme: Theme) {
        if let Err(err) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!("failed to persist theme: {}", err);
        }
    }

    /// True the first time it is called for this store, false afterwards.
    pub fn take_keyboard_hint(&mut self) -> bool {
        if self.store.get(KEYBOARD_HINT_KEY).as_deref() == Some("true") {
            return false;
        }
        if let Err(err) = self.store.set(KEYBOARD_HINT_KEY, "true") {
            tracing::warn!("failed to persist keyboard hint flag: {}", err);
        }
        true
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::ephemeral()
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("theme", &self.load_theme())
            .finish()
    }
}
