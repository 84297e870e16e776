//! String key-value persistence for settings, preferences and the transcript.

use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod keys {
    pub const BASE_URL: &str = "baseUrl";
    pub const API_KEY: &str = "apiKey";
    pub const SYSTEM_PROMPT: &str = "systemPrompt";
    pub const MODEL: &str = "model";
    pub const HISTORY_IMAGES: &str = "historyImages";
    pub const CHAT: &str = "chat";
    pub const LANG: &str = "lang";
    pub const THEME: &str = "theme";
    pub const SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";
}

/// Errors that can occur when reading or writing the state file.
#[derive(Debug)]
pub enum StoreError {
    /// Failed to read the state file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The state file is not a flat TOML table of strings.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A value could not be encoded for storage.
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    /// Failed to write the state file.
    Write {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, source } => {
                write!(f, "Failed to read state at {}: {}", path_display(path), source)
            }
            StoreError::Parse { path, source } => {
                write!(f, "Failed to parse state at {}: {}", path_display(path), source)
            }
            StoreError::Encode { key, source } => {
                write!(f, "Failed to encode {key} for storage: {source}")
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to write state at {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::Parse { source, .. } => Some(source),
            StoreError::Encode { source, .. } => Some(source),
            StoreError::Write { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Minimal string storage. Every `set`/`remove` is durable once it returns.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A TOML file holding one string per key, rewritten atomically on each change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&contents).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn default_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "alokahub", "alokahub")?;
        Some(proj_dirs.data_dir().join("state.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.write_atomically().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn write_atomically(&self) -> Result<(), Box<dyn StdError + Send + Sync>> {
        let parent = self.path.parent().filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string(&self.values)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file.persist(&self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Display a path with the home directory shortened to `~` on Unix.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            if let Ok(relative) = path.strip_prefix(PathBuf::from(home)) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
