use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::ConfigError;

/// Default cooldown between two audible alerts
pub const DEFAULT_COOLDOWN_MS: f64 = 2000.0;

/// Volume passed to the native macOS player when none is configured
pub const DEFAULT_PLAYER_VOLUME: f64 = 1.0;

/// Volume baked into the Windows player script when none is configured
pub const DEFAULT_SCRIPT_VOLUME: f64 = 2.0;

/// User settings, stored as JSON with camelCase keys.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Master gate for all playback
    pub enabled: bool,

    /// Minimum interval between two plays, in milliseconds.
    ///
    /// Any JSON number is accepted; see [`Settings::cooldown`].
    pub cooldown_ms: f64,

    /// Playback volume; the default depends on the player, see [`Settings::volume_or`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    /// Play when the workspace error count grows
    pub trigger_on_diagnostics: bool,

    /// Play when a test task fails or terminal output looks like a failure
    pub trigger_on_test_failure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            volume: None,
            trigger_on_diagnostics: true,
            trigger_on_test_failure: true,
        }
    }
}

impl Settings {
    /// Configured volume, or the player-specific fallback
    pub fn volume_or(&self, fallback: f64) -> f64 {
        self.volume.unwrap_or(fallback)
    }

    /// Cooldown window. Negative or non-finite values mean no cooldown.
    pub fn cooldown(&self) -> Duration {
        if self.cooldown_ms.is_finite() && self.cooldown_ms > 0.0 {
            Duration::from_secs_f64(self.cooldown_ms / 1000.0)
        } else {
            Duration::ZERO
        }
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    }

    /// Write settings to a JSON file, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }
}

/// Live configuration as seen by the watchers and the playback invoker.
///
/// Implementations must return the current values on every call; callers
/// never cache settings across events.
pub trait ConfigStore: Send + Sync {
    /// Snapshot of the current settings
    fn settings(&self) -> Settings;

    /// Persist a new value for the master `enabled` flag
    fn set_enabled(&self, enabled: bool) -> Result<(), ConfigError>;
}

struct CachedSettings {
    modified: Option<SystemTime>,
    settings: Settings,
}

/// Config store backed by a JSON file that is re-read whenever it changes on disk
pub struct FileConfigStore {
    path: PathBuf,
    cache: RwLock<CachedSettings>,
}

impl FileConfigStore {
    /// Open the store at `path`. A missing file means defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            cache: RwLock::new(CachedSettings {
                modified: None,
                settings: Settings::default(),
            }),
        };
        store.refresh();
        store
    }

    /// Default location: `<config_dir>/fahhh/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("fahhh").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    /// Reload from disk if the file changed since the last read
    fn refresh(&self) {
        let modified = self.modified_time();
        if modified.is_some() && self.cache.read().modified == modified {
            return;
        }

        let mut cache = self.cache.write();
        match modified {
            None => {
                if cache.modified.is_some() {
                    tracing::info!("Config file {} removed, using defaults", self.path.display());
                }
                cache.settings = Settings::default();
            }
            Some(_) => match Settings::from_file(&self.path) {
                Ok(settings) => {
                    tracing::debug!("Loaded config from: {}", self.path.display());
                    cache.settings = settings;
                }
                Err(e) => {
                    // Keep the last good settings until the file is fixed
                    tracing::warn!("Ignoring unreadable config {}: {:#}", self.path.display(), anyhow::Error::new(e));
                }
            },
        }
        cache.modified = modified;
    }
}

impl ConfigStore for FileConfigStore {
    fn settings(&self) -> Settings {
        self.refresh();
        self.cache.read().settings.clone()
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        let mut settings = self.settings();
        settings.enabled = enabled;
        settings.save_to(&self.path)?;

        let mut cache = self.cache.write();
        cache.settings = settings;
        cache.modified = self.modified_time();

        tracing::info!("Saved config to: {}", self.path.display());
        Ok(())
    }
}

/// In-memory config store, used when no file should be touched
#[derive(Default)]
pub struct MemoryConfigStore {
    settings: RwLock<Settings>,
}

impl MemoryConfigStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replace all settings at once
    pub fn replace(&self, settings: Settings) {
        *self.settings.write() = settings;
    }

    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings.write());
    }
}

impl ConfigStore for MemoryConfigStore {
    fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        self.settings.write().enabled = enabled;
        Ok(())
    }
}
