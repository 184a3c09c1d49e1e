//! Install and storage path resolution
//!
//! Computes the absolute location of the bundled alert sound and, for the
//! scripted Windows player, the scratch script path. Nothing here touches
//! the filesystem; a missing asset is detected at trigger time.

use std::path::{Path, PathBuf};

use crate::playback::PlaybackStrategy;

/// Bundled alert sound, relative to the install root
pub const SOUND_RELATIVE_PATH: [&str; 2] = ["sound", "fahhh_KcgAXfs.mp3"];

/// Generated player script name, relative to the storage root
pub const SCRIPT_FILE_NAME: &str = "play.vbs";

/// Paths computed once at activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Alert sound played on every trigger
    pub sound_path: PathBuf,

    /// Per-user writable directory
    pub storage_dir: PathBuf,

    /// Player script, only for strategies that need one
    pub script_path: Option<PathBuf>,
}

impl ResolvedPaths {
    pub fn resolve(install_root: &Path, storage_root: &Path, strategy: PlaybackStrategy) -> Self {
        let sound_path = SOUND_RELATIVE_PATH
            .iter()
            .fold(install_root.to_path_buf(), |path, part| path.join(part));

        let script_path = strategy
            .needs_script()
            .then(|| storage_root.join(SCRIPT_FILE_NAME));

        Self {
            sound_path,
            storage_dir: storage_root.to_path_buf(),
            script_path,
        }
    }

    pub fn sound_exists(&self) -> bool {
        self.sound_path.exists()
    }
}

/// Directory holding the running executable, used as the default install root
pub fn executable_dir() -> std::io::Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    exe_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "executable has no parent directory"))
}

/// Default per-user storage root: `<data_dir>/fahhh`
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fahhh"))
        .unwrap_or_else(|| std::env::temp_dir().join("fahhh"))
}
