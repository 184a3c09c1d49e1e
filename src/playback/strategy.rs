//! Platform playback strategies
//!
//! Chosen once at activation. Each strategy maps to an argv-only invocation
//! of an external player; nothing goes through a shell.

use std::ffi::OsString;

use crate::config::{Settings, DEFAULT_PLAYER_VOLUME};
use crate::error::PlaybackError;
use crate::paths::ResolvedPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStrategy {
    /// `cscript` running the pre-generated `WMPlayer.OCX` script
    WindowsScripted,

    /// `afplay` with a volume argument
    MacNative,

    /// `mpg123`, falling back to `ffplay` if it cannot be launched
    LinuxCliWithFallback,
}

impl PlaybackStrategy {
    /// Strategy for the operating system this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlaybackStrategy::WindowsScripted
        } else if cfg!(target_os = "macos") {
            PlaybackStrategy::MacNative
        } else {
            PlaybackStrategy::LinuxCliWithFallback
        }
    }

    /// Whether this strategy plays through a generated helper script
    pub fn needs_script(self) -> bool {
        matches!(self, PlaybackStrategy::WindowsScripted)
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlaybackStrategy::WindowsScripted => "cscript + WMPlayer.OCX",
            PlaybackStrategy::MacNative => "afplay",
            PlaybackStrategy::LinuxCliWithFallback => "mpg123 (ffplay fallback)",
        }
    }

    /// Build the player invocation for one trigger
    pub fn invocation(&self, paths: &ResolvedPaths, settings: &Settings) -> Result<PlayerInvocation, PlaybackError> {
        let sound: OsString = paths.sound_path.clone().into_os_string();

        let invocation = match self {
            PlaybackStrategy::WindowsScripted => {
                let script = paths.script_path.as_ref().ok_or(PlaybackError::ScriptMissing)?;
                PlayerInvocation::single(PlayerCommand::new(
                    "cscript",
                    ["//nologo".into(), script.clone().into_os_string()],
                ))
            }
            PlaybackStrategy::MacNative => {
                let volume = settings.volume_or(DEFAULT_PLAYER_VOLUME);
                PlayerInvocation::single(PlayerCommand::new(
                    "afplay",
                    ["-v".into(), volume.to_string().into(), sound],
                ))
            }
            PlaybackStrategy::LinuxCliWithFallback => PlayerInvocation {
                primary: PlayerCommand::new("mpg123", ["-q".into(), sound.clone()]),
                fallback: Some(PlayerCommand::new(
                    "ffplay",
                    [
                        "-nodisp".into(),
                        "-autoexit".into(),
                        "-loglevel".into(),
                        "quiet".into(),
                        sound,
                    ],
                )),
            },
        };

        Ok(invocation)
    }
}

/// A single external player launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: &'static str,
    pub args: Vec<OsString>,
}

impl PlayerCommand {
    pub fn new(program: &'static str, args: impl IntoIterator<Item = OsString>) -> Self {
        Self {
            program,
            args: args.into_iter().collect(),
        }
    }
}

/// Primary launch plus the one fallback tried only if the primary fails to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInvocation {
    pub primary: PlayerCommand,
    pub fallback: Option<PlayerCommand>,
}

impl PlayerInvocation {
    fn single(primary: PlayerCommand) -> Self {
        Self { primary, fallback: None }
    }
}
