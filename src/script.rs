//! Windows player script generation
//!
//! The scripted player drives `WMPlayer.OCX` from a small VBScript that is
//! written once at activation and then launched through `cscript` on every
//! trigger.

use std::fs;
use std::path::Path;

use crate::error::ScriptError;

/// Poll interval while waiting for playback to finish
const POLL_INTERVAL_MS: u32 = 30;

/// `WMPlayer.OCX` play state meaning "stopped"
const PLAY_STATE_STOPPED: u32 = 1;

/// Volume as written into the script: floored percentage, no upper bound
pub fn script_volume(volume: f64) -> i64 {
    (volume * 100.0).floor() as i64
}

/// Render the player script for `sound_path` at `volume`
pub fn render_player_script(volume: f64, sound_path: &Path) -> String {
    [
        "Dim snd".to_string(),
        r#"Set snd = CreateObject("WMPlayer.OCX")"#.to_string(),
        format!("snd.settings.volume = {}", script_volume(volume)),
        format!(r#"snd.URL = "{}""#, sound_path.display()),
        "snd.controls.play()".to_string(),
        format!("Do While snd.playState <> {}", PLAY_STATE_STOPPED),
        format!("  WScript.Sleep {}", POLL_INTERVAL_MS),
        "Loop".to_string(),
        "snd.close()".to_string(),
    ]
    .join("\r\n")
}

/// Write the player script, replacing whatever was there before
pub fn write_player_script(script_path: &Path, volume: f64, sound_path: &Path) -> Result<(), ScriptError> {
    let content = render_player_script(volume, sound_path);
    fs::write(script_path, content).map_err(|e| ScriptError::WriteFailed {
        path: script_path.display().to_string(),
        source: e,
    })?;

    tracing::debug!("Player script written to {}", script_path.display());
    Ok(())
}
