use std::process::{Command, Stdio};
use std::thread;

use super::strategy::PlayerCommand;

/// Spawn-and-release process launcher.
///
/// A successful launch returns nothing: the caller never tracks, awaits or
/// cancels the player. Only a failure to start the program is reported.
pub trait ProcessLauncher: Send + Sync {
    fn spawn_detached(&self, command: &PlayerCommand) -> std::io::Result<()>;
}

/// Launches players detached from this process with all stdio discarded
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl DetachedLauncher {
    fn build(command: &PlayerCommand) -> Command {
        let mut cmd = Command::new(command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so a Ctrl+C aimed at us does not cut the sound
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        cmd
    }
}

impl ProcessLauncher for DetachedLauncher {
    fn spawn_detached(&self, command: &PlayerCommand) -> std::io::Result<()> {
        let mut child = Self::build(command).spawn()?;
        tracing::debug!("Launched {} (pid {})", command.program, child.id());

        // Reap in the background so finished players do not linger as zombies
        let program = command.program;
        let reaper = thread::Builder::new()
            .name("fahhh-player-reaper".to_string())
            .spawn(move || {
                if let Err(e) = child.wait() {
                    tracing::debug!("Could not reap {}: {}", program, e);
                }
            });

        if let Err(e) = reaper {
            tracing::debug!("Player reaper thread not started: {}", e);
        }

        Ok(())
    }
}
