use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::cooldown::Cooldown;
use super::launcher::ProcessLauncher;
use super::strategy::PlaybackStrategy;
use crate::config::{ConfigStore, Settings};
use crate::error::PlaybackError;
use crate::host::output::prefixed;
use crate::host::status::{ALERT_TEXT, IDLE_TEXT};
use crate::host::{Host, OutputChannel, StatusBackground, StatusIndicator};
use crate::paths::ResolvedPaths;

/// How long the alert glyph stays up before reverting to idle
pub const STATUS_REVERT_DELAY: Duration = Duration::from_millis(1500);

/// What a single trigger ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Master switch is off
    Disabled,
    /// Another alert played within the cooldown window
    CoolingDown,
    /// The sound asset is not on disk
    SoundMissing,
    /// No player could be launched
    LaunchFailed,
    /// A player process was started
    Played,
}

/// Gate-and-play sequence shared by every trigger source.
///
/// Each step is a hard gate: master switch, cooldown, asset presence. Only
/// then is the status indicator flashed and a detached player launched.
/// Nothing here returns an error or blocks the caller.
pub struct PlaybackInvoker {
    paths: ResolvedPaths,
    strategy: PlaybackStrategy,
    config: Arc<dyn ConfigStore>,
    output: Arc<dyn OutputChannel>,
    status: Arc<dyn StatusIndicator>,
    launcher: Arc<dyn ProcessLauncher>,
    cooldown: Mutex<Cooldown>,
    revert_delay: Duration,
}

impl PlaybackInvoker {
    pub fn new(host: &Host, paths: ResolvedPaths, strategy: PlaybackStrategy) -> Self {
        Self {
            paths,
            strategy,
            config: Arc::clone(&host.config),
            output: Arc::clone(&host.output),
            status: Arc::clone(&host.status),
            launcher: Arc::clone(&host.launcher),
            cooldown: Mutex::new(Cooldown::new()),
            revert_delay: STATUS_REVERT_DELAY,
        }
    }

    /// Override the status revert delay
    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn strategy(&self) -> PlaybackStrategy {
        self.strategy
    }

    /// Try to play the alert now
    pub fn trigger(&self) {
        let outcome = self.trigger_at(Instant::now());
        tracing::trace!("Trigger outcome: {:?}", outcome);
    }

    /// Try to play the alert as if the current time were `now`
    pub fn trigger_at(&self, now: Instant) -> TriggerOutcome {
        let settings = self.config.settings();
        if !settings.enabled {
            return TriggerOutcome::Disabled;
        }

        let window = settings.cooldown();
        if !self.cooldown.lock().try_acquire(now, window) {
            tracing::debug!("Alert suppressed by {:?} cooldown", window);
            return TriggerOutcome::CoolingDown;
        }

        if !self.paths.sound_exists() {
            self.output
                .append_line(&prefixed(format_args!("❌ File not found: {}", self.paths.sound_path.display())));
            return TriggerOutcome::SoundMissing;
        }

        self.flash_status();

        if let Err(e) = self.launch(&settings) {
            let message = format!("{:#}", anyhow::Error::new(e));
            tracing::warn!("Alert playback failed: {}", message);
            self.output.append_line(&prefixed(format_args!("⚠️ {}", message)));
            return TriggerOutcome::LaunchFailed;
        }

        self.output.append_line(&prefixed("💥 Playing!"));
        TriggerOutcome::Played
    }

    /// Show the alert glyph and schedule the revert without waiting for it
    fn flash_status(&self) {
        self.status.set_text(ALERT_TEXT);
        self.status.set_background(Some(StatusBackground::Error));

        let status = Arc::clone(&self.status);
        let delay = self.revert_delay;
        let revert = thread::Builder::new()
            .name("fahhh-status-revert".to_string())
            .spawn(move || {
                thread::sleep(delay);
                status.set_text(IDLE_TEXT);
                status.set_background(None);
            });

        if let Err(e) = revert {
            tracing::warn!("Could not schedule status revert: {}", e);
        }
    }

    fn launch(&self, settings: &Settings) -> Result<(), PlaybackError> {
        let invocation = self.strategy.invocation(&self.paths, settings)?;

        let primary_err = match self.launcher.spawn_detached(&invocation.primary) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        match invocation.fallback {
            Some(fallback) => {
                tracing::debug!(
                    "{} failed to start ({}), trying {}",
                    invocation.primary.program,
                    primary_err,
                    fallback.program
                );
                self.launcher
                    .spawn_detached(&fallback)
                    .map_err(|source| PlaybackError::LaunchFailed {
                        program: fallback.program.to_string(),
                        source,
                    })
            }
            None => Err(PlaybackError::LaunchFailed {
                program: invocation.primary.program.to_string(),
                source: primary_err,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::host::{ConsoleNotifier, HostEvents};
    use crate::playback::PlayerCommand;

    #[derive(Default)]
    struct RecordingOutput(Mutex<Vec<String>>);

    impl OutputChannel for RecordingOutput {
        fn append_line(&self, line: &str) {
            self.0.lock().push(line.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingStatus(Mutex<Vec<(String, Option<StatusBackground>)>>);

    impl StatusIndicator for RecordingStatus {
        fn show(&self, _text: &str, _tooltip: &str, _command: &str) {}

        fn set_text(&self, text: &str) {
            self.0.lock().push((text.to_string(), None));
        }

        fn set_background(&self, background: Option<StatusBackground>) {
            if let Some(last) = self.0.lock().last_mut() {
                last.1 = background;
            }
        }
    }

    /// Fails every program listed in `missing`
    #[derive(Default)]
    struct FakeLauncher {
        missing: Vec<&'static str>,
        launched: Mutex<Vec<&'static str>>,
    }

    impl ProcessLauncher for FakeLauncher {
        fn spawn_detached(&self, command: &PlayerCommand) -> std::io::Result<()> {
            self.launched.lock().push(command.program);
            if self.missing.contains(&command.program) {
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"))
            } else {
                Ok(())
            }
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Arc<MemoryConfigStore>,
        output: Arc<RecordingOutput>,
        status: Arc<RecordingStatus>,
        launcher: Arc<FakeLauncher>,
        invoker: PlaybackInvoker,
    }

    fn fixture(strategy: PlaybackStrategy, missing: Vec<&'static str>, with_sound: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = ResolvedPaths::resolve(dir.path(), dir.path(), strategy);
        if with_sound {
            std::fs::create_dir_all(paths.sound_path.parent().unwrap()).unwrap();
            std::fs::write(&paths.sound_path, b"ID3").unwrap();
        }

        let config = Arc::new(MemoryConfigStore::default());
        let output = Arc::new(RecordingOutput::default());
        let status = Arc::new(RecordingStatus::default());
        let launcher = Arc::new(FakeLauncher {
            missing,
            ..FakeLauncher::default()
        });

        let host = Host {
            config: config.clone(),
            output: output.clone(),
            status: status.clone(),
            notifier: Arc::new(ConsoleNotifier),
            launcher: launcher.clone(),
            events: HostEvents::new(true),
        };

        let invoker = PlaybackInvoker::new(&host, paths, strategy).with_revert_delay(Duration::from_millis(20));

        Fixture {
            _dir: dir,
            config,
            output,
            status,
            launcher,
            invoker,
        }
    }

    #[test]
    fn test_cooldown_scenario() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), true);
        let t0 = Instant::now();

        assert_eq!(f.invoker.trigger_at(t0), TriggerOutcome::Played);
        assert_eq!(
            f.invoker.trigger_at(t0 + Duration::from_millis(1000)),
            TriggerOutcome::CoolingDown
        );
        assert_eq!(
            f.invoker.trigger_at(t0 + Duration::from_millis(2500)),
            TriggerOutcome::Played
        );

        assert_eq!(f.launcher.launched.lock().len(), 2);
        let playing = f.output.0.lock().iter().filter(|l| l.as_str() == "[FAHHH] 💥 Playing!").count();
        assert_eq!(playing, 2);
    }

    #[test]
    fn test_disabled_does_nothing() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), true);
        f.config.update(|s| s.enabled = false);

        assert_eq!(f.invoker.trigger_at(Instant::now()), TriggerOutcome::Disabled);
        assert!(f.launcher.launched.lock().is_empty());
        assert!(f.output.0.lock().is_empty());
        assert!(f.status.0.lock().is_empty());
    }

    #[test]
    fn test_disabled_trigger_does_not_start_cooldown() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), true);
        let t0 = Instant::now();

        f.config.update(|s| s.enabled = false);
        assert_eq!(f.invoker.trigger_at(t0), TriggerOutcome::Disabled);

        f.config.update(|s| s.enabled = true);
        assert_eq!(
            f.invoker.trigger_at(t0 + Duration::from_millis(10)),
            TriggerOutcome::Played
        );
    }

    #[test]
    fn test_missing_sound_logs_one_line() {
        let f = fixture(PlaybackStrategy::LinuxCliWithFallback, Vec::new(), false);

        assert_eq!(f.invoker.trigger_at(Instant::now()), TriggerOutcome::SoundMissing);

        let lines = f.output.0.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[FAHHH] ❌ File not found: "));
        assert!(f.launcher.launched.lock().is_empty());
        assert!(f.status.0.lock().is_empty());
    }

    #[test]
    fn test_missing_sound_still_starts_cooldown() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), false);
        let t0 = Instant::now();

        assert_eq!(f.invoker.trigger_at(t0), TriggerOutcome::SoundMissing);
        assert_eq!(
            f.invoker.trigger_at(t0 + Duration::from_millis(500)),
            TriggerOutcome::CoolingDown
        );
    }

    #[test]
    fn test_linux_falls_back_to_ffplay() {
        let f = fixture(PlaybackStrategy::LinuxCliWithFallback, vec!["mpg123"], true);

        assert_eq!(f.invoker.trigger_at(Instant::now()), TriggerOutcome::Played);
        assert_eq!(*f.launcher.launched.lock(), vec!["mpg123", "ffplay"]);
    }

    #[test]
    fn test_no_fallback_when_primary_starts() {
        let f = fixture(PlaybackStrategy::LinuxCliWithFallback, Vec::new(), true);

        f.invoker.trigger_at(Instant::now());
        assert_eq!(*f.launcher.launched.lock(), vec!["mpg123"]);
    }

    #[test]
    fn test_launch_failure_is_logged_not_raised() {
        let f = fixture(PlaybackStrategy::LinuxCliWithFallback, vec!["mpg123", "ffplay"], true);

        assert_eq!(f.invoker.trigger_at(Instant::now()), TriggerOutcome::LaunchFailed);

        let lines = f.output.0.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Failed to launch ffplay"));
    }

    #[test]
    fn test_status_flashes_then_reverts() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), true);

        f.invoker.trigger_at(Instant::now());
        assert_eq!(
            f.status.0.lock()[0],
            (ALERT_TEXT.to_string(), Some(StatusBackground::Error))
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while f.status.0.lock().len() < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        let history = f.status.0.lock();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], (IDLE_TEXT.to_string(), None));
    }

    #[test]
    fn test_negative_cooldown_never_suppresses() {
        let f = fixture(PlaybackStrategy::MacNative, Vec::new(), true);
        f.config.update(|s| s.cooldown_ms = -1.0);
        let t0 = Instant::now();

        assert_eq!(f.invoker.trigger_at(t0), TriggerOutcome::Played);
        assert_eq!(f.invoker.trigger_at(t0), TriggerOutcome::Played);
    }

    #[test]
    fn test_status_flashes_even_if_launch_fails() {
        let f = fixture(PlaybackStrategy::MacNative, vec!["afplay"], true);

        assert_eq!(f.invoker.trigger_at(Instant::now()), TriggerOutcome::LaunchFailed);
        assert_eq!(f.status.0.lock()[0].0, ALERT_TEXT);
    }
}
