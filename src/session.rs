//! Session lifecycle
//!
//! A session is the explicit context for one activation: resolved paths, the
//! shared playback invoker (and with it the single cooldown), the wired
//! watchers and one subscription to the host's ordered event bus. `run` is
//! the one dispatch loop; it handles host events and commands strictly one
//! at a time, in the order the host published them.

use crossbeam_channel::{select, Receiver};
use std::fs;
use std::path::PathBuf;

use crate::config::DEFAULT_SCRIPT_VOLUME;
use crate::error::SessionError;
use crate::host::output::prefixed;
use crate::host::status::{idle_text, ALERT_TEXT, TOOLTIP};
use crate::host::{Command, DiagnosticsChanged, Host, HostEvent, Subscription, TaskProcessEnded, TerminalData};
use crate::paths::ResolvedPaths;
use crate::playback::{PlaybackInvoker, PlaybackStrategy};
use crate::script::write_player_script;
use crate::watchers::{DiagnosticsWatcher, TaskFailureWatcher, TerminalOutputWatcher, Verdict, Watcher};

/// Where the session finds its files and how it plays sound
#[derive(Debug, Clone)]
pub struct ActivationOptions {
    /// Directory containing `sound/fahhh_KcgAXfs.mp3`
    pub install_root: PathBuf,
    /// Per-user writable directory for the player script
    pub storage_root: PathBuf,
    pub strategy: PlaybackStrategy,
}

/// Run one event through a watcher, re-reading its flag first
fn observe<E, W: Watcher<E>>(watcher: &mut W, event: &E, host: &Host, invoker: &PlaybackInvoker) {
    if !watcher.is_enabled(&host.config.settings()) {
        return;
    }

    if let Verdict::Trigger { reason } = watcher.observe(event) {
        tracing::debug!("{} fired", watcher.name());
        if let Some(reason) = reason {
            host.output.append_line(&prefixed(reason));
        }
        invoker.trigger();
    }
}

pub struct Session {
    host: Host,
    invoker: PlaybackInvoker,
    events: Subscription<HostEvent>,
    diagnostics: Option<DiagnosticsWatcher>,
    tasks: Option<TaskFailureWatcher>,
    terminal: Option<TerminalOutputWatcher>,
}

impl Session {
    /// Prepare files, show the status indicator and wire the watchers
    pub fn activate(host: Host, options: ActivationOptions) -> Result<Self, SessionError> {
        let paths = ResolvedPaths::resolve(&options.install_root, &options.storage_root, options.strategy);

        fs::create_dir_all(&paths.storage_dir).map_err(|e| SessionError::StorageDirFailed {
            path: paths.storage_dir.display().to_string(),
            source: e,
        })?;

        let settings = host.config.settings();

        if let Some(script_path) = &paths.script_path {
            let volume = settings.volume_or(DEFAULT_SCRIPT_VOLUME);
            match write_player_script(script_path, volume, &paths.sound_path) {
                Ok(()) => host
                    .output
                    .append_line(&prefixed(format_args!("VBS ready: {}", script_path.display()))),
                Err(e) => {
                    // Playback will log a launch failure on every trigger
                    let message = format!("{:#}", anyhow::Error::new(e));
                    tracing::error!("{}", message);
                    host.output.append_line(&prefixed(format_args!("⚠️ {}", message)));
                }
            }
        }

        host.output
            .append_line(&prefixed(format_args!("✅ Activated! Sound: {}", paths.sound_path.display())));
        host.output
            .append_line(&prefixed(format_args!("File exists: {}", paths.sound_exists())));
        tracing::info!("Playback via {}", options.strategy.description());

        host.status
            .show(idle_text(settings.enabled), TOOLTIP, Command::Test.id());

        let diagnostics = settings.trigger_on_diagnostics.then(DiagnosticsWatcher::new);
        let tasks = settings.trigger_on_test_failure.then(TaskFailureWatcher::new);
        let terminal = (settings.trigger_on_test_failure && host.events.terminal_data.is_available())
            .then(TerminalOutputWatcher::new);

        let invoker = PlaybackInvoker::new(&host, paths, options.strategy);
        let events = host.events.subscribe();

        let session = Self {
            host,
            invoker,
            events,
            diagnostics,
            tasks,
            terminal,
        };

        tracing::info!("Watchers: {:?}", session.wired_watchers());
        session
            .host
            .output
            .append_line(&prefixed("Watching for errors and failures..."));

        Ok(session)
    }

    pub fn invoker(&self) -> &PlaybackInvoker {
        &self.invoker
    }

    /// Names of the watchers subscribed at activation
    pub fn wired_watchers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if let Some(w) = &self.diagnostics {
            names.push(w.name());
        }
        if let Some(w) = &self.tasks {
            names.push(w.name());
        }
        if let Some(w) = &self.terminal {
            names.push(w.name());
        }
        names
    }

    /// Execute a user command
    pub fn execute(&mut self, command: Command) {
        tracing::debug!("Executing command: {}", command.id());

        match command {
            Command::Test => {
                self.invoker.trigger();
                self.host.notifier.show_information(ALERT_TEXT);
            }
            Command::Toggle => {
                let enabled = !self.host.config.settings().enabled;
                if let Err(e) = self.host.config.set_enabled(enabled) {
                    let message = format!("{:#}", anyhow::Error::new(e));
                    tracing::warn!("Toggle failed: {}", message);
                    self.host.output.append_line(&prefixed(format_args!("⚠️ {}", message)));
                    return;
                }

                self.host.status.set_text(idle_text(enabled));
                self.host.notifier.show_information(if enabled {
                    "FAHHH enabled 🔊"
                } else {
                    "FAHHH disabled 🔇"
                });
            }
        }
    }

    pub fn on_diagnostics(&mut self, event: &DiagnosticsChanged) {
        if let Some(watcher) = self.diagnostics.as_mut() {
            observe(watcher, event, &self.host, &self.invoker);
        }
    }

    pub fn on_task_ended(&mut self, event: &TaskProcessEnded) {
        if let Some(watcher) = self.tasks.as_mut() {
            observe(watcher, event, &self.host, &self.invoker);
        }
    }

    pub fn on_terminal_data(&mut self, event: &TerminalData) {
        if let Some(watcher) = self.terminal.as_mut() {
            observe(watcher, event, &self.host, &self.invoker);
        }
    }

    /// Handle one host event or command
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Diagnostics(changed) => self.on_diagnostics(&changed),
            HostEvent::TaskEnded(ended) => self.on_task_ended(&ended),
            HostEvent::TerminalData(data) => self.on_terminal_data(&data),
            HostEvent::Command { command } => self.execute(command),
        }
    }

    /// Handle everything already queued, without waiting. Returns the count.
    pub fn process_pending(&mut self) -> usize {
        let events = self.events.receiver().clone();
        let mut handled = 0;

        while let Ok(event) = events.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Dispatch events until `shutdown` fires or its sender is dropped,
    /// then handle whatever is still queued.
    pub fn run(&mut self, shutdown: &Receiver<()>) {
        let events = self.events.receiver().clone();

        loop {
            select! {
                recv(events) -> event => match event {
                    Ok(event) => self.handle(event),
                    Err(_) => break,
                },
                recv(shutdown) -> _ => break,
            }
        }

        let drained = self.process_pending();
        tracing::debug!("Dispatch loop stopped, {} queued events handled", drained);
    }

    /// Log termination; subscriptions are released on drop
    pub fn deactivate(self) {
        self.host.output.append_line(&prefixed("Deactivated."));
    }
}
