/// Host abstraction
///
/// Everything the alert logic needs from the surrounding editor (or the CLI
/// standing in for one) goes through this module:
///
/// ```text
/// Host
///   ├── ConfigStore       live settings, toggle persistence
///   ├── OutputChannel     append-only log lines
///   ├── StatusIndicator   idle / alert glyph
///   ├── Notifier          one-shot information messages
///   ├── ProcessLauncher   spawn-and-release player processes
///   └── HostEvents      one ordered EventBus<HostEvent>, fed by
///       ├── diagnostics   EventSource<DiagnosticsChanged>
///       ├── tasks         EventSource<TaskProcessEnded>
///       ├── terminal_data Capability<EventSource<TerminalData>>
///       └── commands      EventSource<Command>
/// ```
///
/// Terminal data is capability-gated: hosts that cannot observe raw
/// terminal writes report `Capability::Unavailable` and the terminal watcher
/// is simply never wired.
pub mod bus;
pub mod events;
pub mod output;
pub mod status;
pub mod stream;

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::playback::ProcessLauncher;

pub use bus::{EventBus, EventSource, SubscriberId, Subscription};
pub use events::{
    Command, Diagnostic, DiagnosticsChanged, HostEvent, ResourceDiagnostics, Severity, TaskProcessEnded,
    TerminalData,
};
pub use output::{ConsoleNotifier, Notifier, OutputChannel, TracingOutputChannel};
pub use status::{ConsoleStatusIndicator, StatusBackground, StatusIndicator};

/// A host feature that may or may not exist
#[derive(Debug, Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Capability<T> {
    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Capability::Available(value) => Some(value),
            Capability::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

/// Notification sources offered by the host
///
/// Every kind, commands included, is published onto one bus so a subscriber
/// sees them in the order the host produced them.
#[derive(Clone)]
pub struct HostEvents {
    bus: EventBus<HostEvent>,
    pub diagnostics: EventSource<DiagnosticsChanged, HostEvent>,
    pub tasks: EventSource<TaskProcessEnded, HostEvent>,
    pub terminal_data: Capability<EventSource<TerminalData, HostEvent>>,
    pub commands: EventSource<Command, HostEvent>,
}

impl HostEvents {
    pub fn new(with_terminal_data: bool) -> Self {
        let bus = EventBus::new();

        Self {
            diagnostics: EventSource::new(&bus),
            tasks: EventSource::new(&bus),
            terminal_data: if with_terminal_data {
                Capability::Available(EventSource::new(&bus))
            } else {
                Capability::Unavailable
            },
            commands: EventSource::new(&bus),
            bus,
        }
    }

    /// Subscribe to every event kind. Dropping the token unsubscribes.
    pub fn subscribe(&self) -> Subscription<HostEvent> {
        self.bus.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Publish an event of any kind. Returns false if the host cannot
    /// observe that kind.
    pub fn publish(&self, event: HostEvent) -> bool {
        if matches!(event, HostEvent::TerminalData(_)) && !self.terminal_data.is_available() {
            return false;
        }
        self.bus.publish(event);
        true
    }
}

/// Services and notification sources provided by the host
#[derive(Clone)]
pub struct Host {
    pub config: Arc<dyn ConfigStore>,
    pub output: Arc<dyn OutputChannel>,
    pub status: Arc<dyn StatusIndicator>,
    pub notifier: Arc<dyn Notifier>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub events: HostEvents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability() {
        let events = HostEvents::new(false);
        assert!(!events.terminal_data.is_available());
        assert!(events.terminal_data.as_ref().is_none());

        let events = HostEvents::new(true);
        assert!(events.terminal_data.is_available());
    }

    #[test]
    fn test_kinds_arrive_in_publication_order() {
        let events = HostEvents::new(true);
        let sub = events.subscribe();

        events.commands.publish(Command::Toggle);
        events.tasks.publish(TaskProcessEnded {
            name: "npm test".to_string(),
            exit_code: Some(1),
        });
        events.commands.publish(Command::Test);

        let received: Vec<HostEvent> = sub.receiver().try_iter().collect();
        assert!(matches!(received[0], HostEvent::Command { command: Command::Toggle }));
        assert!(matches!(received[1], HostEvent::TaskEnded(_)));
        assert!(matches!(received[2], HostEvent::Command { command: Command::Test }));
    }

    #[test]
    fn test_publish_respects_terminal_capability() {
        let events = HostEvents::new(false);
        let sub = events.subscribe();

        assert!(!events.publish(HostEvent::TerminalData(TerminalData::new("panic: x"))));
        assert!(events.publish(HostEvent::Command { command: Command::Test }));
        assert_eq!(sub.receiver().try_iter().count(), 1);
    }
}
