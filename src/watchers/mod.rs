/// Trigger sources
///
/// Each watcher interprets one kind of host notification and decides whether
/// it should sound the alert. Watchers hold no references to the invoker;
/// the session feeds them events and acts on their verdict, so all three
/// share one invocation path and one cooldown.
///
/// ```text
/// DiagnosticsChanged ──> DiagnosticsWatcher   (triggerOnDiagnostics)
/// TaskProcessEnded   ──> TaskFailureWatcher   (triggerOnTestFailure)
/// TerminalData       ──> TerminalOutputWatcher (triggerOnTestFailure, capability-gated)
/// ```
pub mod diagnostics;
pub mod tasks;
pub mod terminal;

use crate::config::Settings;

pub use diagnostics::DiagnosticsWatcher;
pub use tasks::{is_test_task, TaskFailureWatcher, TEST_TASK_KEYWORDS};
pub use terminal::{matches_failure, TerminalOutputWatcher, FAILURE_PATTERNS};

/// Result of observing one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Sound the alert, optionally logging why first
    Trigger { reason: Option<String> },
    /// Nothing to do
    Ignore,
}

impl Verdict {
    pub fn is_trigger(&self) -> bool {
        matches!(self, Verdict::Trigger { .. })
    }
}

/// Watcher over events of type `E`
pub trait Watcher<E>: Send {
    /// Watcher name (for logging)
    fn name(&self) -> &'static str;

    /// Whether this watcher's feature flag is on in `settings`
    fn is_enabled(&self, settings: &Settings) -> bool;

    /// Interpret one event
    fn observe(&mut self, event: &E) -> Verdict;
}
