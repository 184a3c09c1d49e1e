use super::{Verdict, Watcher};
use crate::config::Settings;
use crate::host::DiagnosticsChanged;

/// Fires when the error total of a diagnostics change exceeds the previous one
#[derive(Debug, Default)]
pub struct DiagnosticsWatcher {
    previous_errors: usize,
}

impl DiagnosticsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error total seen on the last observed event
    pub fn previous_errors(&self) -> usize {
        self.previous_errors
    }
}

impl Watcher<DiagnosticsChanged> for DiagnosticsWatcher {
    fn name(&self) -> &'static str {
        "DiagnosticsWatcher"
    }

    fn is_enabled(&self, settings: &Settings) -> bool {
        settings.trigger_on_diagnostics
    }

    fn observe(&mut self, event: &DiagnosticsChanged) -> Verdict {
        let total = event.error_total();
        let previous = std::mem::replace(&mut self.previous_errors, total);

        if total > previous {
            Verdict::Trigger {
                reason: Some(format!("{} new error(s)", total - previous)),
            }
        } else {
            Verdict::Ignore
        }
    }
}
