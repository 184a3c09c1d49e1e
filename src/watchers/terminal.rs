use super::{Verdict, Watcher};
use crate::config::Settings;
use crate::host::TerminalData;

/// Lower-case substrings that mark a chunk of terminal output as a failure.
///
/// `fatal:` also matches benign lines such as git hints; kept as-is.
pub const FAILURE_PATTERNS: &[&str] = &[
    "tests failed",
    "test failed",
    "failing tests",
    "assertion error",
    "assertionerror",
    "testfailure",
    "test failure",
    "panic:",
    "fatal:",
];

pub fn matches_failure(chunk: &str) -> bool {
    let text = chunk.to_lowercase();
    FAILURE_PATTERNS.iter().any(|pattern| text.contains(pattern))
}

/// Fires on any terminal output chunk containing a failure signature
#[derive(Debug, Default)]
pub struct TerminalOutputWatcher;

impl TerminalOutputWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Watcher<TerminalData> for TerminalOutputWatcher {
    fn name(&self) -> &'static str {
        "TerminalOutputWatcher"
    }

    fn is_enabled(&self, settings: &Settings) -> bool {
        settings.trigger_on_test_failure
    }

    fn observe(&mut self, event: &TerminalData) -> Verdict {
        if matches_failure(&event.data) {
            Verdict::Trigger { reason: None }
        } else {
            Verdict::Ignore
        }
    }
}
