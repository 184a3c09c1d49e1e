use super::{Verdict, Watcher};
use crate::config::Settings;
use crate::host::TaskProcessEnded;

/// Task names containing any of these (case-insensitive) count as test runs
pub const TEST_TASK_KEYWORDS: &[&str] = &[
    "test",
    "jest",
    "mocha",
    "pytest",
    "vitest",
    "spec",
    "cargo test",
    "go test",
];

pub fn is_test_task(name: &str) -> bool {
    let name = name.to_lowercase();
    TEST_TASK_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// Fires when a test-like task exits with a known non-zero code
#[derive(Debug, Default)]
pub struct TaskFailureWatcher;

impl TaskFailureWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Watcher<TaskProcessEnded> for TaskFailureWatcher {
    fn name(&self) -> &'static str {
        "TaskFailureWatcher"
    }

    fn is_enabled(&self, settings: &Settings) -> bool {
        settings.trigger_on_test_failure
    }

    fn observe(&mut self, event: &TaskProcessEnded) -> Verdict {
        let failed = matches!(event.exit_code, Some(code) if code != 0);

        if failed && is_test_task(&event.name) {
            Verdict::Trigger {
                reason: Some(format!("Task \"{}\" failed", event.name)),
            }
        } else {
            Verdict::Ignore
        }
    }
}
