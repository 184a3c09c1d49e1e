//! Host notification types
//!
//! These mirror what an editor reports: diagnostics changes, task process
//! exits, raw terminal output and user commands. They double as the wire
//! format of the JSON-lines host stream (`type`-tagged, camelCase keys).

use serde::{Deserialize, Serialize};

/// Diagnostic severity as reported by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Current diagnostics of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDiagnostics {
    pub uri: String,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ResourceDiagnostics {
    pub fn new(uri: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            uri: uri.into(),
            diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

/// Diagnostics changed for the listed resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsChanged {
    #[serde(default)]
    pub resources: Vec<ResourceDiagnostics>,
}

impl DiagnosticsChanged {
    /// Error-severity diagnostics summed over every affected resource
    pub fn error_total(&self) -> usize {
        self.resources.iter().map(ResourceDiagnostics::error_count).sum()
    }
}

/// A task's process exited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProcessEnded {
    pub name: String,
    /// `None` when the host could not determine an exit code
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// A chunk of raw terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalData {
    pub data: String,
}

impl TerminalData {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// User commands contributed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Play the alert right now
    #[serde(rename = "fahhh.test")]
    Test,

    /// Flip the persisted `enabled` flag
    #[serde(rename = "fahhh.toggle")]
    Toggle,
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::Test => "fahhh.test",
            Command::Toggle => "fahhh.toggle",
        }
    }
}

/// One line of the host event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    Diagnostics(DiagnosticsChanged),
    TaskEnded(TaskProcessEnded),
    TerminalData(TerminalData),
    Command { command: Command },
}

impl HostEvent {
    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            HostEvent::Diagnostics(event) => {
                format!("Diagnostics changed ({} resources)", event.resources.len())
            }
            HostEvent::TaskEnded(event) => match event.exit_code {
                Some(code) => format!("Task \"{}\" ended with {}", event.name, code),
                None => format!("Task \"{}\" ended", event.name),
            },
            HostEvent::TerminalData(event) => format!("Terminal data ({} bytes)", event.data.len()),
            HostEvent::Command { command } => format!("Command {}", command.id()),
        }
    }
}

impl From<DiagnosticsChanged> for HostEvent {
    fn from(event: DiagnosticsChanged) -> Self {
        HostEvent::Diagnostics(event)
    }
}

impl From<TaskProcessEnded> for HostEvent {
    fn from(event: TaskProcessEnded) -> Self {
        HostEvent::TaskEnded(event)
    }
}

impl From<TerminalData> for HostEvent {
    fn from(event: TerminalData) -> Self {
        HostEvent::TerminalData(event)
    }
}

impl From<Command> for HostEvent {
    fn from(command: Command) -> Self {
        HostEvent::Command { command }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_total_counts_only_errors() {
        let event = DiagnosticsChanged {
            resources: vec![
                ResourceDiagnostics::new(
                    "file:///a.rs",
                    vec![Diagnostic::error("E0308"), Diagnostic::warning("unused")],
                ),
                ResourceDiagnostics::new("file:///b.rs", vec![Diagnostic::error("E0425")]),
                ResourceDiagnostics::new("file:///c.rs", Vec::new()),
            ],
        };

        assert_eq!(event.error_total(), 2);
    }

    #[test]
    fn test_parse_diagnostics_line() {
        let line = r#"{"type":"diagnostics","resources":[{"uri":"file:///a.ts","diagnostics":[{"severity":"error","message":"x"},{"severity":"hint"}]}]}"#;
        let event: HostEvent = serde_json::from_str(line).unwrap();

        match event {
            HostEvent::Diagnostics(changed) => assert_eq!(changed.error_total(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_task_exit_code_variants() {
        let failed: HostEvent = serde_json::from_str(r#"{"type":"taskEnded","name":"npm test","exitCode":1}"#).unwrap();
        let unknown: HostEvent = serde_json::from_str(r#"{"type":"taskEnded","name":"npm test","exitCode":null}"#).unwrap();
        let missing: HostEvent = serde_json::from_str(r#"{"type":"taskEnded","name":"npm test"}"#).unwrap();

        assert_eq!(
            failed,
            HostEvent::TaskEnded(TaskProcessEnded {
                name: "npm test".to_string(),
                exit_code: Some(1)
            })
        );
        assert!(matches!(unknown, HostEvent::TaskEnded(TaskProcessEnded { exit_code: None, .. })));
        assert!(matches!(missing, HostEvent::TaskEnded(TaskProcessEnded { exit_code: None, .. })));
    }

    #[test]
    fn test_parse_command() {
        let event: HostEvent = serde_json::from_str(r#"{"type":"command","command":"fahhh.toggle"}"#).unwrap();
        assert_eq!(event, HostEvent::Command { command: Command::Toggle });
        assert_eq!(event.description(), "Command fahhh.toggle");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<HostEvent>(r#"{"type":"bogus"}"#).is_err());
    }
}
