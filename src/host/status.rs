use parking_lot::Mutex;

/// Idle indicator while alerts are enabled
pub const IDLE_TEXT: &str = "🔊 FAHHH";

/// Idle indicator while alerts are disabled
pub const MUTED_TEXT: &str = "🔇 FAHHH";

/// Shown for a moment after each alert
pub const ALERT_TEXT: &str = "💥 FAHHH!";

pub const TOOLTIP: &str = "FAHHH! Error Sound — Click to test";

/// Idle glyph for the given `enabled` state
pub fn idle_text(enabled: bool) -> &'static str {
    if enabled {
        IDLE_TEXT
    } else {
        MUTED_TEXT
    }
}

/// Background color of the status item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBackground {
    Error,
}

/// Persistent status-bar style indicator owned by the host
pub trait StatusIndicator: Send + Sync {
    /// Make the indicator visible, bound to a command the user can click
    fn show(&self, text: &str, tooltip: &str, command: &str);

    fn set_text(&self, text: &str);

    fn set_background(&self, background: Option<StatusBackground>);
}

#[derive(Debug, Default)]
struct ConsoleStatusState {
    text: String,
    background: Option<StatusBackground>,
}

/// Status indicator for terminal hosts: logs every visible change
#[derive(Debug, Default)]
pub struct ConsoleStatusIndicator {
    state: Mutex<ConsoleStatusState>,
}

impl ConsoleStatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }
}

impl StatusIndicator for ConsoleStatusIndicator {
    fn show(&self, text: &str, tooltip: &str, command: &str) {
        self.state.lock().text = text.to_string();
        tracing::debug!(target: "fahhh::status", "{} ({}; click runs {})", text, tooltip, command);
    }

    fn set_text(&self, text: &str) {
        let mut state = self.state.lock();
        if state.text != text {
            state.text = text.to_string();
            tracing::info!(target: "fahhh::status", "{}", text);
        }
    }

    fn set_background(&self, background: Option<StatusBackground>) {
        self.state.lock().background = background;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_text() {
        assert_eq!(idle_text(true), "🔊 FAHHH");
        assert_eq!(idle_text(false), "🔇 FAHHH");
    }

    #[test]
    fn test_console_indicator_tracks_text() {
        let indicator = ConsoleStatusIndicator::new();
        indicator.show(IDLE_TEXT, TOOLTIP, "fahhh.test");
        assert_eq!(indicator.text(), IDLE_TEXT);

        indicator.set_text(ALERT_TEXT);
        indicator.set_background(Some(StatusBackground::Error));
        assert_eq!(indicator.text(), ALERT_TEXT);
        assert_eq!(indicator.state.lock().background, Some(StatusBackground::Error));
    }
}
