/// Prefix of every line written to the output channel
pub const LINE_PREFIX: &str = "[FAHHH]";

/// Append-only, human-readable diagnostic channel
pub trait OutputChannel: Send + Sync {
    fn append_line(&self, line: &str);
}

/// Non-blocking user-facing messages
pub trait Notifier: Send + Sync {
    fn show_information(&self, message: &str);
}

/// Output channel that forwards every line to tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutputChannel;

impl OutputChannel for TracingOutputChannel {
    fn append_line(&self, line: &str) {
        tracing::info!(target: "fahhh::output", "{}", line);
    }
}

/// Notifier that prints to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_information(&self, message: &str) {
        println!("{}", message);
    }
}

/// Format an output line with the channel prefix
pub fn prefixed(message: impl std::fmt::Display) -> String {
    format!("{} {}", LINE_PREFIX, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed() {
        assert_eq!(prefixed("Deactivated."), "[FAHHH] Deactivated.");
        assert_eq!(prefixed(format_args!("{} new error(s)", 2)), "[FAHHH] 2 new error(s)");
    }
}
