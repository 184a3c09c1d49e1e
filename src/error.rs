use thiserror::Error;

/// Domain errors using thiserror for structured error handling.
///
/// None of these ever reach the user from the trigger path: playback and
/// watcher failures degrade to a line in the output channel. They surface
/// only at activation and from the CLI commands, where `anyhow` adds context.

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Failed to launch {program}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No player script was generated for this session")]
    ScriptMissing,
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to write player script to {path}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to create storage directory: {path}")]
    StorageDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum HostEventError {
    #[error("Malformed host event on line {line}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read host event stream")]
    Read(#[source] std::io::Error),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = PlaybackError::ScriptMissing;
        assert_eq!(
            err.to_string(),
            "No player script was generated for this session"
        );

        let err = PlaybackError::LaunchFailed {
            program: "mpg123".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to launch mpg123");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let script_err = ScriptError::WriteFailed {
            path: "/test/play.vbs".to_string(),
            source: io_err,
        };

        assert!(script_err.source().is_some());
        assert_eq!(
            script_err.to_string(),
            "Failed to write player script to /test/play.vbs"
        );
    }
}
