//! JSON-lines host event stream
//!
//! An editor bridge writes one [`HostEvent`] per line; each line is published
//! in stream order, commands included. Bad lines are logged and skipped so
//! one malformed message never stops the stream.

use std::io::BufRead;

use super::events::HostEvent;
use super::HostEvents;
use crate::error::HostEventError;

/// Counters for one pass over a stream
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub dispatched: usize,
    pub skipped: usize,
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<HostEvent>, HostEventError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| HostEventError::Malformed {
            line: line_number,
            source,
        })
}

/// Read the whole stream, dispatching every event until EOF
pub fn pump<R: BufRead>(reader: R, events: &HostEvents) -> Result<StreamStats, HostEventError> {
    let mut stats = StreamStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(HostEventError::Read)?;

        match parse_line(index + 1, &line) {
            Ok(Some(event)) => {
                tracing::trace!("Host event: {}", event.description());
                if events.publish(event) {
                    stats.dispatched += 1;
                } else {
                    tracing::debug!("Line {}: terminal data not supported by this host", index + 1);
                    stats.skipped += 1;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("{:#}", anyhow::Error::new(e));
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
