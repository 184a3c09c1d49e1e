use std::time::{Duration, Instant};

/// Cooldown gate to prevent rapid repeated alerts.
///
/// The window is passed on every check because it is read live from the
/// configuration and may change between triggers.
#[derive(Debug, Default)]
pub struct Cooldown {
    last_play: Option<Instant>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `window` has elapsed since the last accepted trigger.
    ///
    /// On success the instant is recorded before returning, so the
    /// check-and-update is a single step for the caller.
    pub fn try_acquire(&mut self, now: Instant, window: Duration) -> bool {
        match self.last_play {
            Some(last) if now.saturating_duration_since(last) < window => false,
            _ => {
                self.last_play = Some(now);
                true
            }
        }
    }

    pub fn last_play(&self) -> Option<Instant> {
        self.last_play
    }
}
