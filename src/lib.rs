//! Plays an audible alert when an editor session hits new errors or failing
//! tests.
//!
//! The host (an editor bridge, or the `fahhh` CLI standing in for one) feeds
//! diagnostics changes, task exits and terminal output into a [`Session`].
//! Three watchers decide whether an event is worth an alert; a single
//! [`PlaybackInvoker`] applies the master switch and cooldown, flashes the
//! status indicator and launches a detached platform player.

pub mod config;
pub mod error;
pub mod host;
pub mod paths;
pub mod playback;
pub mod runner;
pub mod script;
pub mod session;
pub mod watchers;

pub use config::{ConfigStore, FileConfigStore, MemoryConfigStore, Settings};
pub use host::{Capability, Host, HostEvents};
pub use playback::{PlaybackInvoker, PlaybackStrategy, TriggerOutcome};
pub use session::{ActivationOptions, Session};
