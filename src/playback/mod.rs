/// Playback module
///
/// Turns a trigger into at most one detached player process per cooldown
/// window.
///
/// ## Architecture
///
/// ```text
/// PlaybackInvoker::trigger()
///   ├── enabled?            (ConfigStore, read live)
///   ├── Cooldown            (one shared window for all sources)
///   ├── sound on disk?      (ResolvedPaths)
///   ├── StatusIndicator     (alert glyph, reverted after 1500 ms)
///   └── PlaybackStrategy    (selected once at activation)
///       ├── WindowsScripted       cscript //nologo play.vbs
///       ├── MacNative             afplay -v <volume> <sound>
///       └── LinuxCliWithFallback  mpg123 -q <sound>, else ffplay
/// ```
pub mod cooldown;
pub mod invoker;
pub mod launcher;
pub mod strategy;

// Re-export commonly used types
pub use cooldown::Cooldown;
pub use invoker::{PlaybackInvoker, TriggerOutcome, STATUS_REVERT_DELAY};
pub use launcher::{DetachedLauncher, ProcessLauncher};
pub use strategy::{PlaybackStrategy, PlayerCommand, PlayerInvocation};
