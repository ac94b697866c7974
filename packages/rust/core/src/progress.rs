//! Progress reporting hooks for long-running lookups.

/// Progress callback for reporting composition status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once a phase's source has answered, successfully or not.
    fn source_done(&self, source: &str, items: usize, degraded: bool);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_done(&self, _source: &str, _items: usize, _degraded: bool) {}
}
