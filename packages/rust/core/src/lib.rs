//! Profile composition for firmscope.
//!
//! This crate ties the registry client, document scraper and procurement
//! aggregator together into the caller-facing operations: a required company
//! lookup followed by best-effort enrichment from the optional sources.

pub mod composer;
pub mod progress;

pub use composer::{ComposedProfile, ProfileComposer};
pub use progress::{ProgressReporter, SilentProgress};
