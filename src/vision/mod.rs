//! Visual localization of the target icon
//!
//! This module provides the icon localization engine:
//! - Canny edge maps for both the template and each frame
//! - Template correlation across a fixed scale sweep
//! - Greedy deduplication of nearby hits into candidates
//! - Anchor tracking across repeated scans
//! - Diagnostic overlays of what was detected

pub mod annotate;
pub mod dedup;
pub mod edges;
pub mod matcher;
pub mod session;
pub mod template;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types and functions
pub use annotate::Annotator;
pub use dedup::{dedup_matches, nearest_to};
pub use edges::{EdgeDetector, Frame};
pub use matcher::MultiScaleMatcher;
pub use session::{LocalizationSession, ScanReport};
pub use template::{ScaledTemplate, TemplateError, TemplateSet, scale_factors};
pub use types::{Anchor, Candidate, RawMatch};
