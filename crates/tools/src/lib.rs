//! Developer tooling: orientation inspector and summaries.
//!
//! # Invariants
//! - Inspection is read-only.

mod inspector;

pub use inspector::{OrientationInspector, OrientationSummary};

pub fn crate_info() -> &'static str {
    "gyrocam-tools v0.1.0"
}
