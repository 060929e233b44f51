//! Shared orientation types for the gyrocam workspace.
//!
//! # Invariants
//! - All rotation math is done in f64.
//! - An `Orientable` owns exactly one rotation, overwritten wholesale by its controller.

pub mod types;

pub use types::{Orientable, OrientedObject, ParseRotationOrderError, RotationOrder};
