//! Reasoning about hidden hands from the public record.
//!
//! - `voids`: suits each seat has shown out of.
//! - `redistribute`: sampling opponent hands that agree with those voids.

pub mod redistribute;
pub mod voids;

pub use redistribute::{DeterminizeError, DeterminizedDeal, Determinizer};
pub use voids::{SuitMask, infer_voids};
