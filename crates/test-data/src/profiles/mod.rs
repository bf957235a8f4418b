//! Ready-made profile documents for scenarios and tests.
//!
//! Presets produce raw [`AthleteProfile`](forecast::AthleteProfile) and
//! [`CourseProfile`](forecast::CourseProfile) documents, so callers can tweak
//! any field before resolving them the same way a file on disk would be.

mod athlete;
mod course;

pub use athlete::AthletePreset;
pub use course::CoursePreset;
