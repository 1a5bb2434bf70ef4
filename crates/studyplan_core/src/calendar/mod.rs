//! Calendar generation and text helpers.
//!
//! # Responsibility
//! - Generate the week/day lattice for a new period.
//! - Expand week-relative description templates.
//! - Classify clock times into named day segments.
//!
//! # Invariants
//! - Everything here is pure; no clock reads, no storage.

pub mod builder;
pub mod day_segment;
pub mod template;
