//! Elapsed-time tracking for study sessions.
//!
//! # Invariants
//! - Clock reads go through `Clock`; nothing here touches wall time directly.

pub mod clock;
pub mod stopwatch;
