//! In-flight instruction window.
//!
//! This module reads and classifies the simulator's window. It provides:
//! 1. **Op View:** Typed snapshots of in-flight ops and the scheduling-state enum.
//! 2. **Walker:** One linear pass that produces a [`WindowCensus`] relative to a pivot op.

/// In-flight op view and state decoding.
pub mod op;

/// Window walker and census.
pub mod walker;

pub use op::{BranchOracle, MicroOp, MispredKind, OpState};
pub use walker::{WindowCensus, WindowIter, WindowWalker};
