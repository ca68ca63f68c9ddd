//! Probe Report - control state carried in probe reports
//!
//! Probes describe which remote actions ("controls") they can perform on the
//! nodes they observe. Two pieces of state travel in every report:
//!
//! - `Controls`: the catalog mapping control id to its descriptor
//! - `NodeControls`: the timestamped set of control ids valid for one node
//!
//! Both implement the `probe_core` merge traits so the report layer can fold
//! any number of partial reports with `join`. `NodeControls` merges the same
//! in any order; `Controls` is right-biased, so fold order sets precedence.
//! All merges return new values; the only in-place mutation is
//! `ControlsBuilder`, used while a probe assembles its own catalog before
//! publishing it.

#![forbid(unsafe_code)]

/// Control descriptors and the control catalog
pub mod controls;

/// Per-node control validity
pub mod node_controls;

/// Report-level aggregates of control state
pub mod report;

pub use controls::{Control, Controls, ControlsBuilder};
pub use node_controls::NodeControls;
pub use report::{NodeControlsMap, ReportControls};

pub use probe_core::{
    Bottom, Commutative, CvState, JoinSemilattice, PhysicalClock, PhysicalTime, StringSet,
};
