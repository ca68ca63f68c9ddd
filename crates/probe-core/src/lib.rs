//! Probe Core - shared primitives for combining probe reports
//!
//! Independent probes observe the same set of nodes and each produce partial
//! reports. The types in this crate give those reports a common algebra so
//! they can be combined without coordination between producers.
//!
//! # Modules
//!
//! - `semilattice`: `JoinSemilattice`, `Bottom`, `CvState` and `Commutative` traits
//! - `time`: `PhysicalTime` and the injectable `PhysicalClock` source
//! - `string_set`: ordered, copy-on-write set of string identifiers
//! - `errors`: unified `ProbeError`
//! - `serialization`: JSON helpers used by report encoders
//! - `config`: TOML-backed configuration for the ambient pieces (clock)
//!
//! ## Merge laws
//! - Idempotence: `a ⊔ a = a`
//! - Associativity: `(a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)`
//! - Commutativity: `a ⊔ b = b ⊔ a`, only for types marked `Commutative`;
//!   other joins are right-biased and operand order sets precedence

#![forbid(unsafe_code)]

/// Core algebraic traits for mergeable report state
pub mod semilattice;

/// Wall-clock timestamps and clock sources
pub mod time;

/// Ordered identifier sets
pub mod string_set;

/// Unified error handling
pub mod errors;

/// JSON encoding helpers
pub mod serialization;

/// Configuration loading
pub mod config;

pub use config::{ClockConfig, ClockSource, ProbeConfig};
pub use errors::{ProbeError, Result};
pub use semilattice::{join_all, Bottom, Commutative, CvState, JoinSemilattice};
pub use serialization::SerializationError;
pub use string_set::StringSet;
pub use time::{FnClock, ManualClock, PhysicalClock, PhysicalTime, SystemClock};
