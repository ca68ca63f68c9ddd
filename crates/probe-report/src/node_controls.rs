//! Per-node control validity.
//!
//! `NodeControls` records which controls from the catalog currently apply to
//! one node, stamped with the time the probe last set them. It is immutable:
//! `add` and `merge` return new records.
//!
//! Merge is last-writer-wins over the whole record. Identifier sets are never
//! unioned across records; a newer record replaces an older one entirely, so a
//! control a probe stops advertising disappears once its newer report lands.

use probe_core::semilattice::{Bottom, Commutative, CvState, JoinSemilattice};
use probe_core::{PhysicalClock, PhysicalTime, StringSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Timestamped set of control ids valid for one node.
///
/// A `None` timestamp means the record was never set. It orders before every
/// real timestamp, so any set record supersedes it on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeControls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<PhysicalTime>,
    #[serde(default, skip_serializing_if = "StringSet::is_empty")]
    controls: StringSet,
}

impl NodeControls {
    /// Unset record with no controls
    pub fn new() -> Self {
        Self {
            timestamp: None,
            controls: StringSet::new(),
        }
    }

    /// Record set at `timestamp` holding `ids`
    pub fn with_timestamp<I, S>(timestamp: PhysicalTime, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            timestamp: Some(timestamp),
            controls: ids.into_iter().collect(),
        }
    }

    /// Returns the record unchanged; the type is immutable
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns whichever of `self` and `other` was set later, in full.
    ///
    /// Equal timestamps (including two unset records) resolve to the record
    /// with the lexicographically greater control set, so `a.merge(&b)` and
    /// `b.merge(&a)` always agree.
    pub fn merge(&self, other: &Self) -> Self {
        let winner = match self.timestamp.cmp(&other.timestamp) {
            Ordering::Less => other,
            Ordering::Greater => self,
            Ordering::Equal => {
                if other.controls > self.controls {
                    trace!(timestamp = ?self.timestamp, "equal timestamps, greater set wins");
                    other
                } else {
                    self
                }
            }
        };
        winner.clone()
    }

    /// Returns a record stamped now whose set is the current set plus `ids`.
    ///
    /// The new timestamp never goes backwards: if the clock reads earlier than
    /// the current timestamp, the current timestamp is kept.
    pub fn add<C, I, S>(&self, clock: &C, ids: I) -> Self
    where
        C: PhysicalClock + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = clock.physical_time();
        let timestamp = match self.timestamp {
            Some(previous) if now.is_before(&previous) => {
                debug!(%now, %previous, "clock behind record timestamp, keeping previous");
                previous
            }
            _ => now,
        };

        Self {
            timestamp: Some(timestamp),
            controls: self.controls.add(ids),
        }
    }

    /// Time the record was last set, `None` if never set
    pub fn timestamp(&self) -> Option<PhysicalTime> {
        self.timestamp
    }

    /// Whether the record has been set
    pub fn is_set(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Control ids valid for the node
    pub fn controls(&self) -> &StringSet {
        &self.controls
    }

    /// Whether control `id` is valid for the node
    pub fn contains(&self, id: &str) -> bool {
        self.controls.contains(id)
    }
}

impl JoinSemilattice for NodeControls {
    fn join(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Bottom for NodeControls {
    fn bottom() -> Self {
        Self::new()
    }
}

impl CvState for NodeControls {}

impl Commutative for NodeControls {}
