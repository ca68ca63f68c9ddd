//! Report-level aggregates of control state
//!
//! A report carries one catalog plus a `NodeControls` record per node. Both
//! aggregates here are `CvState`, so the report layer can combine partial
//! reports from many probes with `join_all`. Node records converge in any
//! order; the catalog does not, so reports must be folded oldest first for
//! the newest control descriptors to win.

use crate::controls::Controls;
use crate::node_controls::NodeControls;
use probe_core::semilattice::{Bottom, Commutative, CvState, JoinSemilattice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `NodeControls` keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeControlsMap(BTreeMap<String, NodeControls>);

impl NodeControlsMap {
    /// Empty map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the map with `node_controls` stored under `node_id`
    pub fn insert(mut self, node_id: impl Into<String>, node_controls: NodeControls) -> Self {
        self.0.insert(node_id.into(), node_controls);
        self
    }

    /// Union of node ids; records present on both sides are merged
    pub fn merge(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (node_id, theirs) in &other.0 {
            let merged = match result.0.get(node_id) {
                Some(ours) => ours.merge(theirs),
                None => theirs.clone(),
            };
            result.0.insert(node_id.clone(), merged);
        }
        result
    }

    /// Record for `node_id`
    pub fn get(&self, node_id: &str) -> Option<&NodeControls> {
        self.0.get(node_id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node ids and records in node id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeControls)> + '_ {
        self.0.iter().map(|(id, nc)| (id.as_str(), nc))
    }
}

impl JoinSemilattice for NodeControlsMap {
    fn join(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Bottom for NodeControlsMap {
    fn bottom() -> Self {
        Self::new()
    }
}

impl CvState for NodeControlsMap {}

impl Commutative for NodeControlsMap {}

/// Control state of one report: the catalog and per-node validity.
///
/// Not [`Commutative`]: the catalog half of the join is right-biased, so the
/// report passed later wins on control ids both sides describe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportControls {
    /// Catalog of controls known to the reporting probe(s)
    #[serde(default, skip_serializing_if = "Controls::is_empty")]
    pub controls: Controls,
    /// Per-node control validity
    #[serde(default, skip_serializing_if = "NodeControlsMap::is_empty")]
    pub node_controls: NodeControlsMap,
}

impl ReportControls {
    /// Report state from its catalog and node records
    pub fn new(controls: Controls, node_controls: NodeControlsMap) -> Self {
        Self {
            controls,
            node_controls,
        }
    }

    /// Field-wise merge; `other`'s catalog entries win on id clashes
    pub fn merge(&self, other: &Self) -> Self {
        self.join(other)
    }
}

impl JoinSemilattice for ReportControls {
    fn join(&self, other: &Self) -> Self {
        Self {
            controls: self.controls.join(&other.controls),
            node_controls: self.node_controls.join(&other.node_controls),
        }
    }
}

impl Bottom for ReportControls {
    fn bottom() -> Self {
        Self::default()
    }
}

impl CvState for ReportControls {}
