//! Control descriptors and the control catalog.
//!
//! A `Control` describes an RPC a probe can perform on a node (stop,
//! restart, attach, ...). It only carries display metadata; the action itself
//! lives elsewhere.

use probe_core::semilattice::{Bottom, CvState, JoinSemilattice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Descriptor of a remote action available on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Control {
    /// Identifier, unique within a catalog
    pub id: String,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub human: String,
    /// Icon reference from the UI's icon set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// Display ordering hint
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rank: i64,
}

fn is_zero(rank: &i64) -> bool {
    *rank == 0
}

impl Control {
    /// Create a control descriptor
    pub fn new(
        id: impl Into<String>,
        human: impl Into<String>,
        icon: impl Into<String>,
        rank: i64,
    ) -> Self {
        Self {
            id: id.into(),
            human: human.into(),
            icon: icon.into(),
            rank,
        }
    }
}

/// Catalog of controls keyed by id.
///
/// Immutable once published: `merge` returns a fresh catalog and neither
/// input is touched. Use [`ControlsBuilder`] to assemble a catalog locally.
///
/// Merging is right-biased and not [`Commutative`](probe_core::Commutative):
/// when two catalogs describe the same id differently, the one passed later
/// (as `other`, or later in `join_all`) wins.
///
/// Invariant: every key equals the `id` of the control it maps to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Control>", into = "BTreeMap<String, Control>")]
pub struct Controls {
    entries: BTreeMap<String, Control>,
}

impl From<BTreeMap<String, Control>> for Controls {
    // Decoded maps are re-keyed by control id so a mismatched key cannot
    // break the catalog invariant. If several keys carry controls with the
    // same id, the one under the greatest key wins.
    fn from(map: BTreeMap<String, Control>) -> Self {
        let mut entries = BTreeMap::new();
        for (key, control) in map {
            if key != control.id {
                trace!(key = %key, id = %control.id, "re-keying control by id");
            }
            if let Some(previous) = entries.insert(control.id.clone(), control) {
                debug!(
                    key = %key,
                    id = %previous.id,
                    "decoded controls share an id, keeping later key"
                );
            }
        }
        Self { entries }
    }
}

impl From<Controls> for BTreeMap<String, Control> {
    fn from(controls: Controls) -> Self {
        controls.entries
    }
}

impl Controls {
    /// Empty catalog
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Catalog holding `controls`; later duplicates win
    pub fn from_controls(controls: impl IntoIterator<Item = Control>) -> Self {
        let mut builder = ControlsBuilder::new();
        builder.add_controls(controls);
        builder.build()
    }

    /// Independent copy of this catalog
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns `self` with every entry of `other` written over it.
    ///
    /// Right-biased: for ids present in both, `other`'s control wins
    /// unconditionally. Callers encode precedence by passing the newer side
    /// as `other`.
    pub fn merge(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (id, control) in &other.entries {
            if let Some(existing) = result.entries.get(id) {
                if existing != control {
                    trace!(id = %id, "control overwritten by merge");
                }
            }
            result.entries.insert(id.clone(), control.clone());
        }
        result
    }

    /// Re-open this catalog for local construction
    pub fn into_builder(self) -> ControlsBuilder {
        ControlsBuilder::from(self)
    }

    /// Control with the given id
    pub fn get(&self, id: &str) -> Option<&Control> {
        self.entries.get(id)
    }

    /// Whether a control with the given id exists
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of controls
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Controls in id order
    pub fn iter(&self) -> impl Iterator<Item = &Control> + '_ {
        self.entries.values()
    }

    /// Control ids in order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<Control> for Controls {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        Self::from_controls(iter)
    }
}

impl JoinSemilattice for Controls {
    fn join(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Bottom for Controls {
    fn bottom() -> Self {
        Self::new()
    }
}

impl CvState for Controls {}

/// Mutable draft of a [`Controls`] catalog.
///
/// Only for a catalog a probe is assembling itself. Once built and shared,
/// catalogs evolve through `merge` alone.
#[derive(Debug, Clone, Default)]
pub struct ControlsBuilder {
    entries: BTreeMap<String, Control>,
}

impl ControlsBuilder {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `control`, replacing any entry with the same id
    pub fn add_control(&mut self, control: Control) -> &mut Self {
        if let Some(previous) = self.entries.insert(control.id.clone(), control) {
            debug!(id = %previous.id, "replaced control in catalog draft");
        }
        self
    }

    /// Insert every control in order; later duplicates win
    pub fn add_controls(&mut self, controls: impl IntoIterator<Item = Control>) -> &mut Self {
        for control in controls {
            self.add_control(control);
        }
        self
    }

    /// Number of controls in the draft
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the draft is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the draft into a catalog
    pub fn build(self) -> Controls {
        Controls {
            entries: self.entries,
        }
    }
}

impl From<Controls> for ControlsBuilder {
    fn from(controls: Controls) -> Self {
        Self {
            entries: controls.entries,
        }
    }
}
