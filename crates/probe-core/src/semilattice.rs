//! Merge traits for report state
//!
//! Every mergeable field of a report implements these traits so the
//! report-combination layer can fold any number of partial reports with a
//! single operation, independent of the field's concrete merge rule.
//!
//! All joins are idempotent and associative for a fixed operand order.
//! Commutativity is promised per type through [`Commutative`]; a join without
//! it is right-biased, so the order operands are given in sets precedence.

/// A type with an idempotent join (⊔) that is associative for a fixed
/// left-to-right operand order.
///
/// `join` never mutates either operand; it returns a freshly owned value.
/// Types that also implement [`Commutative`] ignore operand order.
pub trait JoinSemilattice: Clone {
    /// Join of `self` and `other`; on conflicts without a commutative rule,
    /// `other` wins.
    fn join(&self, other: &Self) -> Self;

    /// Join `other` into `self` in place.
    fn join_assign(&mut self, other: &Self) {
        *self = self.join(other);
    }
}

/// The identity element of a join: `bottom() ⊔ a = a`.
pub trait Bottom {
    /// Returns the bottom element.
    fn bottom() -> Self;
}

/// Convergent (state-based) replicated state.
pub trait CvState: JoinSemilattice + Bottom {}

/// Marker for joins where `a ⊔ b = b ⊔ a`.
///
/// Only these types converge to the same value whatever order replicas are
/// combined in.
pub trait Commutative: JoinSemilattice {}

/// Fold `states` into one value starting from `bottom()`.
///
/// States are joined left to right, so for types that are not
/// [`Commutative`] later states take precedence over earlier ones.
pub fn join_all<'a, S, I>(states: I) -> S
where
    S: CvState + 'a,
    I: IntoIterator<Item = &'a S>,
{
    states
        .into_iter()
        .fold(S::bottom(), |acc, state| acc.join(state))
}
