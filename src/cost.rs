//! Edit operations and pluggable cost policies
//!
//! Every distance engine in this crate is parameterized by a cost policy:
//! a callback mapping (operation kind, left operand, right operand) to a
//! non-negative cost. The default [`unit_cost`] charges 1 for every
//! operation except a substitution between equal items, which is free.

use thiserror::Error;

/// The kind of an elementary edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Delete,
    Insert,
    Substitute,
    Transpose,
}

/// An elementary edit operation over positions
///
/// For the sequence engine, positions are 0-based indices into the left
/// and right sequences. For the tree engine, positions are post-order
/// node indices. Delete carries a left position, Insert a right position,
/// Substitute and Transpose one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditOp {
    Delete(usize),
    Insert(usize),
    Substitute(usize, usize),
    Transpose(usize, usize),
}

impl EditOp {
    pub fn kind(&self) -> EditKind {
        match self {
            EditOp::Delete(_) => EditKind::Delete,
            EditOp::Insert(_) => EditKind::Insert,
            EditOp::Substitute(_, _) => EditKind::Substitute,
            EditOp::Transpose(_, _) => EditKind::Transpose,
        }
    }
}

/// Error raised when a cost policy misbehaves
#[derive(Debug, Error, PartialEq)]
pub enum CostError {
    #[error("cost policy returned negative cost {cost} for {kind:?}")]
    NegativeCost { kind: EditKind, cost: f64 },

    #[error("cost policy returned non-finite cost {cost} for {kind:?}")]
    NonFiniteCost { kind: EditKind, cost: f64 },
}

/// A pluggable cost function threaded through every distance engine
///
/// `left` is absent for insertions and `right` is absent for deletions.
/// For transpositions the operands are the first element of each swapped
/// pair. Costs must be non-negative; a negative cost aborts the engine
/// with [`CostError::NegativeCost`].
pub trait CostPolicy<T> {
    fn cost(&self, kind: EditKind, left: Option<&T>, right: Option<&T>) -> f64;
}

impl<T, F> CostPolicy<T> for F
where
    F: Fn(EditKind, Option<&T>, Option<&T>) -> f64,
{
    fn cost(&self, kind: EditKind, left: Option<&T>, right: Option<&T>) -> f64 {
        self(kind, left, right)
    }
}

/// The default policy: unit cost for every operation, except that a
/// substitution between equal items costs nothing
pub fn unit_cost<T: PartialEq>(kind: EditKind, left: Option<&T>, right: Option<&T>) -> f64 {
    match kind {
        EditKind::Substitute if left == right => 0.0,
        _ => 1.0,
    }
}

/// Validate a policy-returned cost before it enters a DP table
///
/// A NaN or infinite cost would silently poison every downstream
/// minimum and comparison, so non-finite values are rejected along
/// with negative ones.
pub(crate) fn checked(cost: f64, kind: EditKind) -> Result<f64, CostError> {
    if !cost.is_finite() {
        Err(CostError::NonFiniteCost { kind, cost })
    } else if cost < 0.0 {
        Err(CostError::NegativeCost { kind, cost })
    } else {
        Ok(cost)
    }
}

/// Normalize a raw distance into [0, 1] against the combined input size
///
/// Zero only for identical inputs; also zero when both inputs are empty.
pub(crate) fn normalized(raw: f64, combined_size: usize) -> f64 {
    if raw == 0.0 {
        0.0
    } else {
        raw / (combined_size as f64 + raw)
    }
}
