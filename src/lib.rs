//! Treediff: approximate comparison of linguistic annotations
//!
//! Edit distances between annotated token sequences, ordered dependency
//! trees, and feature sets, plus a nearest-neighbor search built on the
//! sequence engine. Typical uses are scoring automatic annotation
//! against a gold reference and retrieving similar corpus items.
//!
//! All engines are pure, synchronous functions of their inputs,
//! parameterized by a pluggable [`CostPolicy`]; they allocate only
//! transient DP tables and share no state, so independent calls can be
//! distributed across threads freely.

pub mod cost; // Operation vocabulary and cost policies
pub mod feats; // Feature-set parsing and per-key edit distance
pub mod knn; // Nearest-neighbor search over the sequence engine
pub mod sequence; // Levenshtein / Damerau sequence edit distance
pub mod tree; // Arena trees and post-order annotation
pub mod tree_edit; // Zhang-Shasha tree edit distance

// Re-exports for convenience
pub use cost::{CostError, CostPolicy, EditKind, EditOp, unit_cost};
pub use feats::{FeatOp, Features, FeatsParseError, dict_edit_distance, dict_edits};
pub use knn::{SearchError, k_nearest_indices, k_nearest_neighbors};
pub use sequence::{levenshtein_distance, levenshtein_edits};
pub use tree::{NodeId, Tree};
pub use tree_edit::{tree_edit_distance, tree_edits};
