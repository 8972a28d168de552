//! Nearest-neighbor search over sequence edit distance
//!
//! Ranks a corpus of candidate sequences against a query by raw
//! Levenshtein distance and returns the k best. A bounded max-heap
//! keeps the scan at O(|corpus| · n·m) time and O(k) ranking memory;
//! the (distance, ascending index) tie-break is applied once, after the
//! scan.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::cost::{CostError, CostPolicy};
use crate::sequence::levenshtein_distance;

/// Error during nearest-neighbor search
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("k must be at least 1")]
    InvalidK,
    #[error(transparent)]
    Cost(#[from] CostError),
}

/// The k corpus entries nearest to `query`, as (index, distance) pairs
///
/// Every candidate is scored in original corpus order; the result holds
/// the `min(k, |corpus|)` smallest distances, ordered by distance with
/// ties broken by ascending original index.
pub fn k_nearest_neighbors<T, S, P>(
    query: &[T],
    corpus: &[S],
    k: usize,
    policy: &P,
    damerau: bool,
) -> Result<Vec<(usize, f64)>, SearchError>
where
    T: PartialEq,
    S: AsRef<[T]>,
    P: CostPolicy<T>,
{
    if k == 0 {
        return Err(SearchError::InvalidK);
    }

    let mut heap: BinaryHeap<Entry> = BinaryHeap::with_capacity(k + 1);
    for (index, candidate) in corpus.iter().enumerate() {
        let distance = levenshtein_distance(query, candidate.as_ref(), policy, damerau, false)?;
        heap.push(Entry { distance, index });
        if heap.len() > k {
            // evict the current worst: larger distance, then larger index
            heap.pop();
        }
    }

    let mut nearest: Vec<(usize, f64)> = heap
        .into_iter()
        .map(|e| (e.index, e.distance))
        .collect();
    nearest.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(nearest)
}

/// Like [`k_nearest_neighbors`], but yielding only the ranked indices
pub fn k_nearest_indices<T, S, P>(
    query: &[T],
    corpus: &[S],
    k: usize,
    policy: &P,
    damerau: bool,
) -> Result<Vec<usize>, SearchError>
where
    T: PartialEq,
    S: AsRef<[T]>,
    P: CostPolicy<T>,
{
    let nearest = k_nearest_neighbors(query, corpus, k, policy, damerau)?;
    Ok(nearest.into_iter().map(|(index, _)| index).collect())
}

/// Max-heap entry; the greatest element is the worst candidate kept
struct Entry {
    distance: f64,
    index: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{EditKind, unit_cost};

    fn corpus(items: &[&str]) -> Vec<Vec<char>> {
        items.iter().map(|s| s.chars().collect()).collect()
    }

    #[test]
    fn test_ranking() {
        let query: Vec<char> = "a".chars().collect();
        let corpus = corpus(&["abcd", "abc", "ab", "a", "ba", "bac"]);
        let nearest = k_nearest_neighbors(&query, &corpus, 3, &unit_cost, false).unwrap();
        // exact match first, then the distance-1 tie ordered by index
        assert_eq!(nearest, vec![(3, 0.0), (2, 1.0), (4, 1.0)]);
    }

    #[test]
    fn test_indices_only() {
        let query: Vec<char> = "a".chars().collect();
        let corpus = corpus(&["abcd", "abc", "ab", "a", "ba", "bac"]);
        let indices = k_nearest_indices(&query, &corpus, 3, &unit_cost, false).unwrap();
        assert_eq!(indices, vec![3, 2, 4]);
    }

    #[test]
    fn test_k_larger_than_corpus() {
        let query: Vec<char> = "ab".chars().collect();
        let corpus = corpus(&["ab", "ba"]);
        let nearest = k_nearest_neighbors(&query, &corpus, 10, &unit_cost, false).unwrap();
        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0], (0, 0.0));
    }

    #[test]
    fn test_zero_k_rejected() {
        let query: Vec<char> = "a".chars().collect();
        let corpus = corpus(&["a"]);
        assert_eq!(
            k_nearest_neighbors(&query, &corpus, 0, &unit_cost, false),
            Err(SearchError::InvalidK)
        );
    }

    #[test]
    fn test_empty_corpus() {
        let query: Vec<char> = "a".chars().collect();
        let corpus: Vec<Vec<char>> = vec![];
        let nearest = k_nearest_neighbors(&query, &corpus, 3, &unit_cost, false).unwrap();
        assert!(nearest.is_empty());
    }

    #[test]
    fn test_boundary_ties_keep_lowest_indices() {
        let query: Vec<char> = "a".chars().collect();
        // four candidates all at distance 1; k=2 must keep indices 0 and 1
        let corpus = corpus(&["ab", "ac", "ad", "ae"]);
        let nearest = k_nearest_neighbors(&query, &corpus, 2, &unit_cost, false).unwrap();
        assert_eq!(nearest, vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn test_damerau_changes_ranking() {
        let query: Vec<char> = "ab".chars().collect();
        let corpus = corpus(&["ba", "axb"]);
        let plain = k_nearest_neighbors(&query, &corpus, 1, &unit_cost, false).unwrap();
        assert_eq!(plain, vec![(1, 1.0)]);
        let damerau = k_nearest_neighbors(&query, &corpus, 1, &unit_cost, true).unwrap();
        assert_eq!(damerau, vec![(0, 1.0)]);
    }

    fn negative(_kind: EditKind, _left: Option<&char>, _right: Option<&char>) -> f64 {
        -1.0
    }

    #[test]
    fn test_negative_cost_propagates() {
        let query: Vec<char> = "ab".chars().collect();
        let corpus = corpus(&["ba"]);
        assert!(matches!(
            k_nearest_neighbors(&query, &corpus, 1, &negative, false),
            Err(SearchError::Cost(_))
        ));
    }
}
