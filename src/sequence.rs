//! Sequence edit distance
//!
//! Levenshtein distance between two ordered sequences of opaque items,
//! with optional Damerau transpositions, optional normalization into
//! [0, 1], and minimal edit-script reconstruction. Items are compared
//! only through the caller-supplied [`CostPolicy`] (plus item equality
//! for the transposition applicability test).

use crate::cost::{CostError, CostPolicy, EditKind, EditOp, checked, normalized};

/// Edit distance between `left` and `right` under `policy`
///
/// With `damerau` set, an adjacent swap counts as a single transposition.
/// With `normalize` set, the raw cost is mapped to
/// `raw / (n + m + raw)`, which is 0 only for identical (or both-empty)
/// inputs and approaches 1 as the inputs diverge.
///
/// Runs in O(n·m) time and O(min(n, m)) space (rolling rows, plus one
/// extra retained row when `damerau` is set).
pub fn levenshtein_distance<T, P>(
    left: &[T],
    right: &[T],
    policy: &P,
    damerau: bool,
    normalize: bool,
) -> Result<f64, CostError>
where
    T: PartialEq,
    P: CostPolicy<T>,
{
    // Keep the shorter sequence on the column axis; Flip swaps the
    // delete/insert roles so the policy still sees the original sides.
    let raw = if left.len() < right.len() {
        scan(right, left, &Flip(policy), damerau)?
    } else {
        scan(left, right, policy, damerau)?
    };
    Ok(if normalize {
        normalized(raw, left.len() + right.len())
    } else {
        raw
    })
}

/// Edit distance plus a minimal edit script
///
/// Returns the raw (unnormalized) cost together with the operations of
/// one minimal-cost alignment, in ascending position order. Zero-cost
/// diagonal steps (matches) are not reported, so the costs of the
/// returned operations sum to the returned distance.
///
/// Ties between equal-cost alignments are resolved by a fixed
/// precedence, checked at every backtrace step in this order:
/// transpose, substitute, delete, insert, match.
pub fn levenshtein_edits<T, P>(
    left: &[T],
    right: &[T],
    policy: &P,
    damerau: bool,
) -> Result<(f64, Vec<EditOp>), CostError>
where
    T: PartialEq,
    P: CostPolicy<T>,
{
    let n = left.len();
    let m = right.len();
    let mut d = vec![vec![0.0f64; m + 1]; n + 1];

    for i in 1..=n {
        let del = checked(
            policy.cost(EditKind::Delete, Some(&left[i - 1]), None),
            EditKind::Delete,
        )?;
        d[i][0] = d[i - 1][0] + del;
    }
    for j in 1..=m {
        let ins = checked(
            policy.cost(EditKind::Insert, None, Some(&right[j - 1])),
            EditKind::Insert,
        )?;
        d[0][j] = d[0][j - 1] + ins;
    }

    for i in 1..=n {
        let del = checked(
            policy.cost(EditKind::Delete, Some(&left[i - 1]), None),
            EditKind::Delete,
        )?;
        for j in 1..=m {
            let ins = checked(
                policy.cost(EditKind::Insert, None, Some(&right[j - 1])),
                EditKind::Insert,
            )?;
            let sub = checked(
                policy.cost(EditKind::Substitute, Some(&left[i - 1]), Some(&right[j - 1])),
                EditKind::Substitute,
            )?;
            let mut best = (d[i - 1][j - 1] + sub)
                .min(d[i - 1][j] + del)
                .min(d[i][j - 1] + ins);
            if damerau && i >= 2 && j >= 2 && transposable(left, right, i, j) {
                let trn = checked(
                    policy.cost(EditKind::Transpose, Some(&left[i - 2]), Some(&right[j - 2])),
                    EditKind::Transpose,
                )?;
                best = best.min(d[i - 2][j - 2] + trn);
            }
            d[i][j] = best;
        }
    }

    let ops = backtrace(left, right, policy, damerau, &d)?;
    Ok((d[n][m], ops))
}

/// Adjacent-swap applicability test for the Damerau variant
fn transposable<T: PartialEq>(left: &[T], right: &[T], i: usize, j: usize) -> bool {
    left[i - 1] == right[j - 2] && left[i - 2] == right[j - 1]
}

/// Reconstruct one minimal-cost path from (n, m) back to (0, 0)
///
/// Candidate re-evaluation repeats the exact arithmetic of the fill, so
/// equality tests against the stored table are exact.
fn backtrace<T, P>(
    left: &[T],
    right: &[T],
    policy: &P,
    damerau: bool,
    d: &[Vec<f64>],
) -> Result<Vec<EditOp>, CostError>
where
    T: PartialEq,
    P: CostPolicy<T>,
{
    let mut ops = Vec::new();
    let mut i = left.len();
    let mut j = right.len();
    while i > 0 || j > 0 {
        if damerau && i >= 2 && j >= 2 && transposable(left, right, i, j) {
            let trn = checked(
                policy.cost(EditKind::Transpose, Some(&left[i - 2]), Some(&right[j - 2])),
                EditKind::Transpose,
            )?;
            if d[i][j] == d[i - 2][j - 2] + trn {
                ops.push(EditOp::Transpose(i - 2, j - 2));
                i -= 2;
                j -= 2;
                continue;
            }
        }
        if i > 0 && j > 0 {
            let sub = checked(
                policy.cost(EditKind::Substitute, Some(&left[i - 1]), Some(&right[j - 1])),
                EditKind::Substitute,
            )?;
            if sub > 0.0 && d[i][j] == d[i - 1][j - 1] + sub {
                ops.push(EditOp::Substitute(i - 1, j - 1));
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 {
            let del = checked(
                policy.cost(EditKind::Delete, Some(&left[i - 1]), None),
                EditKind::Delete,
            )?;
            if d[i][j] == d[i - 1][j] + del {
                ops.push(EditOp::Delete(i - 1));
                i -= 1;
                continue;
            }
        }
        if j > 0 {
            let ins = checked(
                policy.cost(EditKind::Insert, None, Some(&right[j - 1])),
                EditKind::Insert,
            )?;
            if d[i][j] == d[i][j - 1] + ins {
                ops.push(EditOp::Insert(j - 1));
                j -= 1;
                continue;
            }
        }
        // zero-cost diagonal match
        debug_assert!(i > 0 && j > 0);
        i -= 1;
        j -= 1;
    }
    ops.reverse();
    Ok(ops)
}

/// Scalar-only DP over rolling rows; `cols` must not be longer than `rows`
fn scan<T, P>(rows: &[T], cols: &[T], policy: &P, damerau: bool) -> Result<f64, CostError>
where
    T: PartialEq,
    P: CostPolicy<T>,
{
    let n = rows.len();
    let m = cols.len();

    let mut ins_cost = Vec::with_capacity(m);
    for c in cols {
        ins_cost.push(checked(
            policy.cost(EditKind::Insert, None, Some(c)),
            EditKind::Insert,
        )?);
    }

    let mut prev = vec![0.0f64; m + 1];
    let mut curr = vec![0.0f64; m + 1];
    let mut prev2 = if damerau { Some(vec![0.0f64; m + 1]) } else { None };

    for j in 1..=m {
        prev[j] = prev[j - 1] + ins_cost[j - 1];
    }

    for i in 1..=n {
        let del = checked(
            policy.cost(EditKind::Delete, Some(&rows[i - 1]), None),
            EditKind::Delete,
        )?;
        curr[0] = prev[0] + del;
        for j in 1..=m {
            let sub = checked(
                policy.cost(EditKind::Substitute, Some(&rows[i - 1]), Some(&cols[j - 1])),
                EditKind::Substitute,
            )?;
            let mut best = (prev[j - 1] + sub)
                .min(prev[j] + del)
                .min(curr[j - 1] + ins_cost[j - 1]);
            if let Some(p2) = &prev2 {
                if i >= 2 && j >= 2 && transposable(rows, cols, i, j) {
                    let trn = checked(
                        policy.cost(EditKind::Transpose, Some(&rows[i - 2]), Some(&cols[j - 2])),
                        EditKind::Transpose,
                    )?;
                    best = best.min(p2[j - 2] + trn);
                }
            }
            curr[j] = best;
        }
        if let Some(p2) = &mut prev2 {
            std::mem::swap(p2, &mut prev);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    Ok(prev[m])
}

/// Swaps the two sides of a policy so a transposed DP table still
/// charges deletions to the left sequence and insertions to the right
struct Flip<'p, P>(&'p P);

impl<T, P: CostPolicy<T>> CostPolicy<T> for Flip<'_, P> {
    fn cost(&self, kind: EditKind, left: Option<&T>, right: Option<&T>) -> f64 {
        match kind {
            EditKind::Delete => self.0.cost(EditKind::Insert, right, left),
            EditKind::Insert => self.0.cost(EditKind::Delete, right, left),
            _ => self.0.cost(kind, right, left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::unit_cost;

    fn seq(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn dist(a: &str, b: &str) -> f64 {
        levenshtein_distance(&seq(a), &seq(b), &unit_cost, false, false).unwrap()
    }

    fn edits(a: &str, b: &str, damerau: bool) -> (f64, Vec<EditOp>) {
        levenshtein_edits(&seq(a), &seq(b), &unit_cost, damerau).unwrap()
    }

    #[test]
    fn test_distance() {
        assert_eq!(dist("abcabc", "abcabc"), 0.0);
        assert_eq!(dist("", ""), 0.0);
        assert_eq!(dist("abcabc", ""), 6.0);
        assert_eq!(dist("", "abcabc"), 6.0);
        assert_eq!(dist("abcabc", "bcab"), 2.0);
        assert_eq!(dist("abcabc", "abccabc"), 1.0);
        assert_eq!(dist("abccabc", "abcabc"), 1.0);
        assert_eq!(dist("abcabc", "abacbc"), 2.0);
    }

    #[test]
    fn test_damerau_distance() {
        let a = seq("abcabc");
        let b = seq("abacbc");
        let d = levenshtein_distance(&a, &b, &unit_cost, true, false).unwrap();
        assert_eq!(d, 1.0);
        // swap is symmetric
        let d = levenshtein_distance(&b, &a, &unit_cost, true, false).unwrap();
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_symmetry() {
        for (a, b) in [("abcabc", "bcab"), ("kitten", "sitting"), ("", "xyz")] {
            assert_eq!(dist(a, b), dist(b, a));
        }
    }

    #[test]
    fn test_edit_scripts() {
        assert_eq!(edits("abcabc", "abcabc", false).1, vec![]);
        assert_eq!(edits("", "", false).1, vec![]);
        assert_eq!(
            edits("abcabc", "", false).1,
            (0..6).map(EditOp::Delete).collect::<Vec<_>>()
        );
        assert_eq!(
            edits("", "abcabc", false).1,
            (0..6).map(EditOp::Insert).collect::<Vec<_>>()
        );
        assert_eq!(edits("abcabc", "abccabc", false).1, vec![EditOp::Insert(3)]);
        assert_eq!(edits("abccabc", "abcabc", false).1, vec![EditOp::Delete(3)]);
        assert_eq!(
            edits("abcabc", "abacbca", false).1,
            vec![
                EditOp::Substitute(2, 2),
                EditOp::Substitute(3, 3),
                EditOp::Insert(6)
            ]
        );
    }

    #[test]
    fn test_damerau_edit_script() {
        let (cost, ops) = levenshtein_edits(&seq("abcabc"), &seq("abacbca"), &unit_cost, true).unwrap();
        assert_eq!(cost, 2.0);
        assert_eq!(ops, vec![EditOp::Transpose(2, 2), EditOp::Insert(6)]);
    }

    #[test]
    fn test_edit_script_sums_to_cost() {
        for (a, b) in [("abcabc", "bcab"), ("kitten", "sitting"), ("abc", "cba")] {
            let (cost, ops) = edits(a, b, false);
            assert_eq!(cost, ops.len() as f64);
            assert_eq!(cost, dist(a, b));
        }
    }

    #[test]
    fn test_normalize() {
        let a = seq("abcabc");
        let empty: Vec<char> = vec![];
        let d = levenshtein_distance(&a, &empty, &unit_cost, false, true).unwrap();
        assert_eq!(d, 0.5); // 6 / (6 + 0 + 6)
        let d = levenshtein_distance(&empty, &empty, &unit_cost, false, true).unwrap();
        assert_eq!(d, 0.0);
        let d = levenshtein_distance(&a, &a, &unit_cost, false, true).unwrap();
        assert_eq!(d, 0.0);
        let d = levenshtein_distance(&a, &seq("bcab"), &unit_cost, false, true).unwrap();
        assert!(d > 0.0 && d < 1.0);
    }

    fn double_delete(kind: EditKind, left: Option<&char>, right: Option<&char>) -> f64 {
        match kind {
            EditKind::Delete => 2.0,
            _ => unit_cost(kind, left, right),
        }
    }

    #[test]
    fn test_custom_policy() {
        let a = seq("abc");
        let empty: Vec<char> = vec![];
        let d = levenshtein_distance(&a, &empty, &double_delete, false, false).unwrap();
        assert_eq!(d, 6.0);
        // shorter-left orientation must not confuse delete with insert
        let d = levenshtein_distance(&empty, &a, &double_delete, false, false).unwrap();
        assert_eq!(d, 3.0);
    }

    fn negative(_kind: EditKind, _left: Option<&char>, _right: Option<&char>) -> f64 {
        -1.0
    }

    #[test]
    fn test_negative_cost_rejected() {
        let a = seq("ab");
        let b = seq("ba");
        assert!(levenshtein_distance(&a, &b, &negative, false, false).is_err());
        assert!(levenshtein_edits(&a, &b, &negative, false).is_err());
    }

    fn poisoned(_kind: EditKind, _left: Option<&char>, _right: Option<&char>) -> f64 {
        f64::NAN
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let a = seq("ab");
        let b = seq("ba");
        assert!(matches!(
            levenshtein_distance(&a, &b, &poisoned, false, false),
            Err(CostError::NonFiniteCost { .. })
        ));
        assert!(levenshtein_edits(&a, &b, &poisoned, false).is_err());
    }
}
