//! Tree edit distance
//!
//! Zhang–Shasha edit distance between two ordered labeled trees. Each
//! tree is first annotated with post-order indices, leftmost-leaf
//! descendants, and keyroots (see [`crate::tree`]); forest-distance
//! tables are then filled per keyroot pair in ascending post-order,
//! memoizing whole-subtree distances by node-index pairs.
//!
//! Time is O(n1·n2·min(depth1, leaves1)·min(depth2, leaves2)), memo
//! space O(n1·n2).

use crate::cost::{CostError, CostPolicy, EditKind, EditOp, checked, normalized};
use crate::tree::{Annotation, Tree, annotate};

/// Edit distance between two ordered trees under `policy`
///
/// Either argument may be the empty tree; the distance to an empty tree
/// is the summed per-node delete (or insert) cost. With `normalize` set
/// the raw cost is mapped to `raw / (size_left + size_right + raw)`.
pub fn tree_edit_distance<T, P>(
    left: &Tree<T>,
    right: &Tree<T>,
    policy: &P,
    normalize: bool,
) -> Result<f64, CostError>
where
    P: CostPolicy<T>,
{
    let (raw, _) = zhang_shasha(left, right, policy, false)?;
    Ok(if normalize {
        normalized(raw, left.len() + right.len())
    } else {
        raw
    })
}

/// Edit distance plus a minimal edit script
///
/// Operation positions are post-order node indices. The script is a
/// minimal multiset presented deterministically, sorted ascending by
/// position; ties between equal-cost scripts are resolved with the same
/// precedence as the sequence engine (substitute over delete over
/// insert, zero-cost relabels silent).
pub fn tree_edits<T, P>(
    left: &Tree<T>,
    right: &Tree<T>,
    policy: &P,
) -> Result<(f64, Vec<EditOp>), CostError>
where
    P: CostPolicy<T>,
{
    let (raw, ops) = zhang_shasha(left, right, policy, true)?;
    let mut ops = ops.unwrap_or_default();
    ops.sort_by_key(op_key);
    Ok((raw, ops))
}

fn op_key(op: &EditOp) -> (usize, usize, u8) {
    match *op {
        EditOp::Delete(i) => (i, i, 0),
        EditOp::Insert(j) => (j, j, 1),
        EditOp::Substitute(i, j) => (i, j, 2),
        EditOp::Transpose(i, j) => (i, j, 3),
    }
}

fn zhang_shasha<T, P>(
    left: &Tree<T>,
    right: &Tree<T>,
    policy: &P,
    track: bool,
) -> Result<(f64, Option<Vec<EditOp>>), CostError>
where
    P: CostPolicy<T>,
{
    let n1 = left.len();
    let n2 = right.len();
    let a1 = annotate(left);
    let a2 = annotate(right);

    // per-node delete/insert costs by post-order index
    let mut del = Vec::with_capacity(n1);
    for p in 0..n1 {
        let payload = &left.nodes[a1.post[p]].payload;
        del.push(checked(
            policy.cost(EditKind::Delete, Some(payload), None),
            EditKind::Delete,
        )?);
    }
    let mut ins = Vec::with_capacity(n2);
    for p in 0..n2 {
        let payload = &right.nodes[a2.post[p]].payload;
        ins.push(checked(
            policy.cost(EditKind::Insert, None, Some(payload)),
            EditKind::Insert,
        )?);
    }

    if n1 == 0 {
        let total = ins.iter().sum();
        let ops = track.then(|| (0..n2).map(EditOp::Insert).collect());
        return Ok((total, ops));
    }
    if n2 == 0 {
        let total = del.iter().sum();
        let ops = track.then(|| (0..n1).map(EditOp::Delete).collect());
        return Ok((total, ops));
    }

    let mut td = vec![vec![0.0f64; n2]; n1];
    let mut td_ops: Option<Vec<Vec<Vec<EditOp>>>> =
        track.then(|| vec![vec![Vec::new(); n2]; n1]);

    for &k1 in &a1.keyroots {
        for &k2 in &a2.keyroots {
            forest_pass(
                left, right, &a1, &a2, &del, &ins, k1, k2, policy, &mut td, &mut td_ops,
            )?;
        }
    }

    let raw = td[n1 - 1][n2 - 1];
    let ops = td_ops.map(|t| t[n1 - 1][n2 - 1].clone());
    Ok((raw, ops))
}

/// Fill the forest-distance table for one keyroot pair, recording
/// whole-subtree distances (and scripts, when tracked) into the memo
#[allow(clippy::too_many_arguments)]
fn forest_pass<T, P>(
    left: &Tree<T>,
    right: &Tree<T>,
    a1: &Annotation,
    a2: &Annotation,
    del: &[f64],
    ins: &[f64],
    k1: usize,
    k2: usize,
    policy: &P,
    td: &mut [Vec<f64>],
    td_ops: &mut Option<Vec<Vec<Vec<EditOp>>>>,
) -> Result<(), CostError>
where
    P: CostPolicy<T>,
{
    let l1 = a1.lld[k1];
    let l2 = a2.lld[k2];
    let rows = k1 - l1 + 1;
    let cols = k2 - l2 + 1;

    let mut fd = vec![vec![0.0f64; cols + 1]; rows + 1];
    let mut fd_ops: Option<Vec<Vec<Vec<EditOp>>>> =
        td_ops.is_some().then(|| vec![vec![Vec::new(); cols + 1]; rows + 1]);

    for di in 1..=rows {
        fd[di][0] = fd[di - 1][0] + del[l1 + di - 1];
        if let Some(f) = &mut fd_ops {
            let mut ops = f[di - 1][0].clone();
            ops.push(EditOp::Delete(l1 + di - 1));
            f[di][0] = ops;
        }
    }
    for dj in 1..=cols {
        fd[0][dj] = fd[0][dj - 1] + ins[l2 + dj - 1];
        if let Some(f) = &mut fd_ops {
            let mut ops = f[0][dj - 1].clone();
            ops.push(EditOp::Insert(l2 + dj - 1));
            f[0][dj] = ops;
        }
    }

    for di in 1..=rows {
        let i = l1 + di - 1;
        for dj in 1..=cols {
            let j = l2 + dj - 1;
            let del_cand = fd[di - 1][dj] + del[i];
            let ins_cand = fd[di][dj - 1] + ins[j];

            if a1.lld[i] == l1 && a2.lld[j] == l2 {
                // both forest prefixes are whole subtrees
                let sub = checked(
                    policy.cost(
                        EditKind::Substitute,
                        Some(&left.nodes[a1.post[i]].payload),
                        Some(&right.nodes[a2.post[j]].payload),
                    ),
                    EditKind::Substitute,
                )?;
                let diag = fd[di - 1][dj - 1] + sub;
                let best = diag.min(del_cand).min(ins_cand);
                fd[di][dj] = best;
                td[i][j] = best;
                if let Some(f) = &mut fd_ops {
                    let ops = if diag == best {
                        let mut ops = f[di - 1][dj - 1].clone();
                        if sub > 0.0 {
                            ops.push(EditOp::Substitute(i, j));
                        }
                        ops
                    } else if del_cand == best {
                        let mut ops = f[di - 1][dj].clone();
                        ops.push(EditOp::Delete(i));
                        ops
                    } else {
                        let mut ops = f[di][dj - 1].clone();
                        ops.push(EditOp::Insert(j));
                        ops
                    };
                    if let Some(t) = td_ops {
                        t[i][j] = ops.clone();
                    }
                    f[di][dj] = ops;
                }
            } else {
                // splice in the memoized whole-subtree distance
                let pi = a1.lld[i] - l1;
                let pj = a2.lld[j] - l2;
                let tree_cand = fd[pi][pj] + td[i][j];
                let best = tree_cand.min(del_cand).min(ins_cand);
                fd[di][dj] = best;
                if let Some(f) = &mut fd_ops {
                    let ops = if tree_cand == best {
                        let mut ops = f[pi][pj].clone();
                        if let Some(t) = td_ops {
                            ops.extend(t[i][j].iter().copied());
                        }
                        ops
                    } else if del_cand == best {
                        let mut ops = f[di - 1][dj].clone();
                        ops.push(EditOp::Delete(i));
                        ops
                    } else {
                        let mut ops = f[di][dj - 1].clone();
                        ops.push(EditOp::Insert(j));
                        ops
                    };
                    f[di][dj] = ops;
                }
            }
        }
    }
    Ok(())
}
