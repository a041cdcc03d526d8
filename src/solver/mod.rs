//! # Exact TSP
//!
//! Held–Karp subset DP over one space's checkpoints, anchored at a portal.
//! The anchor is the walk's fixed start; a circuit returns to it, an open
//! path ends wherever is cheapest.
//!
//! Cost is O(2^M · M²) time and O(2^M · M) memory for M points including
//! the anchor. The composer keeps M small by decomposing along the space
//! tree; point sets above [`MAX_POINTS`] are rejected up front instead of
//! attempting the allocation.

use crate::model::{Checkpoint, Route};
use crate::{Error, Result};

/// Hard ceiling on points per solve, anchor included. 2^24 DP rows of 25
/// entries is already multi-gigabyte; anything larger is a caller bug.
pub const MAX_POINTS: usize = 25;

/// Predecessor sentinel for unreached DP entries.
const NO_PREV: u8 = u8::MAX;

/// Solve one space's tour.
///
/// The anchor is prepended to `points` as index 0. A portal anchor is
/// moved to the local origin first (the doorway IS the space's origin in
/// its own frame); a non-portal anchor keeps its coordinates, which is how
/// the root route starts from the patrol's actual initial position.
pub fn solve(points: Vec<Checkpoint>, anchor: Checkpoint, circuit: bool) -> Result<Route> {
    let total = points.len() + 1;
    if total > MAX_POINTS {
        return Err(Error::SolverLimit {
            len: total,
            max: MAX_POINTS,
        });
    }

    let mut anchor = anchor;
    if anchor.is_portal {
        anchor.rx = 0.0;
        anchor.ry = 0.0;
    }

    let mut cps = Vec::with_capacity(total);
    cps.push(anchor);
    cps.extend(points);
    let n = cps.len();

    if cps
        .iter()
        .any(|cp| !cp.rx.is_finite() || !cp.ry.is_finite())
    {
        return Err(Error::InvalidParameter(
            "checkpoint coordinates must be finite".to_string(),
        ));
    }

    // Nothing to tour: the walk is standing at the anchor.
    if n == 1 {
        return Ok(Route::new(cps, 0.0));
    }

    let dist: Vec<Vec<f64>> = cps
        .iter()
        .map(|a| cps.iter().map(|b| a.distance_to(b)).collect())
        .collect();

    // dp over subsets that contain the anchor bit. Only odd sets exist, so
    // the slab is indexed by (set >> 1) — half the rows of the naive table.
    let full: usize = (1 << n) - 1;
    let rows: usize = 1 << (n - 1);
    let at = |set: usize, j: usize| (set >> 1) * n + j;

    let mut cost = vec![f64::INFINITY; rows * n];
    let mut prev = vec![NO_PREV; rows * n];
    cost[at(1, 0)] = 0.0;

    for set in (1..=full).step_by(2) {
        for j in 1..n {
            if set & (1 << j) != 0 {
                continue;
            }
            let next = set | (1 << j);
            for k in 0..n {
                if set & (1 << k) == 0 {
                    continue;
                }
                let cand = cost[at(set, k)] + dist[j][k];
                if cand < cost[at(next, j)] {
                    cost[at(next, j)] = cand;
                    prev[at(next, j)] = k as u8;
                }
            }
        }
    }

    // Pick the terminal node of the cheapest full tour.
    let mut best = f64::INFINITY;
    let mut tb_next = 0usize;
    for j in 1..n {
        let tour = if circuit {
            cost[at(full, j)] + dist[j][0]
        } else {
            cost[at(full, j)]
        };
        if tour < best {
            best = tour;
            tb_next = j;
        }
    }

    // Walk predecessors back to the anchor, building the sequence in
    // reverse. A circuit gets the anchor on both ends.
    let mut seq: Vec<Checkpoint> = Vec::with_capacity(n + 1);
    if circuit {
        seq.push(cps[0].clone());
    }
    seq.push(cps[tb_next].clone());
    let mut tb_set = full;
    let mut tb_prev = prev[at(full, tb_next)] as usize;
    while tb_prev != 0 {
        seq.push(cps[tb_prev].clone());
        tb_set &= !(1 << tb_next);
        tb_next = tb_prev;
        tb_prev = prev[at(tb_set, tb_prev)] as usize;
    }
    seq.push(cps[0].clone());
    seq.reverse();

    Ok(Route::new(seq, best))
}

// ============================================================================
// Tests
// ============================================================================
