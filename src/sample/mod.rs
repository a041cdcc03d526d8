//! # Weighted Sampling
//!
//! Order-sampling without replacement over the site's assets. Every asset
//! gets the key `u^(1/w)` for a fresh uniform `u` in `[0, 1)`; sorting the
//! keys and cutting off at the sample size yields a without-replacement
//! draw whose inclusion odds scale with weight.
//!
//! The sample size is `trunc(rate × (N + 0.5))`, so `rate = 1` always
//! takes everything and a low rate on a small site can legitimately take
//! nothing. Callers decide what an empty draw means; here it is just an
//! empty vector.

use rand::Rng;

use crate::model::Asset;

// ============================================================================
// Key order
// ============================================================================

/// Which end of the sorted key list the sample is cut from.
///
/// `LargestFirst` is the canonical selection: heavier assets produce keys
/// closer to 1 and are kept preferentially. `SmallestFirst` inverts the
/// bias toward light assets; it exists for validating migrations from
/// deployments that shipped with the inverted cut and should not be used
/// for new rollouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    LargestFirst,
    SmallestFirst,
}

// ============================================================================
// Sampling
// ============================================================================

/// Draw a weighted sample, returning distinct indices into `assets`.
///
/// Indices come out in key order, not input order. `rate` is trusted to be
/// in `(0, 1]`; the composer validates it before any draw happens.
pub fn sample_indices<R: Rng>(
    assets: &[Asset],
    rate: f64,
    order: KeyOrder,
    rng: &mut R,
) -> Vec<usize> {
    let n = assets.len();
    let k = (rate * (n as f64 + 0.5)) as usize;
    if n == 0 || k == 0 {
        return Vec::new();
    }

    let mut keyed: Vec<(f64, usize)> = assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let u: f64 = rng.gen_range(0.0..1.0);
            (u.powf(1.0 / asset.weight), i)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let picked = match order {
        KeyOrder::SmallestFirst => &keyed[..k.min(n)],
        KeyOrder::LargestFirst => &keyed[n - k.min(n)..],
    };
    picked.iter().map(|&(_, i)| i).collect()
}

// ============================================================================
// Tests
// ============================================================================
