//! # Route Composer
//!
//! Turns one request (initial position + sampling rate) into one flat
//! route over the whole site:
//!
//! 1. Freeze the space tree and every asset under the request's root.
//! 2. Draw one weighted sample across all assets, then hand each sampled
//!    asset to its owning space.
//! 3. Walk the arena children-first, spawning one solver task per active
//!    space — a space is active when it holds a sampled asset or an
//!    active child. Parents route through the doorways of their active
//!    children. The root tours an open path from the caller's position;
//!    every other space tours a circuit from its own doorway.
//! 4. Join every task (the single barrier), then splice child subtours
//!    into the root walk at their doorway markers, translating them into
//!    the root frame.
//!
//! Subtours are cached by content fingerprint; the cache is consulted
//! before solving and written behind the composition's back afterwards.

pub mod tree;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::{RouteCache, fingerprint};
use crate::model::{Asset, Checkpoint, Route, pack};
use crate::sample::{KeyOrder, sample_indices};
use crate::solver;
use crate::store::SpaceStore;
use crate::{Error, Result};

pub use tree::{SpaceNode, SpaceTree};

// ============================================================================
// ComposeOptions
// ============================================================================

/// Knobs for one composition.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Which end of the sampling key list to keep.
    pub key_order: KeyOrder,
    /// Cap on simultaneously running solver calls. Zero is treated as one.
    pub max_concurrent: usize,
    /// Expiry for cached subtours.
    pub cache_ttl: Duration,
    /// Fixed sampling seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            key_order: KeyOrder::LargestFirst,
            max_concurrent: 8,
            cache_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            seed: None,
        }
    }
}

// ============================================================================
// Composition
// ============================================================================

/// Compose the full inspection route starting at `initial`, whose `base`
/// names the root space, visiting a weighted sample of the site's assets.
pub async fn compose_route<S: SpaceStore, C: RouteCache>(
    store: &S,
    cache: &Arc<C>,
    options: &ComposeOptions,
    initial: Asset,
    rate: f64,
) -> Result<Route> {
    if !(rate > 0.0 && rate <= 1.0) {
        return Err(Error::InvalidParameter(format!(
            "sampling rate must be in (0, 1], got {rate}"
        )));
    }
    if !initial.rx.is_finite() || !initial.ry.is_finite() {
        return Err(Error::InvalidParameter(
            "initial position must be finite".to_string(),
        ));
    }

    let tree = SpaceTree::build(store, &initial.base).await?;
    debug!(
        spaces = tree.len(),
        assets = tree.assets.len(),
        "space tree materialized"
    );

    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let picked = sample_indices(&tree.assets, rate, options.key_order, &mut rng);
    if picked.is_empty() {
        return Err(Error::EmptySample);
    }
    debug!(sampled = picked.len(), "assets sampled");

    let mut node_assets: Vec<Vec<Asset>> = vec![Vec::new(); tree.len()];
    for i in picked {
        node_assets[tree.asset_slots[i]].push(tree.assets[i].clone());
    }

    // Children sit after their parent in the arena, so a reverse scan is a
    // post-order walk: by the time a slot is considered, the activity of
    // all its children is known.
    let mut active = vec![false; tree.len()];
    let mut subtours: JoinSet<Result<(String, Route)>> = JoinSet::new();
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));

    for slot in (0..tree.len()).rev() {
        let active_children: Vec<usize> = tree.nodes[slot]
            .children
            .iter()
            .copied()
            .filter(|&c| active[c])
            .collect();
        if node_assets[slot].is_empty() && active_children.is_empty() {
            continue;
        }
        active[slot] = true;

        let doors = active_children
            .iter()
            .map(|&c| tree.nodes[c].space.clone())
            .collect();
        let points = pack(std::mem::take(&mut node_assets[slot]), doors);
        let (anchor, circuit) = if slot == 0 {
            (Checkpoint::from(initial.clone()), false)
        } else {
            (Checkpoint::from(tree.nodes[slot].space.clone()), true)
        };

        let name = tree.nodes[slot].space.name.clone();
        let cache = Arc::clone(cache);
        let semaphore = Arc::clone(&semaphore);
        let ttl = options.cache_ttl;
        subtours.spawn(async move {
            let fp = fingerprint(&points, &anchor, circuit);
            match cache.get(&fp).await {
                Ok(Some(route)) => {
                    debug!(space = %name, "subtour cache hit");
                    return Ok((name, route));
                }
                Ok(None) => {}
                Err(e) => warn!(space = %name, "cache read failed, treating as miss: {e}"),
            }

            let permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let route = solver::solve(points, anchor, circuit)?;
            drop(permit);

            // The write never gates the composition: it runs behind the
            // barrier's back and a failure only costs a future recompute.
            let cached = route.clone();
            let space = name.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_with_expiry(fp, cached, ttl).await {
                    warn!(space = %space, "cache write failed: {e}");
                }
            });

            Ok((name, route))
        });
    }

    // Single barrier: no subtour is readable before every task has joined.
    let mut routes: HashMap<String, Route> = HashMap::new();
    while let Some(joined) = subtours.join_next().await {
        let (name, route) =
            joined.map_err(|e| Error::Internal(format!("subtour task failed: {e}")))??;
        routes.insert(name, route);
    }
    debug!(subtours = routes.len(), "all subtours solved");

    splice(&tree.nodes[0].space.name, routes)
}

// ============================================================================
// Splice
// ============================================================================

/// Flatten solved subtours into the root walk.
///
/// The root sequence is scanned left to right. The first time a doorway
/// marker shows up, the child's circuit (minus its leading anchor, which
/// duplicates the marker) is inserted right after it, translated by the
/// marker's coordinates. Those coordinates are already in the root frame,
/// so they carry the full offset of every ancestor — the scan then walks
/// into the inserted region, which resolves deeper nesting with the same
/// rule. The second time a doorway shows up it is the walk leaving the
/// space; the marker stays in the sequence.
fn splice(root_name: &str, mut routes: HashMap<String, Route>) -> Result<Route> {
    let root = routes
        .remove(root_name)
        .ok_or_else(|| Error::Internal(format!("no subtour for root {root_name}")))?;
    let mut seq = root.sequence;
    let mut distance = root.distance;
    let mut open: Vec<String> = Vec::new();

    let mut i = 0;
    while i < seq.len() {
        if seq[i].is_portal {
            if open.last().is_some_and(|top| *top == seq[i].name) {
                open.pop();
            } else {
                let name = seq[i].name.clone();
                let (ox, oy) = (seq[i].rx, seq[i].ry);
                let child = routes
                    .remove(&name)
                    .ok_or_else(|| Error::Internal(format!("no subtour for space {name}")))?;

                let mut tail = child.sequence;
                if tail.is_empty() {
                    return Err(Error::Internal(format!("empty subtour for space {name}")));
                }
                tail.remove(0);
                for cp in &mut tail {
                    cp.translate(ox, oy);
                }
                distance += child.distance;
                seq.splice(i + 1..i + 1, tail);
                open.push(name);
            }
        }
        i += 1;
    }

    Ok(Route::new(seq, distance))
}

// ============================================================================
// Tests
// ============================================================================
