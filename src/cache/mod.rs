//! # Route Cache
//!
//! Solved routes are content-addressed: the cache key is a fingerprint of
//! the complete solver input, so any store or sampling path that produces
//! the same point set hits the same entry. Checkpoints are sorted before
//! fingerprinting to ensure deterministic output regardless of packing
//! order.
//!
//! ## Implementations
//!
//! | Cache | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryCache` | `memory` | In-memory TTL map for testing/embedding |

pub mod memory;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::model::{Checkpoint, Route};

pub use memory::MemoryCache;

// ============================================================================
// Fingerprint
// ============================================================================

/// Content address of one solver input (point set + anchor + circuit flag).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Fingerprint a solver input.
///
/// Algorithm:
/// 1. Render every checkpoint to a canonical line (`{:?}` floats for full
///    precision round-trip; NaN renders as `NaN`, not skipped)
/// 2. Sort the lines (deterministic regardless of packing order)
/// 3. Append the anchor line and the circuit flag
/// 4. blake3 over the whole encoding
///
/// The anchor and flag are part of the key: equal point sets routed from
/// different anchors, or as path vs circuit, are different routes.
pub fn fingerprint(points: &[Checkpoint], anchor: &Checkpoint, circuit: bool) -> Fingerprint {
    let mut lines: Vec<String> = points.iter().map(checkpoint_to_hash_line).collect();
    lines.sort();
    lines.push(checkpoint_to_hash_line(anchor));
    lines.push(format!("circuit:{circuit}"));
    Fingerprint(blake3::hash(lines.join("\n").as_bytes()).into())
}

/// Canonical line for one checkpoint. `{:?}` on the strings escapes any
/// embedded separator, keeping the encoding injective.
fn checkpoint_to_hash_line(cp: &Checkpoint) -> String {
    format!(
        "{:?}|{:?}|{:?}|{:?}|{}|{:?}",
        cp.name, cp.base, cp.rx, cp.ry, cp.is_portal, cp.weight
    )
}

// ============================================================================
// RouteCache Trait
// ============================================================================

/// The route cache contract.
///
/// The cache is an optimization, never a source of truth. Callers treat a
/// failed `get` as a miss and a failed `set_with_expiry` as a skipped
/// write; neither blocks composition.
#[async_trait]
pub trait RouteCache: Send + Sync + 'static {
    /// Look up a cached route. `Ok(None)` on miss or expiry.
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Route>>;

    /// Store a route, replacing any previous entry, expiring after `ttl`.
    async fn set_with_expiry(
        &self,
        fingerprint: Fingerprint,
        route: Route,
        ttl: Duration,
    ) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
