//! In-memory route cache.
//!
//! This is the reference implementation of `RouteCache`.
//! Entries hold the JSON-encoded route plus an expiry deadline; expired or
//! undecodable entries read as misses, the same contract an external cache
//! with server-side expiry gives.
//!
//! ## Limitations
//!
//! - **Lazy expiry**: expired entries are not swept, only skipped on read
//!   and replaced on write. Long-lived processes with churning layouts
//!   will hold dead entries until overwritten.
//! - **No persistence**: the cache empties with the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use super::{Fingerprint, RouteCache};
use crate::Result;
use crate::model::Route;

// ============================================================================
// MemoryCache
// ============================================================================

/// In-memory TTL cache for solved routes.
pub struct MemoryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: RwLock<HashMap<Fingerprint, Entry>>,
}

struct Entry {
    /// JSON-encoded `Route`.
    payload: String,
    deadline: Instant,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// RouteCache impl
// ============================================================================

#[async_trait]
impl RouteCache for MemoryCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Route>> {
        let entries = self.inner.entries.read();
        let Some(entry) = entries.get(fingerprint) else {
            return Ok(None);
        };
        if Instant::now() >= entry.deadline {
            return Ok(None);
        }
        match serde_json::from_str(&entry.payload) {
            Ok(route) => Ok(Some(route)),
            Err(e) => {
                warn!(%fingerprint, "undecodable cache payload, treating as miss: {e}");
                Ok(None)
            }
        }
    }

    async fn set_with_expiry(
        &self,
        fingerprint: Fingerprint,
        route: Route,
        ttl: Duration,
    ) -> Result<()> {
        let payload = serde_json::to_string(&route)
            .map_err(|e| crate::Error::Storage(format!("route encoding failed: {e}")))?;
        let entry = Entry {
            payload,
            deadline: Instant::now() + ttl,
        };
        self.inner.entries.write().insert(fingerprint, entry);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
