//! # patrol-rs — Inspection Route Planning Engine
//!
//! Plans a single walkable route through a site of nested spaces,
//! visiting a weighted sample of its assets.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SpaceStore` and `RouteCache` are the contracts between engine and deployment
//! 2. **Clean DTOs**: `Space`, `Asset`, `Checkpoint`, `Route` cross all boundaries
//! 3. **Solver owns nothing**: checkpoints → route is a pure function
//! 4. **Tree-bounded exactness**: composition decomposes along the space tree, so the
//!    exact solver's exponential cost is paid per space, never per site
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patrol_rs::{Asset, Planner};
//!
//! # async fn example() -> patrol_rs::Result<()> {
//! // Plan over the built-in demo site
//! let planner = Planner::open_demo();
//!
//! // Start at the root space's doorway, visit every asset
//! let initial = Asset::new("init", "base", 0.0, 0.0);
//! let route = planner.compose_route(initial, 1.0).await?;
//!
//! for cp in &route.sequence {
//!     println!("{} @ ({}, {})", cp.name, cp.rx, cp.ry);
//! }
//! println!("total distance {}", route.distance);
//! # Ok(())
//! # }
//! ```
//!
//! ## Collaborators
//!
//! | Collaborator | Module | Description |
//! |--------------|--------|-------------|
//! | `MemoryStore` | `store::memory` | In-memory site layout for testing/embedding |
//! | `MemoryCache` | `cache::memory` | In-memory TTL cache for solved subtours |

// ============================================================================
// Modules
// ============================================================================

pub mod cache;
pub mod compose;
pub mod ingest;
pub mod model;
pub mod sample;
pub mod solver;
pub mod store;

use std::sync::Arc;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Asset, Checkpoint, Route, Space, pack, unpack};

// ============================================================================
// Re-exports: Collaborator contracts
// ============================================================================

pub use cache::{Fingerprint, MemoryCache, RouteCache, fingerprint};
pub use store::{MemoryStore, SpaceStore};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use compose::{ComposeOptions, SpaceTree};
pub use ingest::{IngestReport, parse_checkpoint_file, parse_checkpoints};
pub use sample::KeyOrder;
pub use solver::MAX_POINTS;

// ============================================================================
// Top-level Planner handle
// ============================================================================

/// The primary entry point. A `Planner` wraps a space store and a route
/// cache and composes full inspection routes.
pub struct Planner<S: SpaceStore, C: RouteCache> {
    store: S,
    cache: Arc<C>,
    options: ComposeOptions,
}

impl<S: SpaceStore, C: RouteCache> Planner<S, C> {
    /// Create a Planner over the given collaborators with default options.
    pub fn new(store: S, cache: C) -> Self {
        Self {
            store,
            cache: Arc::new(cache),
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    /// Compose the route that starts at `initial` (whose `base` names the
    /// root space) and visits a weighted sample of the site's assets.
    pub async fn compose_route(&self, initial: Asset, rate: f64) -> Result<Route> {
        compose::compose_route(&self.store, &self.cache, &self.options, initial, rate).await
    }

    /// Access the underlying store (for setup and maintenance).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the route cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }
}

/// In-memory planner for testing and embedding.
impl Planner<MemoryStore, MemoryCache> {
    pub fn open_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryCache::new())
    }

    /// In-memory planner preloaded with the demo site.
    pub fn open_demo() -> Self {
        Self::new(MemoryStore::with_demo_data(), MemoryCache::new())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Empty sample: no assets selected at this rate")]
    EmptySample,

    #[error("Point set of {len} exceeds solver limit of {max}")]
    SolverLimit { len: usize, max: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
