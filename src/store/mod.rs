//! # Space Store Trait
//!
//! This is THE contract between patrol-rs and wherever the site layout
//! lives. The composer only ever reads through it; the write surface
//! exists so deployments and tests can manage the hierarchy through the
//! same interface.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory for testing/embedding |

pub mod memory;

use async_trait::async_trait;

use crate::Result;
use crate::model::{Asset, Space};

pub use memory::MemoryStore;

// ============================================================================
// SpaceStore Trait
// ============================================================================

/// The universal site-layout contract.
///
/// Any backing service that implements this trait can feed the composer.
/// Name lookups are exact; `name` is globally unique for spaces, and
/// `(name, base)` is unique for assets.
#[async_trait]
pub trait SpaceStore: Send + Sync + 'static {
    // ========================================================================
    // Reads (everything the composer needs)
    // ========================================================================

    /// Get a space by name. `Error::NotFound` if missing.
    async fn get_space(&self, name: &str) -> Result<Space>;

    /// All spaces whose `base` is `parent`, in no particular order.
    async fn list_child_spaces(&self, parent: &str) -> Result<Vec<Space>>;

    /// Get an asset by name within its owning space. `Error::NotFound` if missing.
    async fn get_asset(&self, name: &str, base: &str) -> Result<Asset>;

    /// All assets owned by `base`, in no particular order.
    async fn list_assets(&self, base: &str) -> Result<Vec<Asset>>;

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert spaces. `Error::Conflict` if any name already exists; nothing
    /// is written when any element fails validation.
    async fn insert_spaces(&self, spaces: Vec<Space>) -> Result<()>;

    /// Insert assets. `Error::NotFound` if an owning space is missing,
    /// `Error::Conflict` on a duplicate `(name, base)`; nothing is written
    /// when any element fails validation.
    async fn insert_assets(&self, assets: Vec<Asset>) -> Result<()>;

    /// Replace an existing asset's position and weight, matched by
    /// `(name, base)`. `Error::NotFound` if missing.
    async fn update_asset(&self, asset: Asset) -> Result<()>;

    /// Delete one asset. `Error::NotFound` if missing.
    async fn delete_asset(&self, name: &str, base: &str) -> Result<()>;

    /// Delete a space, every space nested under it, and all their assets.
    /// `Error::NotFound` if the space itself is missing.
    async fn delete_space(&self, name: &str) -> Result<()>;
}
