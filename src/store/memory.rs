//! In-memory space store.
//!
//! This is the reference implementation of `SpaceStore`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No cycle guard**: a `base` chain that loops is stored as-is; the
//!   tree builder will walk it forever. Keeping `base` chains acyclic is
//!   the caller's contract.
//! - **No indexes**: child and asset listings scan the full collection.
//! - **Batch inserts validate first, then write**: a failing element
//!   rejects the whole batch before anything lands.
//!
//! Use this store for:
//! - Testing the sampler, solver, and composer end to end
//! - Embedding patrol-rs in applications that don't need persistence
//! - Seeding demo layouts before wiring a real backing service

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::SpaceStore;
use crate::model::{Asset, Space};
use crate::{Error, Result};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory site layout.
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    /// space name → space
    spaces: RwLock<HashMap<String, Space>>,
    /// owning space name → assets inside it
    assets: RwLock<HashMap<String, Vec<Asset>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                spaces: RwLock::new(HashMap::new()),
                assets: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// A small two-level demo site: root space `base` with assets A, B, C
    /// and a nested `Meeting Room` at (2, 2) holding asset D.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        {
            let mut spaces = store.inner.spaces.write();
            for s in [
                Space::new("base", "", 0.0, 0.0),
                Space::new("Meeting Room", "base", 2.0, 2.0),
            ] {
                spaces.insert(s.name.clone(), s);
            }

            let mut assets = store.inner.assets.write();
            for a in [
                Asset::new("A", "base", 1.0, 1.0),
                Asset::new("B", "base", 3.0, 1.0),
                Asset::new("C", "base", 4.0, 0.0),
                Asset::new("D", "Meeting Room", 0.0, 1.0),
            ] {
                assets.entry(a.base.clone()).or_default().push(a);
            }
        }
        store
    }
}

// ============================================================================
// SpaceStore impl
// ============================================================================

#[async_trait]
impl SpaceStore for MemoryStore {
    async fn get_space(&self, name: &str) -> Result<Space> {
        self.inner
            .spaces
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Space {name}")))
    }

    async fn list_child_spaces(&self, parent: &str) -> Result<Vec<Space>> {
        Ok(self
            .inner
            .spaces
            .read()
            .values()
            .filter(|s| s.base == parent)
            .cloned()
            .collect())
    }

    async fn get_asset(&self, name: &str, base: &str) -> Result<Asset> {
        self.inner
            .assets
            .read()
            .get(base)
            .and_then(|list| list.iter().find(|a| a.name == name))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Asset {name} in {base}")))
    }

    async fn list_assets(&self, base: &str) -> Result<Vec<Asset>> {
        Ok(self
            .inner
            .assets
            .read()
            .get(base)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_spaces(&self, to_insert: Vec<Space>) -> Result<()> {
        let mut spaces = self.inner.spaces.write();
        for s in &to_insert {
            if spaces.contains_key(&s.name) {
                return Err(Error::Conflict(format!("Space {} already exists", s.name)));
            }
        }
        for s in to_insert {
            spaces.insert(s.name.clone(), s);
        }
        Ok(())
    }

    async fn insert_assets(&self, to_insert: Vec<Asset>) -> Result<()> {
        let spaces = self.inner.spaces.read();
        let mut assets = self.inner.assets.write();
        for a in &to_insert {
            if !spaces.contains_key(&a.base) {
                return Err(Error::NotFound(format!("Space {}", a.base)));
            }
            let duplicate = assets
                .get(&a.base)
                .is_some_and(|list| list.iter().any(|existing| existing.name == a.name));
            if duplicate {
                return Err(Error::Conflict(format!(
                    "Asset {} already exists in {}",
                    a.name, a.base
                )));
            }
        }
        for a in to_insert {
            assets.entry(a.base.clone()).or_default().push(a);
        }
        Ok(())
    }

    async fn update_asset(&self, asset: Asset) -> Result<()> {
        let mut assets = self.inner.assets.write();
        let slot = assets
            .get_mut(&asset.base)
            .and_then(|list| list.iter_mut().find(|a| a.name == asset.name))
            .ok_or_else(|| Error::NotFound(format!("Asset {} in {}", asset.name, asset.base)))?;
        *slot = asset;
        Ok(())
    }

    async fn delete_asset(&self, name: &str, base: &str) -> Result<()> {
        let mut assets = self.inner.assets.write();
        let list = assets
            .get_mut(base)
            .ok_or_else(|| Error::NotFound(format!("Asset {name} in {base}")))?;
        let before = list.len();
        list.retain(|a| a.name != name);
        if list.len() == before {
            return Err(Error::NotFound(format!("Asset {name} in {base}")));
        }
        Ok(())
    }

    async fn delete_space(&self, name: &str) -> Result<()> {
        let mut spaces = self.inner.spaces.write();
        if !spaces.contains_key(name) {
            return Err(Error::NotFound(format!("Space {name}")));
        }

        // Breadth-first sweep over the subtree rooted here.
        let mut doomed = vec![name.to_string()];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let parent = doomed[cursor].clone();
            cursor += 1;
            doomed.extend(
                spaces
                    .values()
                    .filter(|s| s.base == parent)
                    .map(|s| s.name.clone()),
            );
        }

        let mut assets = self.inner.assets.write();
        for space_name in &doomed {
            spaces.remove(space_name);
            assets.remove(space_name);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
