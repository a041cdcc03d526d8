//! Space tree materialization.
//!
//! One composition works on a frozen snapshot of the reachable hierarchy:
//! every space under the root plus every asset they own, pulled from the
//! store breadth-first. The snapshot is an arena — children are reachable
//! only through parent slots, and a child's slot is always greater than
//! its parent's, so iterating slots in reverse visits children first.

use std::collections::VecDeque;

use crate::Result;
use crate::model::{Asset, Space};
use crate::store::SpaceStore;

/// One space in the arena.
#[derive(Debug, Clone)]
pub struct SpaceNode {
    pub space: Space,
    /// Arena slots of direct children.
    pub children: Vec<usize>,
}

/// Frozen snapshot of the hierarchy under one root. Slot 0 is the root.
#[derive(Debug, Clone)]
pub struct SpaceTree {
    pub nodes: Vec<SpaceNode>,
    /// Every asset in the snapshot, in discovery order.
    pub assets: Vec<Asset>,
    /// `asset_slots[i]` is the arena slot owning `assets[i]`.
    pub asset_slots: Vec<usize>,
}

impl SpaceTree {
    /// Materialize the subtree rooted at `root` from the store.
    ///
    /// A missing root aborts with `Error::NotFound`; any store failure
    /// mid-traversal aborts with that error and no partial tree escapes.
    pub async fn build<S: SpaceStore + ?Sized>(store: &S, root: &str) -> Result<SpaceTree> {
        let root_space = store.get_space(root).await?;

        let mut nodes = vec![SpaceNode {
            space: root_space,
            children: Vec::new(),
        }];
        let mut assets = Vec::new();
        let mut asset_slots = Vec::new();

        let mut queue = VecDeque::from([0usize]);
        while let Some(slot) = queue.pop_front() {
            let name = nodes[slot].space.name.clone();

            for owned in store.list_assets(&name).await? {
                assets.push(owned);
                asset_slots.push(slot);
            }

            for child in store.list_child_spaces(&name).await? {
                let child_slot = nodes.len();
                nodes.push(SpaceNode {
                    space: child,
                    children: Vec::new(),
                });
                nodes[slot].children.push(child_slot);
                queue.push_back(child_slot);
            }
        }

        Ok(SpaceTree {
            nodes,
            assets,
            asset_slots,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
