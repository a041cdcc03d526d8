//! Unified routing point.

use serde::{Deserialize, Serialize};

use super::{Asset, Space};

/// A single stop on a route: either an asset to inspect or the doorway of
/// a nested space (a portal).
///
/// Portals carry `weight = 0.0`; they are never sampled, only injected by
/// the composer so the solver routes through child-space entrances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub base: String,
    pub rx: f64,
    pub ry: f64,
    pub is_portal: bool,
    pub weight: f64,
}

impl Checkpoint {
    /// Euclidean distance to another checkpoint in the same frame.
    pub fn distance_to(&self, other: &Checkpoint) -> f64 {
        (self.rx - other.rx).hypot(self.ry - other.ry)
    }

    /// Shift this checkpoint's coordinates by an offset.
    pub fn translate(&mut self, ox: f64, oy: f64) {
        self.rx += ox;
        self.ry += oy;
    }
}

impl From<Asset> for Checkpoint {
    fn from(a: Asset) -> Self {
        Self {
            name: a.name,
            base: a.base,
            rx: a.rx,
            ry: a.ry,
            is_portal: false,
            weight: a.weight,
        }
    }
}

impl From<Space> for Checkpoint {
    fn from(s: Space) -> Self {
        Self {
            name: s.name,
            base: s.base,
            rx: s.rx,
            ry: s.ry,
            is_portal: true,
            weight: 0.0,
        }
    }
}

/// Merge assets and child-space doorways into one checkpoint list, assets
/// first.
pub fn pack(assets: Vec<Asset>, spaces: Vec<Space>) -> Vec<Checkpoint> {
    let mut out = Vec::with_capacity(assets.len() + spaces.len());
    out.extend(assets.into_iter().map(Checkpoint::from));
    out.extend(spaces.into_iter().map(Checkpoint::from));
    out
}

/// Split a checkpoint list back into assets and spaces by the portal flag.
pub fn unpack(checkpoints: Vec<Checkpoint>) -> (Vec<Asset>, Vec<Space>) {
    let mut assets = Vec::new();
    let mut spaces = Vec::new();
    for cp in checkpoints {
        if cp.is_portal {
            spaces.push(Space {
                name: cp.name,
                base: cp.base,
                rx: cp.rx,
                ry: cp.ry,
            });
        } else {
            assets.push(Asset {
                name: cp.name,
                base: cp.base,
                rx: cp.rx,
                ry: cp.ry,
                weight: cp.weight,
            });
        }
    }
    (assets, spaces)
}
