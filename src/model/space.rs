//! Space in the inspection hierarchy.

use serde::{Deserialize, Serialize};

/// A named region of the site, nested under a parent space.
///
/// `(rx, ry)` is the position of the space's doorway in the parent's
/// coordinate frame. The root space has an empty `base` and its doorway
/// coordinates are not meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    /// Parent space name; empty for the root.
    pub base: String,
    pub rx: f64,
    pub ry: f64,
}

impl Space {
    pub fn new(name: impl Into<String>, base: impl Into<String>, rx: f64, ry: f64) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            rx,
            ry,
        }
    }

    /// Whether this space is the root of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.base.is_empty()
    }
}
