//! Inspectable asset inside a space.

use serde::{Deserialize, Serialize};

/// A point of interest that patrols visit, positioned relative to the
/// origin of its owning space.
///
/// `weight` biases sampling: heavier assets are picked more often. It must
/// be strictly positive; ingestion rejects anything else before it can
/// reach the sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    /// Owning space name.
    pub base: String,
    pub rx: f64,
    pub ry: f64,
    pub weight: f64,
}

impl Asset {
    /// New asset with the default sampling weight of 1.0.
    pub fn new(name: impl Into<String>, base: impl Into<String>, rx: f64, ry: f64) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            rx,
            ry,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}
