//! Finished route.

use serde::{Deserialize, Serialize};

use super::Checkpoint;

/// An ordered walk over checkpoints plus its total Euclidean length.
///
/// Routes are produced whole by the solver or the composer and never
/// mutated afterwards; the sequence is exactly what a renderer would draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub sequence: Vec<Checkpoint>,
    pub distance: f64,
}

impl Route {
    pub fn new(sequence: Vec<Checkpoint>, distance: f64) -> Self {
        Self { sequence, distance }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
