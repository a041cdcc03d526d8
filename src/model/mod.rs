//! # Routing Data Model
//!
//! Clean DTOs shared by every layer: store ↔ sampler ↔ solver ↔ composer.
//!
//! Design rule: NO store handles, NO cache types, NO task types here.
//! This module is pure data — no I/O, no state, no async.

pub mod asset;
pub mod checkpoint;
pub mod route;
pub mod space;

pub use asset::Asset;
pub use checkpoint::{Checkpoint, pack, unpack};
pub use route::Route;
pub use space::Space;
