//! Engine data structures: models, instances, batches and textures.
//!
//! - `model` contains vertex formats and GPU buffers for meshes and line sets
//! - `instance` holds per-instance transformation and colour data
//! - `batch` groups instances of one model and keeps their GPU buffer in sync
//! - `texture` contains the depth buffer wrapper

pub mod batch;
pub mod instance;
pub mod model;
pub mod texture;
