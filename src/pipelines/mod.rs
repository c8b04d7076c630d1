//! Render pipelines.
//!
//! - `basic` builds the instanced, lit mesh pipeline and the shared pipeline setup
//! - `light` holds the hemispheric light uniform and its bind group
//! - `line` builds the unlit line pipeline for debug geometry

pub mod basic;
pub mod light;
pub mod line;
