//! shelf-ngin
//!
//! A small wgpu app that lays out a warehouse shelf: 216 boxes stacked on a
//! ground plane plus a strip of floor tiles, lit by a hemispheric light and
//! seen from a free camera above. It runs natively and on the web, where it
//! binds to an existing page canvas.
//!
//! High-level modules
//! - `host`: the scene host that composes the shelf layout on startup
//! - `manager`: scene manager with the box, ground and axis factories
//! - `scene`: engine-independent scene model (meshes, camera, light, colours)
//! - `backend`: the capability trait a rendering engine implements
//! - `window_ref`: access to the page (ready state, load and resize events)
//! - `config`: scene settings such as canvas id, camera and clear colour
//! - `context`: the wgpu engine that owns device, surface and pipelines
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `data_structures`: GPU-side models, instances and batches
//! - `pipelines`: mesh, line and light pipeline definitions
//! - `resources`: procedural box, plane and line geometry
//! - `flow`: the winit event loop that drives everything
//!

pub mod backend;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod host;
pub mod manager;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod window_ref;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::SceneBackend;
pub use config::SceneConfig;
pub use host::SceneHost;
pub use manager::{BoxParams, GroundParams, SceneManager};
pub use scene::{Color3, Mesh, MeshId, Scene, Shape};
pub use window_ref::{ReadyState, WindowRef};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Web entry point: runs the default scene on the page's `rendererCanvas`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
