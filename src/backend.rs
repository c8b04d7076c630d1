//! The narrow engine surface the [`SceneManager`](crate::manager::SceneManager)
//! talks to.
//!
//! [`Context`](crate::context::Context) implements it on top of wgpu. Anything
//! else implementing it (a recorder in tests, a headless stub) can stand in
//! for the GPU without changing the manager.

use std::future::Future;

use instant::Duration;

use crate::{
    config::SceneConfig,
    scene::{FreeCamera, HemisphericLight, Mesh},
};

pub trait SceneBackend: Sized {
    /// Whatever the renderer draws into: a winit window for [`Context`](crate::context::Context).
    type Canvas;

    /// Build a renderer bound to `canvas`.
    fn attach(
        canvas: Self::Canvas,
        config: &SceneConfig,
    ) -> impl Future<Output = anyhow::Result<Self>>;

    /// Make `camera` the active view and bind the default controls to it.
    fn add_camera(&mut self, camera: &FreeCamera);

    fn add_light(&mut self, light: &HemisphericLight);

    fn add_mesh(&mut self, mesh: &Mesh);

    /// Advance camera input by `dt` and draw one frame.
    fn render(&mut self, dt: Duration) -> anyhow::Result<()>;

    /// Re-read the canvas size and reconfigure the output surface.
    fn resize(&mut self);
}
