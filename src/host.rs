//! The shelf scene.
//!
//! [`SceneHost`] binds a canvas to its [`SceneManager`] and issues the one-time
//! sequence that lays out four shelf levels of boxes and a row of floor tiles.

use instant::Duration;

use crate::{
    backend::SceneBackend,
    manager::{BoxParams, GroundParams, SceneManager},
    window_ref::WindowRef,
};

pub const SHELF_LEVELS: u32 = 4;
pub const SHELF_DEPTH: u32 = 9;
/// X coordinate of every box column, in placement order.
pub const SHELF_COLUMNS: [f32; 6] = [4.5, 2.5, 1.5, -0.5, -1.5, -3.5];

pub const GROUND_TILES: [f32; 7] = [-5.5, -3.5, -1.5, 0.5, 2.5, 4.5, 6.5];
// Lifted off the ground plane to avoid z-fighting.
pub const GROUND_TILE_Y: f32 = 0.001;
pub const GROUND_TILE_Z: f32 = -9.5;

/// Every box of the shelf in placement order: levels bottom up, then depth
/// rows, then the columns.
pub fn shelf_layout() -> impl Iterator<Item = BoxParams> {
    (0..SHELF_LEVELS).flat_map(|level| {
        (0..SHELF_DEPTH).flat_map(move |row| {
            SHELF_COLUMNS.into_iter().map(move |x| {
                BoxParams::new(1.0, 1.0, 1.0, x, 0.5 + level as f32, -4.0 + row as f32)
            })
        })
    })
}

pub fn ground_tile_layout() -> impl Iterator<Item = GroundParams> {
    GROUND_TILES
        .into_iter()
        .map(|x| GroundParams::new(1.0, 1.0, x, GROUND_TILE_Y, GROUND_TILE_Z))
}

pub struct SceneHost<B: SceneBackend, W: WindowRef> {
    manager: SceneManager<B, W>,
}

impl<B: SceneBackend, W: WindowRef> SceneHost<B, W> {
    pub fn new(manager: SceneManager<B, W>) -> Self {
        Self { manager }
    }

    /// Create the scene on `canvas`, start the render loop and place the shelf
    /// and the floor tiles.
    pub async fn init(&mut self, canvas: B::Canvas) -> anyhow::Result<()> {
        self.manager.create_scene(canvas).await?;
        self.manager.animate()?;
        self.create_shelf()?;
        for tile in ground_tile_layout() {
            self.manager.generate_ground(tile)?;
        }
        if let Some(size) = self.manager.config().world_axis {
            self.manager.show_world_axis(size)?;
        }
        log::info!("Placed {} meshes", self.manager.scene().len());
        Ok(())
    }

    fn create_shelf(&mut self) -> anyhow::Result<()> {
        for params in shelf_layout() {
            self.manager.generate_box(params)?;
        }
        Ok(())
    }

    pub fn frame(&mut self, dt: Duration) -> anyhow::Result<()> {
        self.manager.frame(dt)
    }

    pub fn manager(&self) -> &SceneManager<B, W> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SceneManager<B, W> {
        &mut self.manager
    }
}
