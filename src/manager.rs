//! Scene lifecycle and mesh generation.
//!
//! The [`SceneManager`] owns the engine backend and the scene registry. Its
//! lifecycle is create scene → animate, after which every driver tick that
//! reaches [`SceneManager::frame`] draws one frame.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{anyhow, bail};
use cgmath::{Point3, Vector3};
use instant::Duration;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    backend::SceneBackend,
    config::SceneConfig,
    scene::{Color3, FreeCamera, HemisphericLight, MeshId, Scene, Shape, polyline},
    window_ref::WindowRef,
};

const DEFAULT_X: f32 = 1.0;
const DEFAULT_Y: f32 = 0.5;
const DEFAULT_Z: f32 = 1.0;

/// Arguments of [`SceneManager::generate_box`]. Every `None` falls back to its
/// default; an explicit `Some(0.0)` is kept as is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxParams {
    pub size: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl BoxParams {
    pub fn new(size: f32, width: f32, height: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            size: Some(size),
            width: Some(width),
            height: Some(height),
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// `size` is the depth along Z; `width` and `height` override the X and Y extents.
    pub fn shape(&self) -> Shape {
        Shape::Box {
            width: self.width.unwrap_or(1.0),
            height: self.height.unwrap_or(1.0),
            depth: self.size.unwrap_or(1.0),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(
            self.x.unwrap_or(DEFAULT_X),
            self.y.unwrap_or(DEFAULT_Y),
            self.z.unwrap_or(DEFAULT_Z),
        )
    }
}

/// Arguments of [`SceneManager::generate_ground`], with the same defaulting
/// rules as [`BoxParams`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundParams {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl GroundParams {
    pub fn new(width: f32, height: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::Ground {
            width: self.width.unwrap_or(1.0),
            height: self.height.unwrap_or(1.0),
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(
            self.x.unwrap_or(DEFAULT_X),
            self.y.unwrap_or(DEFAULT_Y),
            self.z.unwrap_or(DEFAULT_Z),
        )
    }
}

pub struct SceneManager<B: SceneBackend, W: WindowRef> {
    window: W,
    config: SceneConfig,
    backend: Option<B>,
    scene: Scene,
    rng: StdRng,
    animating: bool,
    render_loop: Arc<AtomicBool>,
    resize_pending: Arc<AtomicBool>,
}

impl<B: SceneBackend, W: WindowRef> SceneManager<B, W> {
    pub fn new(window: W, config: SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            window,
            config,
            backend: None,
            scene: Scene::new(),
            rng,
            animating: false,
            render_loop: Arc::new(AtomicBool::new(false)),
            resize_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the renderer to `canvas` and populate the scene with a camera, a
    /// hemispheric light and the ground plane.
    pub async fn create_scene(&mut self, canvas: B::Canvas) -> anyhow::Result<()> {
        if self.backend.is_some() {
            bail!("the scene has already been created");
        }
        let mut backend = B::attach(canvas, &self.config).await?;

        let camera = self.scene.set_camera(FreeCamera {
            name: "camera1".to_string(),
            position: self.config.camera_position,
            target: self.config.camera_target,
        });
        backend.add_camera(camera);

        let mut light = HemisphericLight::new("light1", Vector3::unit_y());
        light.intensity = self.config.light_intensity;
        let light = self.scene.set_light(light);
        backend.add_light(light);

        let (width, height) = self.config.ground_size;
        let ground = self.scene.add_mesh(
            None,
            Shape::Ground { width, height },
            Vector3::new(0.0, 0.0, 0.0),
            Color3::WHITE,
        );
        backend.add_mesh(ground);

        log::info!("Scene created");
        self.backend = Some(backend);
        Ok(())
    }

    /// Start the render loop, or arm it to start once the document has loaded,
    /// and hook window resizes up to the renderer.
    pub fn animate(&mut self) -> anyhow::Result<()> {
        if self.backend.is_none() {
            bail!("animate called before the scene was created");
        }
        if self.animating {
            log::warn!("The render loop is already running");
            return Ok(());
        }
        self.animating = true;

        if self.window.ready_state().is_loading() {
            log::debug!("Document still loading, deferring the render loop");
            let render_loop = self.render_loop.clone();
            self.window.on_content_loaded(Box::new(move || {
                render_loop.store(true, Ordering::Release);
            }));
        } else {
            self.render_loop.store(true, Ordering::Release);
        }

        let resize_pending = self.resize_pending.clone();
        self.window.on_resize(Box::new(move || {
            resize_pending.store(true, Ordering::Release);
        }));
        Ok(())
    }

    /// Add a box with a random colour.
    pub fn generate_box(&mut self, params: BoxParams) -> anyhow::Result<MeshId> {
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| anyhow!("generate_box called before the scene was created"))?;
        let colour = Color3::random(&mut self.rng);
        let mesh = self
            .scene
            .add_mesh(None, params.shape(), params.position(), colour);
        backend.add_mesh(mesh);
        Ok(mesh.id)
    }

    /// Add a blue ground tile.
    pub fn generate_ground(&mut self, params: GroundParams) -> anyhow::Result<MeshId> {
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| anyhow!("generate_ground called before the scene was created"))?;
        let mesh = self
            .scene
            .add_mesh(None, params.shape(), params.position(), Color3::BLUE);
        backend.add_mesh(mesh);
        Ok(mesh.id)
    }

    /// Draw the X (red), Y (green) and Z (blue) axes with arrow heads and a
    /// letter next to each tip.
    pub fn show_world_axis(&mut self, size: f32) -> anyhow::Result<()> {
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| anyhow!("show_world_axis called before the scene was created"))?;
        let origin = Vector3::new(0.0, 0.0, 0.0);
        let label_size = size / 10.0;
        let axes = [
            (
                'X',
                Color3::RED,
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(size, 0.0, 0.0),
                    Point3::new(size * 0.95, 0.05 * size, 0.0),
                    Point3::new(size, 0.0, 0.0),
                    Point3::new(size * 0.95, -0.05 * size, 0.0),
                ],
                Vector3::new(0.9 * size, -0.05 * size, 0.0),
            ),
            (
                'Y',
                Color3::GREEN,
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, size, 0.0),
                    Point3::new(-0.05 * size, size * 0.95, 0.0),
                    Point3::new(0.0, size, 0.0),
                    Point3::new(0.05 * size, size * 0.95, 0.0),
                ],
                Vector3::new(0.0, 0.9 * size, -0.05 * size),
            ),
            (
                'Z',
                Color3::BLUE,
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, size),
                    Point3::new(0.0, -0.05 * size, size * 0.95),
                    Point3::new(0.0, 0.0, size),
                    Point3::new(0.0, 0.05 * size, size * 0.95),
                ],
                Vector3::new(0.0, 0.05 * size, 0.9 * size),
            ),
        ];
        for (letter, colour, arrow, label_position) in axes {
            let axis = self.scene.add_mesh(
                Some(format!("axis{}", letter).as_str()),
                Shape::Lines {
                    segments: polyline(&arrow),
                },
                origin,
                colour,
            );
            backend.add_mesh(axis);
            let label = self.scene.add_mesh(
                Some(format!("label{}", letter).as_str()),
                Shape::Lines {
                    segments: glyph(letter, label_size),
                },
                label_position,
                colour,
            );
            backend.add_mesh(label);
        }
        Ok(())
    }

    /// Flag the output surface for reconfiguration on the next frame.
    pub fn request_resize(&self) {
        self.resize_pending.store(true, Ordering::Release);
    }

    /// One tick of the render loop. Applies a pending resize and renders once
    /// the loop has started.
    pub fn frame(&mut self, dt: Duration) -> anyhow::Result<()> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };
        if self.resize_pending.swap(false, Ordering::AcqRel) {
            backend.resize();
        }
        if !self.render_loop.load(Ordering::Acquire) {
            return Ok(());
        }
        backend.render(dt)
    }

    pub fn is_rendering(&self) -> bool {
        self.render_loop.load(Ordering::Acquire)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }
}

/// Stroke a capital letter as line segments in the XY plane, centred on the
/// origin and `size` units tall. Only the axis letters have glyphs.
pub fn glyph(letter: char, size: f32) -> Vec<[Point3<f32>; 2]> {
    let h = size / 2.0;
    let p = |x: f32, y: f32| Point3::new(x, y, 0.0);
    match letter {
        'X' => vec![[p(-h, -h), p(h, h)], [p(-h, h), p(h, -h)]],
        'Y' => vec![
            [p(-h, h), p(0.0, 0.0)],
            [p(h, h), p(0.0, 0.0)],
            [p(0.0, 0.0), p(0.0, -h)],
        ],
        'Z' => vec![
            [p(-h, h), p(h, h)],
            [p(h, h), p(-h, -h)],
            [p(-h, -h), p(h, -h)],
        ],
        _ => Vec::new(),
    }
}
