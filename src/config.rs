//! Runtime configuration.
//!
//! [`SceneConfig::default`] reproduces the stock shelf scene. The `with_*`
//! methods tweak single values before handing the config to
//! [`flow::run`](crate::flow::run).

use cgmath::Point3;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Id of the `<canvas>` element the renderer binds to on the web.
    pub canvas_id: String,
    pub clear_colour: wgpu::Color,
    pub camera_position: Point3<f32>,
    pub camera_target: Point3<f32>,
    pub light_intensity: f32,
    /// Width (X) and height (Z) of the ground plane under the shelf.
    pub ground_size: (f32, f32),
    /// Draw debug world axes of this length after the layout is built.
    pub world_axis: Option<f32>,
    /// Seed for box colours. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub log_level: log::Level,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_id: "rendererCanvas".to_string(),
            clear_colour: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            camera_position: Point3::new(0.0, 25.0, 0.0),
            camera_target: Point3::new(0.0, 0.0, 0.0),
            light_intensity: 0.5,
            ground_size: (15.0, 20.0),
            world_axis: None,
            seed: None,
            log_level: log::Level::Info,
        }
    }
}

impl SceneConfig {
    pub fn with_canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = id.into();
        self
    }

    pub fn with_clear_colour(mut self, colour: wgpu::Color) -> Self {
        self.clear_colour = colour;
        self
    }

    pub fn with_light_intensity(mut self, intensity: f32) -> Self {
        self.light_intensity = intensity;
        self
    }

    /// `width` along X and `height` along Z.
    pub fn with_ground_size(mut self, width: f32, height: f32) -> Self {
        self.ground_size = (width, height);
        self
    }

    pub fn with_world_axis(mut self, size: f32) -> Self {
        self.world_axis = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_camera_position(mut self, position: Point3<f32>) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = level;
        self
    }
}
