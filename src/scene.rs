//! Scene data model.
//!
//! These are the plain descriptions of what lives in a scene: one camera, one
//! light and any number of meshes, each with its own material. The
//! [`SceneManager`](crate::manager::SceneManager) records them here and hands
//! them to the [`SceneBackend`](crate::backend::SceneBackend) that turns them
//! into GPU resources.

use cgmath::{Point3, Vector3};
use rand::Rng;

/// Linear RGB colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const BLACK: Color3 = Color3::new(0.0, 0.0, 0.0);
    pub const WHITE: Color3 = Color3::new(1.0, 1.0, 1.0);
    pub const RED: Color3 = Color3::new(1.0, 0.0, 0.0);
    pub const GREEN: Color3 = Color3::new(0.0, 1.0, 0.0);
    pub const BLUE: Color3 = Color3::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Draw every channel uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
    }
}

impl From<Color3> for [f32; 3] {
    fn from(c: Color3) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Surface description owned by exactly one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Color3,
}

/// Geometry of a mesh in its local frame, centred on the mesh position.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box: `width` along X, `height` along Y, `depth` along Z.
    Box { width: f32, height: f32, depth: f32 },
    /// Flat plane in XZ facing +Y: `width` along X, `height` along Z.
    Ground { width: f32, height: f32 },
    /// Unlit line segments, used for debug axes and their labels.
    Lines { segments: Vec<[Point3<f32>; 2]> },
}

impl Shape {
    fn kind(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Ground { .. } => "ground",
            Shape::Lines { .. } => "lines",
        }
    }
}

/// Turn a polyline into the list of segments between consecutive points.
pub fn polyline(points: &[Point3<f32>]) -> Vec<[Point3<f32>; 2]> {
    points.windows(2).map(|w| [w[0], w[1]]).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    pub name: String,
    pub shape: Shape,
    pub position: Vector3<f32>,
    pub material: Material,
}

/// A camera that starts at `position` looking at `target` and is then
/// moved around by the default input bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct FreeCamera {
    pub name: String,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

/// Ambient light blending `ground` and `diffuse` depending on how much a
/// surface faces `direction`.
#[derive(Clone, Debug, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    pub direction: Vector3<f32>,
    pub intensity: f32,
    pub diffuse: Color3,
    pub ground: Color3,
}

impl HemisphericLight {
    pub fn new(name: &str, direction: Vector3<f32>) -> Self {
        Self {
            name: name.to_string(),
            direction,
            intensity: 1.0,
            diffuse: Color3::WHITE,
            ground: Color3::BLACK,
        }
    }
}

/// Registry of everything created in a scene.
///
/// Mesh and material names are derived from the mesh kind and a running id,
/// so two meshes never share a name.
#[derive(Debug, Default)]
pub struct Scene {
    camera: Option<FreeCamera>,
    light: Option<HemisphericLight>,
    meshes: Vec<Mesh>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_camera(&mut self, camera: FreeCamera) -> &FreeCamera {
        self.camera.insert(camera)
    }

    pub fn set_light(&mut self, light: HemisphericLight) -> &HemisphericLight {
        self.light.insert(light)
    }

    pub fn camera(&self) -> Option<&FreeCamera> {
        self.camera.as_ref()
    }

    pub fn light(&self) -> Option<&HemisphericLight> {
        self.light.as_ref()
    }

    /// Register a mesh with a fresh id and name. `label` replaces the kind
    /// prefix of the name when given (e.g. `axisX`).
    pub fn add_mesh(
        &mut self,
        label: Option<&str>,
        shape: Shape,
        position: Vector3<f32>,
        diffuse: Color3,
    ) -> &Mesh {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        let name = format!("{}{}", label.unwrap_or(shape.kind()), id.0);
        let material = Material {
            name: format!("{} material", name),
            diffuse,
        };
        self.meshes.push(Mesh {
            id,
            name,
            shape,
            position,
            material,
        });
        &self.meshes[self.meshes.len() - 1]
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn mesh_by_name(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
