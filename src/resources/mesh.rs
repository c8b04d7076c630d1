use crate::{
    data_structures::model::{LineVertex, ModelVertex},
    scene::{Mesh, Shape},
};

/**
 * Unit cube centred on the origin, spanning `[-0.5, 0.5]` on every axis.
 *
 * Each face has its own four vertices so the normals stay flat. Triangles wind
 * counter-clockwise when seen from outside, matching the back-face culling of
 * the mesh pipeline.
 */
pub fn unit_cube() -> (Vec<ModelVertex>, Vec<u16>) {
    // (normal, tangent u, tangent v) with u × v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = [
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            vertices.push(ModelVertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/**
 * Unit plane in XZ at `y = 0`, facing +Y, spanning `[-0.5, 0.5]` on X and Z.
 */
pub fn unit_plane() -> (Vec<ModelVertex>, Vec<u16>) {
    let normal = [0.0, 1.0, 0.0];
    let vertices = [
        [-0.5, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [0.5, 0.0, -0.5],
        [-0.5, 0.0, -0.5],
    ]
    .into_iter()
    .map(|position| ModelVertex { position, normal })
    .collect();
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/**
 * World-space line list of a `Shape::Lines` mesh, coloured with its material.
 * Other shapes have no line geometry.
 */
pub fn line_vertices(mesh: &Mesh) -> Vec<LineVertex> {
    let Shape::Lines { segments } = &mesh.shape else {
        return Vec::new();
    };
    let colour: [f32; 3] = mesh.material.diffuse.into();
    segments
        .iter()
        .flatten()
        .map(|point| LineVertex {
            position: (*point + mesh.position).into(),
            colour,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Point3, Vector3};

    use super::*;
    use crate::scene::{Color3, Material, MeshId};

    fn winding_normal(vertices: &[ModelVertex], tri: &[u16]) -> Vector3<f32> {
        let p = |i: u16| Vector3::from(vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let (vertices, indices) = unit_cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let normal = Vector3::from(vertices[tri[0] as usize].normal);
            assert!(winding_normal(&vertices, tri).dot(normal) > 0.0);
        }
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn plane_faces_up() {
        let (vertices, indices) = unit_plane();
        for tri in indices.chunks(3) {
            assert!(winding_normal(&vertices, tri).y > 0.0);
        }
    }

    #[test]
    fn lines_are_offset_by_the_mesh_position() {
        let mesh = Mesh {
            id: MeshId(3),
            name: "labelX3".to_string(),
            shape: Shape::Lines {
                segments: vec![[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]],
            },
            position: Vector3::new(0.0, 2.0, 0.0),
            material: Material {
                name: "labelX3 material".to_string(),
                diffuse: Color3::RED,
            },
        };
        let vertices = line_vertices(&mesh);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [1.0, 2.0, 0.0]);
        assert_eq!(vertices[0].colour, [1.0, 0.0, 0.0]);
    }
}
