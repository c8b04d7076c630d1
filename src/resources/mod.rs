use crate::data_structures::model::Model;

/**
 * This module contains the built-in geometry every scene is assembled from.
 * Nothing is loaded from files: boxes and ground tiles are instances of the
 * unit models created here.
 */
pub mod mesh;

pub fn cube_model(device: &wgpu::Device) -> Model {
    let (vertices, indices) = mesh::unit_cube();
    Model::new(device, "Box", &vertices, &indices)
}

pub fn plane_model(device: &wgpu::Device) -> Model {
    let (vertices, indices) = mesh::unit_plane();
    Model::new(device, "Ground", &vertices, &indices)
}
