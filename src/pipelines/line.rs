use crate::{
    data_structures::{
        model::{LineVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::mk_render_pipeline,
};

/**
 * Unlit line-list pipeline for debug geometry such as the world axes.
 *
 * Only the camera is bound; colours come straight from the vertices.
 */
pub fn mk_line_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Line Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &[LineVertex::desc()],
        wgpu::PrimitiveTopology::LineList,
        shader,
    )
}
