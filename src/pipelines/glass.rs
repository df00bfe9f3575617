use crate::data_structures::{
    instance::InstanceRaw,
    mesh::{CubeVertex, Vertex},
    texture::Texture,
};
use crate::pipelines::cube::mk_render_pipeline;

/**
 * The alpha-blended pipeline for the outer glass shells.
 *
 * Same shader as the solid pipeline; the see-through look comes from the
 * per-instance alpha and this pipeline's blend state. Glass is drawn last so
 * the blend sees the already-rendered inner cubes.
 */
pub fn mk_glass_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glass Pipeline Layout"),
            bind_group_layouts: &[camera_bind_group_layout, light_bind_group_layout],
            push_constant_ranges: &[],
        });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Glass Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("cube_shader.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[CubeVertex::desc(), InstanceRaw::desc()],
        wgpu::PrimitiveTopology::TriangleList,
        shader,
    )
}
