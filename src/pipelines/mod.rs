//! Render pipeline definitions.
//!
//! - `cube` builds the generic pipeline constructor plus the lit solid-cube
//!   pipeline
//! - `glass` is the alpha-blended variant for the outer shells
//! - `outline` draws cube edges as a line list
//! - `light` owns the point-light uniform shared by the lit pipelines

pub mod cube;
pub mod glass;
pub mod light;
pub mod outline;

/// The three pipelines a frame renders with, in draw order: solids, outlines,
/// then glass last so blending sees everything behind it.
#[derive(Debug)]
pub struct Pipelines {
    pub solid: wgpu::RenderPipeline,
    pub outline: wgpu::RenderPipeline,
    pub glass: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            solid: cube::mk_cube_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            outline: outline::mk_outline_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            glass: glass::mk_glass_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
        }
    }
}
