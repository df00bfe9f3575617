//! Central GPU and window context.
//!
//! Owns the surface, device, queue, camera, lights and the three render
//! pipelines. Everything here is set up once at startup; per-frame work only
//! writes uniforms and swaps the depth texture on resize.

use std::sync::Arc;

use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, OrbitController, Projection},
    data_structures::texture::Texture,
    pipelines::{light::LightResources, Pipelines},
};

/// Height of the orthographic frustum in world units.
const FRUSTUM_HEIGHT: f32 = 10.0;
/// The middle of the stepped demo shape; both camera target and orbit center.
const SCENE_CENTER: (f32, f32, f32) = (1.5, 1.5, 1.0);
/// Radians per second of automatic orbit.
const ORBIT_SPEED: f32 = 0.5;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub lights: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        log::info!("surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an srgb surface; a linear format would render
        // everything darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new((0.0, 5.0, 10.0), SCENE_CENTER);
        let controller = OrbitController::new(&camera, ORBIT_SPEED);
        let camera = CameraResources::new(&device, camera, controller);
        let projection = Projection::new(config.width, config.height, FRUSTUM_HEIGHT, 0.1, 1000.0);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let lights = LightResources::new(&device);

        let pipelines = Pipelines::new(
            &device,
            &config,
            &camera.bind_group_layout,
            &lights.bind_group_layout,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            lights,
            pipelines,
            // Dark grey backdrop.
            clear_colour: wgpu::Color {
                r: 0.04,
                g: 0.04,
                b: 0.04,
                a: 1.0,
            },
        })
    }
}
