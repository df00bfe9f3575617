//! Application event loop.
//!
//! A single-scene spin of the usual winit `ApplicationHandler` dance: create
//! the window and GPU context (blocking on a tokio runtime natively, via
//! `spawn_local` plus a user event on wasm), then per frame update the orbit
//! camera, the bobbing lights and the construction scene before drawing the
//! batched pipelines in one render pass.
//!
//! Time handling matters here: the sequencer wants a monotonic timestamp
//! measured from one epoch, so the app keeps the `Instant` it started at and
//! feeds `start.elapsed()` into every update. Stop redrawing and the whole
//! animation freezes, by design.

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    construction::Construction,
    context::Context,
    data_structures::{mesh::DrawCubes, texture::Texture},
    render::Instanced,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Events the async init path posts back into the loop.
pub enum AppEvent {
    Initialized(Box<AppState>),
}

/// GPU context plus scene, bundled once initialization has finished.
pub struct AppState {
    ctx: Context,
    construction: Construction,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let construction = Construction::new(&ctx.device)?;
        Ok(Self {
            ctx,
            construction,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Keep frames coming.
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut solids: Vec<Instanced> = Vec::new();
            let mut outlines: Vec<Instanced> = Vec::new();
            let mut glasses: Vec<Instanced> = Vec::new();
            self.construction
                .render()
                .sort_batches(&mut solids, &mut outlines, &mut glasses);

            render_pass.set_pipeline(&self.ctx.pipelines.solid);
            for instanced in solids {
                draw_batch(&mut render_pass, &self.ctx, instanced);
            }
            render_pass.set_pipeline(&self.ctx.pipelines.outline);
            for instanced in outlines {
                draw_batch(&mut render_pass, &self.ctx, instanced);
            }
            // Glass goes last so blending sees everything behind it.
            render_pass.set_pipeline(&self.ctx.pipelines.glass);
            for instanced in glasses {
                draw_batch(&mut render_pass, &self.ctx, instanced);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn draw_batch<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    ctx: &'a Context,
    instanced: Instanced<'a>,
) {
    // Groups are legitimately empty until their first cube spawns.
    if instanced.amount == 0 {
        return;
    }
    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
    render_pass.draw_cubes_instanced(
        instanced.mesh,
        0..instanced.amount as u32,
        &ctx.camera.bind_group,
        &ctx.lights.bind_group,
    );
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    /// Epoch for the sequencer's monotonic timestamps.
    start: Instant,
    last_frame: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            state: None,
            start: Instant::now(),
            last_frame: Instant::now(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.start.elapsed();
        let dt = self.last_frame.elapsed();
        self.last_frame = Instant::now();

        let Some(state) = &mut self.state else {
            return;
        };

        state
            .ctx
            .camera
            .update(dt, &state.ctx.projection, &state.ctx.queue);
        state.ctx.lights.update(now, &state.ctx.queue);
        state.construction.update(now);
        state.construction.write_to_buffers(&state.ctx.queue);

        match state.render() {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("surface error: {e:?}"),
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("cubeflow");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window)) {
                Ok(state) => self.state = Some(state),
                Err(e) => {
                    log::error!("app initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            }
            if let Some(state) = &mut self.state {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window).await {
                    Ok(state) => assert!(
                        proxy.send_event(AppEvent::Initialized(Box::new(state))).is_ok()
                    ),
                    Err(e) => log::error!("app initialization failed: {e}"),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(*state);
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Build the event loop and run the construction visualization until the
/// window closes.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    #[cfg(target_arch = "wasm32")]
    console_log::init_with_level(log::Level::Info).expect("could not initialize logger");

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let app = App::new(&event_loop)?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = app;
        event_loop.run_app(&mut app)?;
    }
    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = run() {
        log::error!("fatal: {e}");
    }
}
