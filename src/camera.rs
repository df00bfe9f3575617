//! Orthographic camera, auto-orbit controller and view/projection uniforms.
//!
//! The construction scene is viewed through a fixed-height orthographic
//! frustum that slowly orbits the center of the shape, so the stepped cube
//! arrangement reads as a classic isometric diagram from every side.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};
use instant::Duration;
use wgpu::util::DeviceExt;

/// wgpu clip space covers z in [0, 1] while cgmath produces OpenGL's [-1, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Eye, look-at target and up vector.
#[derive(Debug)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Orthographic projection with a fixed frustum height.
///
/// Resizing keeps the vertical extent constant and scales the horizontal
/// extent by the aspect ratio, so cubes never squash when the window changes.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    frustum_height: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, frustum_height: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            frustum_height,
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        let half_h = self.frustum_height / 2.0;
        let half_w = half_h * self.aspect;
        OPENGL_TO_WGPU_MATRIX
            * cgmath::ortho(-half_w, half_w, -half_h, half_h, self.znear, self.zfar)
    }
}

/// Spins the camera around its target at a constant angular speed.
#[derive(Debug)]
pub struct OrbitController {
    /// Radians per second.
    speed: f32,
    angle: f32,
    radius: f32,
    height: f32,
}

impl OrbitController {
    /// Derive orbit radius and height from the camera's starting placement so
    /// the configured eye position is where the orbit begins.
    pub fn new(camera: &Camera, speed: f32) -> Self {
        let offset = camera.eye - camera.target;
        let radius = Vector3::new(offset.x, 0.0, offset.z).magnitude();
        Self {
            speed,
            angle: offset.x.atan2(offset.z),
            radius,
            height: offset.y,
        }
    }

    pub fn update(&mut self, dt: Duration, camera: &mut Camera) {
        self.angle += self.speed * dt.as_secs_f32();
        camera.eye = camera.target
            + Vector3::new(
                self.angle.sin() * self.radius,
                self.height,
                self.angle.cos() * self.radius,
            );
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.eye.to_homogeneous().into();
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the renderer needs to bind the camera.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: Camera, controller: OrbitController) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Advance the orbit and push the fresh view-projection to the GPU.
    pub fn update(&mut self, dt: Duration, projection: &Projection, queue: &wgpu::Queue) {
        self.controller.update(dt, &mut self.camera);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut camera = Camera::new((0.0, 5.0, 10.0), (1.5, 1.5, 1.0));
        let mut controller = OrbitController::new(&camera, 1.0);
        let before = (camera.eye - camera.target).magnitude();
        for _ in 0..100 {
            controller.update(Duration::from_millis(16), &mut camera);
        }
        let after = (camera.eye - camera.target).magnitude();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn orbit_starts_at_the_configured_eye() {
        let mut camera = Camera::new((0.0, 5.0, 10.0), (1.5, 1.5, 1.0));
        let start = camera.eye;
        let mut controller = OrbitController::new(&camera, 1.0);
        controller.update(Duration::ZERO, &mut camera);
        assert!((camera.eye.x - start.x).abs() < 1e-4);
        assert!((camera.eye.y - start.y).abs() < 1e-4);
        assert!((camera.eye.z - start.z).abs() < 1e-4);
    }
}
