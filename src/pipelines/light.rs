use instant::Duration;
use wgpu::util::DeviceExt;

/// How many point lights circle the construction.
pub const POINT_LIGHT_COUNT: usize = 3;

/// Inner cyan, mid blue, outer deep blue, evenly spread on a circle.
const LIGHT_COLORS: [[f32; 3]; POINT_LIGHT_COUNT] =
    [[0.0, 1.0, 1.0], [0.0, 0.53, 1.0], [0.0, 0.0, 1.0]];
const LIGHT_INTENSITY: f32 = 1.5;
const LIGHT_RANGE: f32 = 15.0;
const LIGHT_RADIUS: f32 = 5.0;
const LIGHT_HEIGHT: f32 = 3.0;
const AMBIENT: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    /// xyz = world position, w = range.
    positions: [[f32; 4]; POINT_LIGHT_COUNT],
    /// rgb = colour, a = intensity.
    colors: [[f32; 4]; POINT_LIGHT_COUNT],
    /// rgb = colour, a = intensity.
    ambient: [f32; 4],
}

impl LightsUniform {
    fn new() -> Self {
        let mut positions = [[0.0; 4]; POINT_LIGHT_COUNT];
        let mut colors = [[0.0; 4]; POINT_LIGHT_COUNT];
        for i in 0..POINT_LIGHT_COUNT {
            let angle = i as f32 * std::f32::consts::TAU / POINT_LIGHT_COUNT as f32;
            positions[i] = [
                angle.sin() * LIGHT_RADIUS,
                LIGHT_HEIGHT,
                angle.cos() * LIGHT_RADIUS,
                LIGHT_RANGE,
            ];
            colors[i] = [
                LIGHT_COLORS[i][0],
                LIGHT_COLORS[i][1],
                LIGHT_COLORS[i][2],
                LIGHT_INTENSITY,
            ];
        }
        Self {
            positions,
            colors,
            ambient: AMBIENT,
        }
    }

    /// Bob each light vertically, phase-shifted by its x position so the
    /// three never move in lockstep.
    fn bob(&mut self, time: Duration) {
        let t = time.as_secs_f32();
        for position in &mut self.positions {
            position[1] = LIGHT_HEIGHT + (t + position[0]).sin() * 0.5;
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, uniform: LightsUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Lights Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
        label: Some("lights_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("lights_bind_group"),
    })
}

/// The scene's point lights plus ambient term, as one uniform.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightsUniform::new();
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&mut self, time: Duration, queue: &wgpu::Queue) {
        self.uniform.bob(time);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
