//! Procedural cube geometry.
//!
//! The whole scene is built from one cube shape at three sizes (inner cube,
//! glass shell, edge outline), so meshes are generated in code rather than
//! loaded from model files. Vertices carry position and normal only; all
//! colour lives in the per-instance data.

use wgpu::util::DeviceExt;

/// Anything that can describe its vertex buffer layout to a pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for CubeVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<CubeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// GPU-resident cube geometry plus how to draw it.
pub struct CubeMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub topology: wgpu::PrimitiveTopology,
}

impl CubeMesh {
    /// A solid cube of edge length `size` centered on the origin, with flat
    /// per-face normals (24 vertices, 36 indices).
    pub fn solid(device: &wgpu::Device, size: f32, label: &str) -> Self {
        let h = size / 2.0;
        // One quad per face so each vertex carries the face normal.
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +X
            (
                [1.0, 0.0, 0.0],
                [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
            ),
            // -X
            (
                [-1.0, 0.0, 0.0],
                [[-h, -h, h], [-h, h, h], [-h, h, -h], [-h, -h, -h]],
            ),
            // +Y
            (
                [0.0, 1.0, 0.0],
                [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]],
            ),
            // -Y
            (
                [0.0, -1.0, 0.0],
                [[-h, -h, h], [-h, -h, -h], [h, -h, -h], [h, -h, h]],
            ),
            // +Z
            (
                [0.0, 0.0, 1.0],
                [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            ),
            // -Z
            (
                [0.0, 0.0, -1.0],
                [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices: Vec<u16> = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u16;
            for position in corners {
                vertices.push(CubeVertex { position, normal });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::upload(
            device,
            &vertices,
            &indices,
            wgpu::PrimitiveTopology::TriangleList,
            label,
        )
    }

    /// The twelve edges of a cube of edge length `size`, as a line list
    /// (8 vertices, 24 indices). Normals are unused by the outline shader
    /// but kept so both meshes share one vertex type.
    pub fn edges(device: &wgpu::Device, size: f32, label: &str) -> Self {
        let h = size / 2.0;
        let corners = [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ];
        let vertices: Vec<CubeVertex> = corners
            .into_iter()
            .map(|position| CubeVertex {
                position,
                normal: [0.0, 1.0, 0.0],
            })
            .collect();
        let indices: Vec<u16> = vec![
            0, 1, 1, 2, 2, 3, 3, 0, // bottom ring
            4, 5, 5, 6, 6, 7, 7, 4, // top ring
            0, 4, 1, 5, 2, 6, 3, 7, // uprights
        ];

        Self::upload(
            device,
            &vertices,
            &indices,
            wgpu::PrimitiveTopology::LineList,
            label,
        )
    }

    fn upload(
        device: &wgpu::Device,
        vertices: &[CubeVertex],
        indices: &[u16],
        topology: wgpu::PrimitiveTopology,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            topology,
        }
    }
}

/// Instanced draw calls for cube meshes.
pub trait DrawCubes<'a> {
    fn draw_cubes_instanced(
        &mut self,
        mesh: &'a CubeMesh,
        instances: std::ops::Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawCubes<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_cubes_instanced(
        &mut self,
        mesh: &'b CubeMesh,
        instances: std::ops::Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, light_bind_group, &[]);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }
}
