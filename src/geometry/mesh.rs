//! CPU mesh data and its GPU-resident counterpart.

use wgpu::util::DeviceExt;

/// CPU-side mesh: vec4 positions (w = 1), vec4 normals (w = 0), optional
/// vec4 vertex colors, and 32-bit triangle indices.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 4]>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Buffer bindings and draw metadata for one renderable mesh.
///
/// Buffers that a mesh does not carry report `None`; the draw path skips the
/// matching attribute slot.
pub trait Drawable {
    fn position_buffer(&self) -> &wgpu::Buffer;
    fn normal_buffer(&self) -> Option<&wgpu::Buffer>;
    fn color_buffer(&self) -> Option<&wgpu::Buffer>;
    fn index_buffer(&self) -> &wgpu::Buffer;
    fn index_count(&self) -> u32;
    fn topology(&self) -> wgpu::PrimitiveTopology;
}

/// GPU-resident mesh. Created once per geometry instance; buffers are
/// immutable after upload.
pub struct GpuMesh {
    position_buffer: wgpu::Buffer,
    normal_buffer: Option<wgpu::Buffer>,
    color_buffer: Option<wgpu::Buffer>,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    topology: wgpu::PrimitiveTopology,
}

impl GpuMesh {
    /// Upload mesh data to the GPU.
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Position Buffer")),
            contents: bytemuck::cast_slice(&data.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal_buffer = if data.normals.is_empty() {
            None
        } else {
            Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Normal Buffer")),
                contents: bytemuck::cast_slice(&data.normals),
                usage: wgpu::BufferUsages::VERTEX,
            }))
        };

        let color_buffer = data.colors.as_ref().map(|colors| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Color Buffer")),
                contents: bytemuck::cast_slice(colors),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            position_buffer,
            normal_buffer,
            color_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

impl Drawable for GpuMesh {
    fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffer
    }

    fn normal_buffer(&self) -> Option<&wgpu::Buffer> {
        self.normal_buffer.as_ref()
    }

    fn color_buffer(&self) -> Option<&wgpu::Buffer> {
        self.color_buffer.as_ref()
    }

    fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    fn index_count(&self) -> u32 {
        self.index_count
    }

    fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }
}
