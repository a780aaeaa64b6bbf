use wgpu::util::DeviceExt;

use crate::geometry::BoxGeometry;

/// Position, normal, and index buffers for one mesh.
///
/// The three buffers are created together and released together; there is no
/// way to hold a partial set.
pub struct MeshBuffers {
    position: wgpu::Buffer,
    normal: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    /// Uploads `geometry` into static GPU buffers.
    pub fn new(device: &wgpu::Device, geometry: &BoxGeometry) -> Self {
        let position = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("litcube position vbo"),
            contents: bytemuck::cast_slice(geometry.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("litcube normal vbo"),
            contents: bytemuck::cast_slice(geometry.normals()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // 36 u16 indices is 72 bytes, already a multiple of the 4-byte copy alignment.
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("litcube ibo"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            position,
            normal,
            index,
            index_count: geometry.index_count(),
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Binds positions to vertex slot 0, normals to slot 1, and the index buffer.
    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.position.slice(..));
        rpass.set_vertex_buffer(1, self.normal.slice(..));
        rpass.set_index_buffer(self.index.slice(..), wgpu::IndexFormat::Uint16);
    }

    /// Frees the GPU memory now instead of waiting for the last handle to drop.
    pub fn destroy(self) {
        self.position.destroy();
        self.normal.destroy();
        self.index.destroy();
    }
}
