use anyhow::{bail, Result};
use wgpu::util::DeviceExt;

use super::FlagVertex;

/// CPU-side output of a mesh builder, ready to hand to [`Mesh::new`].
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<FlagVertex>,
    pub indices: Vec<u16>,
}

/// Update-frequency hint for a mesh's vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshUsage {
    /// Written once at creation.
    Static,
    /// Refreshed from the CPU every frame.
    Stream,
}

impl MeshUsage {
    fn buffer_usages(self) -> wgpu::BufferUsages {
        match self {
            MeshUsage::Static => wgpu::BufferUsages::VERTEX,
            MeshUsage::Stream => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    usage: MeshUsage,
    vertex_count: u32,
}

impl Mesh {
    /// Creates the device-side vertex and index buffers from CPU data. The
    /// index buffer is always static; the vertex buffer follows `usage`.
    /// The CPU slices are only read for the duration of the call.
    ///
    /// Every index must address a vertex in `vertices`; a device-side
    /// allocation failure is surfaced rather than left to the uncaptured
    /// error handler.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        vertices: &[FlagVertex],
        indices: &[u16],
        usage: MeshUsage,
    ) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| (i as usize) >= vertices.len()) {
            bail!(
                "mesh {:?}: index {} out of range for {} vertices",
                name,
                bad,
                vertices.len()
            );
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: usage.buffer_usages(),
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            bail!("mesh {:?}: device rejected buffer allocation: {}", name, e);
        }

        Ok(Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
            usage,
            vertex_count: vertices.len() as u32,
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Replaces the vertex buffer's contents in full. This is a data refresh
    /// for animation, not a shape change: the mesh must have been created
    /// with [`MeshUsage::Stream`], and the vertex count and layout must match
    /// creation time. The index buffer is untouched.
    pub fn upload_vertices(&self, queue: &wgpu::Queue, vertices: &[FlagVertex]) -> Result<()> {
        if self.usage != MeshUsage::Stream {
            bail!("mesh {:?}: vertex upload into a static mesh", self.name);
        }
        if vertices.len() as u32 != self.vertex_count {
            bail!(
                "mesh {:?}: upload of {} vertices into a buffer created for {}",
                self.name,
                vertices.len(),
                self.vertex_count
            );
        }
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        Ok(())
    }

    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}
