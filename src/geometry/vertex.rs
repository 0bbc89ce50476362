#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlagVertex {
    pub position: [f32; 4],
    pub normal: [f32; 4],
    pub tex_coord: [f32; 4],
}

impl FlagVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x4,  // position
        1 => Float32x4,  // normal
        2 => Float32x4,  // tex_coord (only .xy sampled)
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FlagVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Builds a vertex from 3D position, 3D normal, and 2D texture
    /// coordinates, filling in the homogeneous components.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position: [position[0], position[1], position[2], 1.0],
            normal: [normal[0], normal[1], normal[2], 0.0],
            tex_coord: [tex_coord[0], tex_coord[1], 0.0, 0.0],
        }
    }
}
