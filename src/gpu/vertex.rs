use bytemuck::{Pod, Zeroable};

/// Vertex data for GPU rendering
/// Each vertex has a 2D position and a premultiplied RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Vertex buffer layout descriptor for wgpu
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Uniform data passed to shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    /// 4x4 view-projection matrix (column-major)
    pub view_proj: [[f32; 4]; 4],
}

impl Uniforms {
    /// Maps viewport pixels (0,0)-(width,height) to clip space, y pointing down
    pub fn orthographic(width: f32, height: f32) -> Self {
        let proj = glam::Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0);
        Self {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

/// A batch of vertices and indices ready for GPU upload
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another mesh, offsetting its indices
    pub fn extend(&mut self, other: Mesh) {
        let index_offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices
            .extend(other.indices.into_iter().map(|i| i + index_offset));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
