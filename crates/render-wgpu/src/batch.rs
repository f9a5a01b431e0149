use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use skyview_render::{DepthWrite, Quad, Surface, TextureSlot};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub lit: f32,
}

impl QuadVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32,
    ];
}

/// One draw call: six vertices sharing a texture and depth mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DrawCall {
    pub first_vertex: u32,
    pub texture: Option<TextureSlot>,
    pub depth: DepthWrite,
}

/// Quads collected between `begin_frame` and `end_frame`.
#[derive(Debug, Default)]
pub(crate) struct FrameBatch {
    pub view_proj: Mat4,
    pub vertices: Vec<QuadVertex>,
    pub draws: Vec<DrawCall>,
}

pub(crate) const VERTICES_PER_QUAD: u32 = 6;

impl FrameBatch {
    pub fn reset(&mut self, view_proj: Mat4) {
        self.view_proj = view_proj;
        self.vertices.clear();
        self.draws.clear();
    }

    pub fn push(&mut self, quad: &Quad, depth: DepthWrite) {
        let (texture, color) = match quad.surface {
            Surface::Textured(slot) => (Some(slot), [1.0; 3]),
            Surface::Flat(color) => (None, color),
        };
        let normal = quad.normal.to_array();
        let lit = if quad.lit { 1.0 } else { 0.0 };

        self.draws.push(DrawCall {
            first_vertex: self.vertices.len() as u32,
            texture,
            depth,
        });
        self.vertices
            .extend(quad.geometry.triangles().map(|(p, uv)| QuadVertex {
                position: p.to_array(),
                uv: uv.to_array(),
                color,
                normal,
                lit,
            }));
    }
}
