use crate::mesh::{self, QuadGeometry};
use crate::renderer::QuadSink;
use glam::Vec3;
use skyview_camera::Camera;

/// Flat colors for skybox faces without a texture, in face order.
pub const SKYBOX_FALLBACK_COLORS: [[f32; 3]; 6] = [
    [1.0, 0.5, 0.5],
    [0.5, 0.5, 1.0],
    [0.5, 1.0, 0.5],
    [1.0, 1.0, 0.5],
    [0.5, 1.0, 1.0],
    [1.0, 0.5, 1.0],
];

/// Flat color for the ground without a texture.
pub const GROUND_FALLBACK_COLOR: [f32; 3] = [0.0, 0.6, 0.0];

/// Which loaded texture a quad samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Skybox(usize),
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Textured(TextureSlot),
    Flat([f32; 3]),
}

/// Whether a quad writes to the depth buffer. Depth testing is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthWrite {
    Enabled,
    Disabled,
}

/// A quad ready for submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub geometry: QuadGeometry,
    pub surface: Surface,
    /// Shading normal; only meaningful when `lit`.
    pub normal: Vec3,
    /// Apply the directional light.
    pub lit: bool,
}

/// The two static meshes: a skybox and an optional ground plane.
#[derive(Debug, Clone)]
pub struct Scene {
    skybox: [Quad; 6],
    ground: Option<Quad>,
}

impl Scene {
    /// Build the scene. Faces whose texture is missing fall back to flat colors.
    pub fn new(skybox_textured: [bool; 6], ground_textured: bool) -> Self {
        let faces = mesh::skybox_faces(mesh::SKYBOX_SIZE);
        let skybox = std::array::from_fn(|i| Quad {
            geometry: faces[i],
            surface: if skybox_textured[i] {
                Surface::Textured(TextureSlot::Skybox(i))
            } else {
                Surface::Flat(SKYBOX_FALLBACK_COLORS[i])
            },
            normal: Vec3::Z,
            lit: false,
        });
        let ground = Quad {
            geometry: mesh::ground_quad(mesh::GROUND_SIZE, mesh::GROUND_Y),
            surface: if ground_textured {
                Surface::Textured(TextureSlot::Ground)
            } else {
                Surface::Flat(GROUND_FALLBACK_COLOR)
            },
            normal: Vec3::Y,
            lit: true,
        };
        tracing::debug!(
            textured_faces = skybox_textured.iter().filter(|t| **t).count(),
            ground_textured,
            "scene built"
        );
        Self {
            skybox,
            ground: Some(ground),
        }
    }

    /// Drop the ground plane, leaving only the skybox.
    pub fn without_ground(mut self) -> Self {
        self.ground = None;
        self
    }

    pub fn skybox(&self) -> &[Quad; 6] {
        &self.skybox
    }

    pub fn ground(&self) -> Option<&Quad> {
        self.ground.as_ref()
    }

    /// Submit one frame: view transform first, then the skybox without depth
    /// writes, then the ground.
    pub fn draw<S: QuadSink>(&self, camera: &Camera, sink: &mut S) -> S::Output {
        sink.begin_frame(&camera.view_transform());
        for quad in &self.skybox {
            sink.submit(quad, DepthWrite::Disabled);
        }
        if let Some(ground) = &self.ground {
            sink.submit(ground, DepthWrite::Enabled);
        }
        sink.end_frame()
    }
}
