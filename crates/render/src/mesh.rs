use glam::{Vec2, Vec3};

/// Half-extent of the skybox cube.
pub const SKYBOX_SIZE: f32 = 100.0;
/// Half-extent of the ground square.
pub const GROUND_SIZE: f32 = 50.0;
/// Height of the ground plane.
pub const GROUND_Y: f32 = -0.5;
/// Times the grass texture repeats along each ground edge.
pub const GROUND_UV_REPEAT: f32 = 10.0;

/// Four corners of a quad and their texture coordinates, in winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadGeometry {
    pub corners: [Vec3; 4],
    pub uvs: [Vec2; 4],
}

impl QuadGeometry {
    /// Split into two triangles: `0,1,2` and `2,3,0`.
    pub fn triangles(&self) -> [(Vec3, Vec2); 6] {
        [0, 1, 2, 2, 3, 0].map(|i| (self.corners[i], self.uvs[i]))
    }

    pub fn center(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>() / 4.0
    }
}

/// Skybox faces in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }
}

fn quad(corners: [[f32; 3]; 4], uvs: [[f32; 2]; 4]) -> QuadGeometry {
    QuadGeometry {
        corners: corners.map(Vec3::from_array),
        uvs: uvs.map(Vec2::from_array),
    }
}

/// Cube of half-extent `s` centered on the origin, faces in [`Face::ALL`] order.
pub fn skybox_faces(s: f32) -> [QuadGeometry; 6] {
    #[rustfmt::skip]
    let faces = [
        // Front
        quad([[-s, -s,  s], [ s, -s,  s], [ s,  s,  s], [-s,  s,  s]],
             [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        // Back
        quad([[-s, -s, -s], [-s,  s, -s], [ s,  s, -s], [ s, -s, -s]],
             [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]),
        // Left
        quad([[-s, -s, -s], [-s, -s,  s], [-s,  s,  s], [-s,  s, -s]],
             [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        // Right
        quad([[ s, -s,  s], [ s, -s, -s], [ s,  s, -s], [ s,  s,  s]],
             [[1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]),
        // Top
        quad([[-s,  s,  s], [ s,  s,  s], [ s,  s, -s], [-s,  s, -s]],
             [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]),
        // Bottom
        quad([[-s, -s,  s], [-s, -s, -s], [ s, -s, -s], [ s, -s,  s]],
             [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]),
    ];
    faces
}

/// Flat square of half-extent `s` at height `y`, texture repeated [`GROUND_UV_REPEAT`] times.
pub fn ground_quad(s: f32, y: f32) -> QuadGeometry {
    let r = GROUND_UV_REPEAT;
    quad(
        [[-s, y, -s], [s, y, -s], [s, y, s], [-s, y, s]],
        [[0.0, 0.0], [r, 0.0], [r, r], [0.0, r]],
    )
}
