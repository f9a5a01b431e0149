use glam::{Mat4, Vec3};

/// A single fixed-function style transform command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Rotate about `axis` by `degrees`, counter-clockwise looking down the axis.
    Rotate { degrees: f32, axis: Vec3 },
    Translate(Vec3),
}

impl TransformOp {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            TransformOp::Rotate { degrees, axis } => {
                Mat4::from_axis_angle(axis.normalize(), degrees.to_radians())
            }
            TransformOp::Translate(offset) => Mat4::from_translation(offset),
        }
    }
}

/// Ordered view transform, outermost first.
///
/// Each op post-multiplies the running matrix, so the last op is the first
/// one applied to a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    ops: [TransformOp; 3],
}

impl ViewTransform {
    pub fn new(ops: [TransformOp; 3]) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    /// World-to-eye matrix.
    pub fn matrix(&self) -> Mat4 {
        self.ops
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| acc * op.matrix())
    }

    pub fn to_eye(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Camera;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn identity_orientation_translates_only() {
        let cam = Camera::new(Vec3::new(0.0, 1.0, 5.0));
        let eye = cam.view_transform().to_eye(Vec3::new(0.0, 1.0, 0.0));
        assert!(approx(eye, Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn yaw_turns_view_toward_forward_motion() {
        let mut cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        cam.set_orientation(90.0, 0.0);
        let view = cam.view_transform();
        // A point on +X lands straight ahead (-Z in eye space).
        let eye = view.to_eye(Vec3::new(3.0, 1.0, 0.0));
        assert!(approx(eye, Vec3::new(0.0, 0.0, -3.0)));

        // The forward intent walks toward the same point.
        let start = cam.position;
        cam.intents.forward = true;
        cam.update();
        let step = cam.position - start;
        assert!(step.x > 0.19 && step.z.abs() < 1e-5);
    }

    #[test]
    fn positive_pitch_looks_up() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.set_orientation(0.0, 30.0);
        let up_target = Vec3::new(0.0, 30.0_f32.to_radians().tan(), -1.0);
        let eye = cam.view_transform().to_eye(up_target);
        assert!(eye.y.abs() < 1e-4);
        assert!(eye.z < 0.0);
    }

    #[test]
    fn eye_position_maps_to_origin() {
        let mut cam = Camera::new(Vec3::new(10.0, 20.0, 30.0));
        cam.set_orientation(12.0, -7.0);
        assert!(approx(cam.view_transform().to_eye(cam.position), Vec3::ZERO));
    }

    #[test]
    fn rotate_op_normalizes_axis() {
        let a = TransformOp::Rotate {
            degrees: 90.0,
            axis: Vec3::new(0.0, 5.0, 0.0),
        };
        let m = a.matrix();
        assert!(approx(m.transform_vector3(Vec3::X), Vec3::new(0.0, 0.0, -1.0)));
    }
}
