use crate::transform::{TransformOp, ViewTransform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunable constants for the fly camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// World units moved per frame for each held intent.
    pub speed: f32,
    /// Degrees of rotation per unit of mouse delta.
    pub mouse_sensitivity: f32,
    /// Lowest allowed eye height.
    pub min_height: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` degrees.
    pub pitch_limit: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: 0.2,
            mouse_sensitivity: 0.2,
            min_height: 0.5,
            pitch_limit: 89.0,
        }
    }
}

/// Largest pitch magnitude the basis math can take without hitting the pole.
pub const MAX_PITCH: f32 = 89.0;

impl CameraSettings {
    /// Copy with non-finite values replaced by defaults and the pitch limit
    /// kept inside `[0, MAX_PITCH]`.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };
        Self {
            speed: finite_or(self.speed, defaults.speed),
            mouse_sensitivity: finite_or(self.mouse_sensitivity, defaults.mouse_sensitivity),
            min_height: finite_or(self.min_height, defaults.min_height),
            pitch_limit: finite_or(self.pitch_limit, defaults.pitch_limit).clamp(0.0, MAX_PITCH),
        }
    }
}

/// Held-key movement intents. They persist across frames until toggled off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntents {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntents {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// Basis vectors derived from yaw/pitch.
///
/// `right` carries the pitch in its Y component and `forward` is flattened
/// onto the ground plane by the cross product with world up. Movement along
/// `forward` therefore never changes height; only `up` does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Build the basis from angles in degrees.
    pub fn from_angles(yaw: f32, pitch: f32) -> Self {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        let right = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        let forward = right.cross(Vec3::Y).normalize();
        let up = forward.cross(right);
        Self { right, forward, up }
    }
}

/// First-person camera with position, yaw and pitch in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub intents: MoveIntents,
    yaw: f32,
    pitch: f32,
    settings: CameraSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Camera at `position` with zero orientation and default settings.
    pub fn new(position: Vec3) -> Self {
        Self::with_settings(position, CameraSettings::default())
    }

    pub fn with_settings(position: Vec3, settings: CameraSettings) -> Self {
        let sanitized = settings.sanitized();
        if sanitized != settings {
            tracing::warn!(?settings, ?sanitized, "camera settings out of range, adjusted");
        }
        Self {
            position,
            intents: MoveIntents::default(),
            yaw: 0.0,
            pitch: 0.0,
            settings: sanitized,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Assign orientation directly. Pitch is clamped, yaw is left unbounded.
    /// Non-finite angles are ignored.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        if !(yaw.is_finite() && pitch.is_finite()) {
            return;
        }
        self.yaw = yaw;
        self.pitch = self.clamp_pitch(pitch);
    }

    /// Accumulate a raw mouse delta. Moving the mouse up (negative `dy`) pitches up.
    /// Non-finite deltas are dropped.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            tracing::debug!(dx, dy, "dropping non-finite mouse delta");
            return;
        }
        let s = self.settings.mouse_sensitivity;
        self.yaw += dx * s;
        self.pitch = self.clamp_pitch(self.pitch - dy * s);
    }

    /// Basis for the current orientation.
    pub fn basis(&self) -> Basis {
        Basis::from_angles(self.yaw, self.clamp_pitch(self.pitch))
    }

    /// Advance one frame: apply every held intent, then clamp to the ground.
    ///
    /// Simultaneous intents add up without normalization, so diagonal moves
    /// cover more distance than straight ones.
    pub fn update(&mut self) {
        self.pitch = self.clamp_pitch(self.pitch);
        let Basis { right, forward, up } = self.basis();
        let speed = self.settings.speed;
        let held = self.intents;

        if held.forward {
            self.position -= forward * speed;
        }
        if held.backward {
            self.position += forward * speed;
        }
        if held.left {
            self.position -= right * speed;
        }
        if held.right {
            self.position += right * speed;
        }
        if held.up {
            self.position += up * speed;
        }
        if held.down {
            self.position -= up * speed;
        }

        if self.position.y < self.settings.min_height {
            self.position.y = self.settings.min_height;
        }

        tracing::trace!(
            x = self.position.x,
            y = self.position.y,
            z = self.position.z,
            "camera updated"
        );
    }

    /// Transforms to apply before drawing the scene, outermost first.
    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform::new([
            TransformOp::Rotate {
                degrees: -self.pitch,
                axis: Vec3::X,
            },
            TransformOp::Rotate {
                degrees: self.yaw,
                axis: Vec3::Y,
            },
            TransformOp::Translate(-self.position),
        ])
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        let limit = self.settings.pitch_limit;
        pitch.clamp(-limit, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn sweep() -> impl Iterator<Item = (f32, f32)> {
        (-8..=8).flat_map(|y| (-89..=89).step_by(7).map(move |p| (y as f32 * 45.0 + 3.0, p as f32)))
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::ZERO);
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
        assert!(!cam.intents.any());
        assert_eq!(cam.settings().speed, 0.2);
    }

    #[test]
    fn basis_vectors_are_unit_length() {
        for (yaw, pitch) in sweep() {
            let b = Basis::from_angles(yaw, pitch);
            assert!((b.right.length() - 1.0).abs() < EPS, "right at {yaw},{pitch}");
            assert!((b.forward.length() - 1.0).abs() < EPS, "forward at {yaw},{pitch}");
        }
    }

    #[test]
    fn forward_is_orthogonal_to_right() {
        for (yaw, pitch) in sweep() {
            let b = Basis::from_angles(yaw, pitch);
            assert!(b.forward.dot(b.right).abs() < EPS, "at {yaw},{pitch}");
        }
    }

    #[test]
    fn forward_stays_on_ground_plane() {
        for (yaw, pitch) in sweep() {
            assert!(Basis::from_angles(yaw, pitch).forward.y.abs() < EPS);
        }
    }

    #[test]
    fn zero_orientation_basis() {
        let b = Basis::from_angles(0.0, 0.0);
        assert!(approx(b.right, Vec3::X));
        assert!(approx(b.forward, Vec3::Z));
        assert!(approx(b.up, Vec3::Y));
    }

    #[test]
    fn idle_update_only_clamps() {
        let mut cam = Camera::new(Vec3::new(3.0, 2.0, -4.0));
        cam.set_orientation(37.0, -12.0);
        cam.update();
        assert_eq!(cam.position, Vec3::new(3.0, 2.0, -4.0));

        let mut low = Camera::new(Vec3::new(1.0, -3.0, 1.0));
        low.update();
        assert_eq!(low.position, Vec3::new(1.0, 0.5, 1.0));
    }

    #[test]
    fn move_forward_subtracts_forward() {
        let mut cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        cam.intents.forward = true;
        cam.update();
        // forward is +Z at zero orientation, so "forward" walks toward -Z.
        assert!(approx(cam.position, Vec3::new(0.0, 1.0, -0.2)));
    }

    #[test]
    fn each_intent_moves_along_its_axis() {
        let start = Vec3::new(0.0, 5.0, 0.0);
        let cases: [(fn(&mut MoveIntents), Vec3); 6] = [
            (|i| i.forward = true, Vec3::new(0.0, 0.0, -0.2)),
            (|i| i.backward = true, Vec3::new(0.0, 0.0, 0.2)),
            (|i| i.left = true, Vec3::new(-0.2, 0.0, 0.0)),
            (|i| i.right = true, Vec3::new(0.2, 0.0, 0.0)),
            (|i| i.up = true, Vec3::new(0.0, 0.2, 0.0)),
            (|i| i.down = true, Vec3::new(0.0, -0.2, 0.0)),
        ];
        for (set, delta) in cases {
            let mut cam = Camera::new(start);
            set(&mut cam.intents);
            cam.update();
            assert!(approx(cam.position - start, delta), "expected {delta}");
        }
    }

    #[test]
    fn intents_persist_across_updates() {
        let mut cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        cam.intents.right = true;
        cam.update();
        cam.update();
        cam.update();
        assert!(cam.intents.right);
        assert!(approx(cam.position, Vec3::new(0.6, 1.0, 0.0)));
    }

    #[test]
    fn diagonal_movement_is_not_normalized() {
        let start = Vec3::new(2.0, 3.0, 1.0);
        let (yaw, pitch) = (30.0, 20.0);

        let step = |f: fn(&mut MoveIntents)| {
            let mut cam = Camera::new(start);
            cam.set_orientation(yaw, pitch);
            f(&mut cam.intents);
            cam.update();
            cam.position - start
        };

        let fwd = step(|i| i.forward = true);
        let right = step(|i| i.right = true);
        let both = step(|i| {
            i.forward = true;
            i.right = true;
        });
        assert!(approx(both, fwd + right));
        assert!(both.length() > fwd.length());
    }

    #[test]
    fn opposite_intents_cancel() {
        let start = Vec3::new(0.0, 2.0, 0.0);
        let mut cam = Camera::new(start);
        cam.set_orientation(15.0, 10.0);
        cam.intents.forward = true;
        cam.intents.backward = true;
        cam.intents.left = true;
        cam.intents.right = true;
        cam.update();
        assert!(approx(cam.position, start));
    }

    #[test]
    fn ground_clamp_holds_under_sustained_descent() {
        let mut cam = Camera::new(Vec3::new(0.0, 4.0, 0.0));
        cam.set_orientation(-60.0, 45.0);
        cam.intents.down = true;
        for _ in 0..200 {
            cam.update();
            assert!(cam.position.y >= 0.5);
        }
        assert_eq!(cam.position.y, 0.5);
    }

    #[test]
    fn pitch_is_clamped_before_update() {
        let mut cam = Camera::new(Vec3::new(0.0, 10.0, 0.0));
        cam.set_orientation(0.0, 200.0);
        assert_eq!(cam.pitch(), 89.0);

        cam.intents.up = true;
        cam.update();
        let expected = Vec3::new(0.0, 10.0, 0.0) + Basis::from_angles(0.0, 89.0).up * 0.2;
        assert!(approx(cam.position, expected));
        assert!(cam.position.is_finite());
    }

    #[test]
    fn look_accumulates_and_clamps() {
        let mut cam = Camera::default();
        cam.look(10.0, -5.0);
        assert!((cam.yaw() - 2.0).abs() < EPS);
        assert!((cam.pitch() - 1.0).abs() < EPS);

        cam.look(0.0, 1000.0);
        assert_eq!(cam.pitch(), -89.0);

        cam.look(3600.0, 0.0);
        assert!((cam.yaw() - 722.0).abs() < 1e-3);
    }

    #[test]
    fn yaw_wraps_through_trig() {
        let a = Basis::from_angles(30.0, 10.0);
        let b = Basis::from_angles(390.0, 10.0);
        assert!((a.right - b.right).abs().max_element() < 1e-4);
        assert!((a.forward - b.forward).abs().max_element() < 1e-4);
    }

    #[test]
    fn custom_settings_apply() {
        let settings = CameraSettings {
            speed: 1.0,
            min_height: 2.0,
            ..CameraSettings::default()
        };
        let mut cam = Camera::with_settings(Vec3::new(0.0, 2.5, 0.0), settings);
        cam.intents.down = true;
        cam.update();
        assert_eq!(cam.position.y, 2.0);
    }

    #[test]
    fn view_transform_order() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        cam.set_orientation(45.0, 30.0);
        let ops = cam.view_transform();
        assert_eq!(
            ops.ops(),
            &[
                TransformOp::Rotate {
                    degrees: -30.0,
                    axis: Vec3::X
                },
                TransformOp::Rotate {
                    degrees: 45.0,
                    axis: Vec3::Y
                },
                TransformOp::Translate(Vec3::new(-1.0, -2.0, -3.0)),
            ]
        );
    }

    #[test]
    fn bad_pitch_limit_is_sanitized() {
        for limit in [-1.0, f32::NAN, 90.0, 400.0] {
            let settings = CameraSettings {
                pitch_limit: limit,
                ..CameraSettings::default()
            };
            let mut cam = Camera::with_settings(Vec3::ZERO, settings);
            cam.look(1.0, -1000.0);
            cam.update();
            assert!(cam.pitch().abs() <= MAX_PITCH, "limit {limit}");
            assert!(cam.position.is_finite(), "limit {limit}");
        }
    }

    #[test]
    fn non_finite_settings_fall_back_to_defaults() {
        let settings = CameraSettings {
            speed: f32::INFINITY,
            mouse_sensitivity: f32::NAN,
            min_height: f32::NAN,
            pitch_limit: 45.0,
        };
        let cam = Camera::with_settings(Vec3::ZERO, settings);
        let s = cam.settings();
        assert_eq!(s.speed, 0.2);
        assert_eq!(s.mouse_sensitivity, 0.2);
        assert_eq!(s.min_height, 0.5);
        assert_eq!(s.pitch_limit, 45.0);
    }

    #[test]
    fn non_finite_mouse_delta_is_ignored() {
        let mut cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        cam.look(10.0, 5.0);
        let (yaw, pitch) = (cam.yaw(), cam.pitch());
        cam.look(0.0, f32::NAN);
        cam.look(f32::INFINITY, 0.0);
        cam.set_orientation(f32::NAN, 0.0);
        assert_eq!((cam.yaw(), cam.pitch()), (yaw, pitch));

        cam.intents.forward = true;
        cam.update();
        assert!(cam.position.is_finite());
        assert!(cam.position.y >= 0.5);
    }
}
