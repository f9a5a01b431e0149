use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl Projection {
    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Hide and confine the cursor for mouse look.
    pub grab_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Grass Platform with First-Person Camera".into(),
            width: 800,
            height: 600,
            grab_cursor: true,
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn projection_defaults() {
        let p = Projection::default();
        assert_eq!(p.fov_y_degrees, 45.0);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 500.0);
    }

    #[test]
    fn projection_maps_near_and_far_planes() {
        let m = Projection::default().matrix(800.0 / 600.0);
        let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -500.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn window_aspect() {
        let w = WindowConfig::default();
        assert!((w.aspect() - 4.0 / 3.0).abs() < 1e-6);
        let zero = WindowConfig {
            height: 0,
            ..WindowConfig::default()
        };
        assert!(zero.aspect().is_finite());
    }
}
