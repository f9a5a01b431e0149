//! Camera Model: first-person fly camera driven by held-key intents and mouse look.
//!
//! The camera owns its position and orientation exclusively. The input layer
//! writes intents and orientation; the frame loop calls [`Camera::update`] once
//! per frame and applies [`Camera::view_transform`] before submitting geometry.
//!
//! # Invariants
//! - `position.y >= min_height` after every update (ground clamp).
//! - Pitch stays within `[-pitch_limit, pitch_limit]`.
//! - No rendering-API dependency; everything here is plain arithmetic.

mod camera;
mod transform;

pub use camera::{Basis, Camera, CameraSettings, MAX_PITCH, MoveIntents};
pub use transform::{TransformOp, ViewTransform};

pub fn crate_info() -> &'static str {
    "skyview-camera v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("camera"));
    }
}
