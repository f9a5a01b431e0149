//! Rendering Adapter: the static scene and a renderer-agnostic quad interface.
//!
//! # Invariants
//! - Renderers never mutate the camera.
//! - The view transform is issued before any geometry in a frame.
//! - The skybox is drawn first and never writes depth.

pub mod mesh;
mod renderer;
mod scene;

pub use mesh::{Face, QuadGeometry};
pub use renderer::{DebugTextSink, QuadSink};
pub use scene::{
    DepthWrite, GROUND_FALLBACK_COLOR, Quad, SKYBOX_FALLBACK_COLORS, Scene, Surface, TextureSlot,
};

pub fn crate_info() -> &'static str {
    "skyview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
