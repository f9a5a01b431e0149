use crate::scene::{DepthWrite, Quad, Surface, TextureSlot};
use skyview_camera::{TransformOp, ViewTransform};
use std::fmt::Write;

/// Backend-agnostic draw interface. All renderers implement this trait.
///
/// A frame is `begin_frame`, any number of `submit` calls in draw order,
/// then `end_frame`. The view transform applies to every quad of the frame.
pub trait QuadSink {
    /// What finishing a frame produces.
    type Output;

    fn begin_frame(&mut self, view: &ViewTransform);

    fn submit(&mut self, quad: &Quad, depth: DepthWrite);

    fn end_frame(&mut self) -> Self::Output;
}

/// Text renderer: produces a human-readable report of one frame.
///
/// Useful for CLI output, logging, and testing the draw interface.
#[derive(Debug, Default)]
pub struct DebugTextSink {
    out: String,
    quads: usize,
}

impl DebugTextSink {
    pub fn new() -> Self {
        Self::default()
    }
}

fn describe_op(op: &TransformOp) -> String {
    match op {
        TransformOp::Rotate { degrees, axis } => format!(
            "rotate {:.2} deg about ({:.1}, {:.1}, {:.1})",
            degrees, axis.x, axis.y, axis.z
        ),
        TransformOp::Translate(t) => format!("translate ({:.2}, {:.2}, {:.2})", t.x, t.y, t.z),
    }
}

impl QuadSink for DebugTextSink {
    type Output = String;

    fn begin_frame(&mut self, view: &ViewTransform) {
        self.out.clear();
        self.quads = 0;
        self.out.push_str("=== Frame ===\n");
        for op in view.ops() {
            let _ = writeln!(self.out, "view: {}", describe_op(op));
        }
    }

    fn submit(&mut self, quad: &Quad, depth: DepthWrite) {
        let surface = match quad.surface {
            Surface::Textured(TextureSlot::Skybox(i)) => format!("texture skybox[{i}]"),
            Surface::Textured(TextureSlot::Ground) => "texture ground".to_string(),
            Surface::Flat([r, g, b]) => format!("color ({r:.1}, {g:.1}, {b:.1})"),
        };
        let c = quad.geometry.center();
        let _ = writeln!(
            self.out,
            "  quad#{} center=({:.1}, {:.1}, {:.1}) {} depth_write={} lit={}",
            self.quads,
            c.x,
            c.y,
            c.z,
            surface,
            depth == DepthWrite::Enabled,
            quad.lit
        );
        self.quads += 1;
    }

    fn end_frame(&mut self) -> String {
        let _ = writeln!(self.out, "Quads: {}", self.quads);
        std::mem::take(&mut self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scene;
    use glam::Vec3;
    use skyview_camera::Camera;

    #[test]
    fn debug_sink_full_scene() {
        let scene = Scene::new([true; 6], true);
        let camera = Camera::new(Vec3::new(1.0, 1.0, 2.0));
        let mut sink = DebugTextSink::new();
        let output = scene.draw(&camera, &mut sink);

        assert!(output.starts_with("=== Frame ===\n"));
        assert!(output.contains("view: translate (-1.00, -1.00, -2.00)"));
        assert!(output.contains("texture skybox[0]"));
        assert!(output.contains("texture ground"));
        assert!(output.contains("Quads: 7"));
    }

    #[test]
    fn debug_sink_reports_fallback_colors() {
        let scene = Scene::new([false; 6], false);
        let mut sink = DebugTextSink::new();
        let output = scene.draw(&Camera::default(), &mut sink);
        assert!(output.contains("color (1.0, 0.5, 0.5)"));
        assert!(output.contains("color (0.0, 0.6, 0.0)"));
    }

    #[test]
    fn debug_sink_resets_between_frames() {
        let scene = Scene::new([false; 6], true).without_ground();
        let mut sink = DebugTextSink::new();
        let first = scene.draw(&Camera::default(), &mut sink);
        let second = scene.draw(&Camera::default(), &mut sink);
        assert_eq!(first, second);
        assert!(second.contains("Quads: 6"));
    }
}
