//! wgpu render backend for the viewer.
//!
//! Draws the skybox and ground quads submitted through [`skyview_render::QuadSink`].
//! Loaded textures are uploaded once; missing ones render as flat colors.
//!
//! # Invariants
//! - Renderer never mutates the camera.
//! - Skybox quads never write depth, so the ground always draws over them.

mod batch;
mod gpu;
mod shaders;
mod texture;

pub use gpu::{FrameRecorder, FrameStats, RenderError, WgpuRenderer};
