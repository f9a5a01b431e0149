//! Texture loading for the viewer's two static meshes.
//!
//! Textures are read once at startup. A missing or corrupt file is never
//! fatal: its slot stays empty and the renderer draws a flat color instead.
//!
//! # Layout
//! ```text
//! <root>/skybox/posx.jpg negx.jpg posz.jpg negz.jpg posy.jpg negy.jpg
//! <root>/grass.jpg
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Skybox files in cube-face order: face `i` of the skybox table samples file `i`.
pub const SKYBOX_FACE_FILES: [&str; 6] = [
    "skybox/posx.jpg",
    "skybox/negx.jpg",
    "skybox/posz.jpg",
    "skybox/negz.jpg",
    "skybox/posy.jpg",
    "skybox/negy.jpg",
];

pub const GROUND_FILE: &str = "grass.jpg";

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Read and decode one image file into RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!("loaded texture {} ({width}x{height})", path.display());
    Ok(TextureImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Load a texture, logging and swallowing any failure.
fn load_or_fallback(path: &Path) -> Option<TextureImage> {
    match load_texture(path) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!("{e}");
            tracing::warn!("texture {} not found, using color face instead", path.display());
            None
        }
    }
}

/// Every texture the scene can use. `None` means "draw a flat color".
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    pub skybox: [Option<TextureImage>; 6],
    pub ground: Option<TextureImage>,
}

impl TextureSet {
    /// Load all textures under `root`. Never fails.
    pub fn load(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let skybox = SKYBOX_FACE_FILES.map(|file| load_or_fallback(&root.join(file)));
        let ground = load_or_fallback(&root.join(GROUND_FILE));
        let set = Self { skybox, ground };
        tracing::info!(
            "textures loaded from {}: {}/7 available",
            root.display(),
            set.loaded_count()
        );
        set
    }

    /// Which skybox faces have a texture.
    pub fn skybox_mask(&self) -> [bool; 6] {
        std::array::from_fn(|i| self.skybox[i].is_some())
    }

    pub fn has_ground(&self) -> bool {
        self.ground.is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.skybox.iter().filter(|t| t.is_some()).count() + usize::from(self.ground.is_some())
    }
}
