use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{assets::input::ImageSource, foundation::error::MergeResult};

/// Decode encoded image bytes (any format the `image` crate recognizes) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> MergeResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)?;
    Ok(dyn_img.into_rgba8())
}

/// Turns an [`ImageSource`] into pixels.
///
/// Implementations are shared across loader threads, hence `Send + Sync`.
pub trait ImageLoader: Send + Sync {
    /// Read and decode `src`. Errors are returned to the caller of the merge unchanged.
    fn load(&self, src: &ImageSource) -> MergeResult<RgbaImage>;
}

/// Default loader: reads paths from the local filesystem and decodes in memory.
#[derive(Clone, Debug, Default)]
pub struct FsImageLoader {
    root: Option<PathBuf>,
}

impl FsImageLoader {
    /// Loader that resolves paths as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that resolves relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Root directory used for relative paths, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, src: &ImageSource) -> MergeResult<RgbaImage> {
        match src {
            ImageSource::Path(path) => {
                let path = self.resolve(path);
                let bytes = std::fs::read(&path)?;
                decode_image(&bytes)
            }
            ImageSource::Bytes(bytes) => decode_image(bytes),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
