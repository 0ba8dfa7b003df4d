use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;

use crate::{
    assets::decode::ImageLoader,
    foundation::error::{MergeError, MergeResult},
    layout::solver::ImageExtent,
};

/// Something an [`ImageLoader`] can decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Filesystem path.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Arc<[u8]>),
}

/// A source plus the per-image offsets to apply when placing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// What to decode.
    pub src: ImageSource,
    /// Extra shift along X.
    pub offset_x: u32,
    /// Extra shift along Y.
    pub offset_y: u32,
}

impl ImageDescriptor {
    /// Descriptor with zero offsets.
    pub fn new(src: impl Into<ImageSource>) -> Self {
        Self {
            src: src.into(),
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// Set both offsets.
    pub fn offset(mut self, offset_x: u32, offset_y: u32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }
}

/// One element of the merge input list.
#[derive(Clone, Debug)]
pub enum ImageInput {
    /// Already decoded; used as is with zero offsets.
    Decoded(Arc<RgbaImage>),
    /// Decoded through the loader, keeping the descriptor's offsets.
    Descriptor(ImageDescriptor),
    /// Decoded through the loader with zero offsets.
    Source(ImageSource),
}

/// A decoded input together with its offsets.
#[derive(Clone, Debug)]
pub struct NormalizedImage {
    /// Decoded pixels, shared with whoever produced them.
    pub bitmap: Arc<RgbaImage>,
    /// Extra shift along X.
    pub offset_x: u32,
    /// Extra shift along Y.
    pub offset_y: u32,
}

impl NormalizedImage {
    /// Geometry seen by the layout solver.
    pub fn extent(&self) -> ImageExtent {
        ImageExtent::new(self.bitmap.width(), self.bitmap.height())
            .with_offsets(self.offset_x, self.offset_y)
    }
}

/// How the gather phase schedules loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSettings {
    /// Decode inputs concurrently on a rayon pool.
    pub parallel: bool,
    /// Worker count for a dedicated pool; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Resolve every input into a [`NormalizedImage`], preserving input order.
///
/// Any failure aborts the whole gather and is returned unchanged.
pub fn normalize_inputs<L: ImageLoader + ?Sized>(
    inputs: &[ImageInput],
    loader: &L,
    settings: &LoadSettings,
) -> MergeResult<Vec<NormalizedImage>> {
    if !settings.parallel {
        return inputs
            .iter()
            .enumerate()
            .map(|(idx, input)| normalize_one(idx, input, loader))
            .collect();
    }

    let gather = || {
        inputs
            .par_iter()
            .enumerate()
            .map(|(idx, input)| normalize_one(idx, input, loader))
            .collect::<MergeResult<Vec<_>>>()
    };

    match settings.threads {
        Some(n) => build_thread_pool(n)?.install(gather),
        None => gather(),
    }
}

fn normalize_one<L: ImageLoader + ?Sized>(
    idx: usize,
    input: &ImageInput,
    loader: &L,
) -> MergeResult<NormalizedImage> {
    match input {
        ImageInput::Decoded(bitmap) => Ok(NormalizedImage {
            bitmap: Arc::clone(bitmap),
            offset_x: 0,
            offset_y: 0,
        }),
        ImageInput::Descriptor(d) => {
            tracing::trace!(idx, offset_x = d.offset_x, offset_y = d.offset_y, "loading descriptor");
            Ok(NormalizedImage {
                bitmap: Arc::new(loader.load(&d.src)?),
                offset_x: d.offset_x,
                offset_y: d.offset_y,
            })
        }
        ImageInput::Source(src) => {
            tracing::trace!(idx, "loading source");
            Ok(NormalizedImage {
                bitmap: Arc::new(loader.load(src)?),
                offset_x: 0,
                offset_y: 0,
            })
        }
    }
}

fn build_thread_pool(threads: usize) -> MergeResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(MergeError::validation(
            "load threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| MergeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<Arc<[u8]>> for ImageSource {
    fn from(bytes: Arc<[u8]>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<RgbaImage> for ImageInput {
    fn from(img: RgbaImage) -> Self {
        Self::Decoded(Arc::new(img))
    }
}

impl From<Arc<RgbaImage>> for ImageInput {
    fn from(img: Arc<RgbaImage>) -> Self {
        Self::Decoded(img)
    }
}

impl From<DynamicImage> for ImageInput {
    fn from(img: DynamicImage) -> Self {
        Self::Decoded(Arc::new(img.into_rgba8()))
    }
}

impl From<ImageDescriptor> for ImageInput {
    fn from(d: ImageDescriptor) -> Self {
        Self::Descriptor(d)
    }
}

impl From<ImageSource> for ImageInput {
    fn from(src: ImageSource) -> Self {
        Self::Source(src)
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        Self::Source(path.into())
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        Self::Source(path.into())
    }
}

impl From<&str> for ImageInput {
    fn from(path: &str) -> Self {
        Self::Source(path.into())
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Source(bytes.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/input.rs"]
mod tests;
