use image::RgbaImage;

use crate::{
    assets::decode::{FsImageLoader, ImageLoader},
    assets::input::{ImageInput, LoadSettings, NormalizedImage, normalize_inputs},
    foundation::core::FillColor,
    foundation::error::{MergeError, MergeResult},
    layout::margin::{MarginSpec, resolve_margin},
    layout::solver::{Align, Direction, ImageExtent, LayoutParams, MergeLayout, compute_layout},
    render::composite::paint,
};

/// Per-call merge configuration.
///
/// Defaults: horizontal stacking, transparent black fill, start alignment, no spacing,
/// no margin, parallel loading on the global rayon pool.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Stacking direction. Deserializes from `true`/`false` (vertical/horizontal) or a name.
    pub direction: Direction,
    /// Canvas fill.
    pub color: FillColor,
    /// Cross-axis alignment.
    pub align: Align,
    /// Gap between consecutive images on the stacking axis.
    pub offset: u32,
    /// Outer border.
    pub margin: Option<MarginSpec>,
    /// Scheduling of the load phase. Not part of the serialized form.
    #[serde(skip)]
    pub load: LoadSettings,
}

impl MergeOptions {
    /// Solver parameters, with the margin resolved.
    pub fn layout_params(&self) -> MergeResult<LayoutParams> {
        Ok(LayoutParams {
            direction: self.direction,
            align: self.align,
            offset: self.offset,
            margin: resolve_margin(self.margin.as_ref())?,
        })
    }
}

/// Merge `images` into one bitmap, loading sources from the filesystem.
pub fn merge(images: &[ImageInput], options: &MergeOptions) -> MergeResult<RgbaImage> {
    merge_with_loader(images, options, &FsImageLoader::new())
}

/// Merge `images` into one bitmap, decoding sources through `loader`.
///
/// Runs in three phases: gather (concurrent loads, all or nothing), layout (pure
/// geometry) and paint (sequential blits onto one canvas).
#[tracing::instrument(skip(images, options, loader), fields(count = images.len()))]
pub fn merge_with_loader<L: ImageLoader + ?Sized>(
    images: &[ImageInput],
    options: &MergeOptions,
    loader: &L,
) -> MergeResult<RgbaImage> {
    if images.len() <= 1 {
        return Err(MergeError::validation(
            "\"images\" must contain more than one image",
        ));
    }
    let params = options.layout_params()?;

    let normalized = normalize_inputs(images, loader, &options.load)?;
    tracing::debug!(count = normalized.len(), "gathered inputs");

    let layout = layout_normalized(&normalized, &params)?;
    tracing::debug!(
        width = layout.canvas.width,
        height = layout.canvas.height,
        direction = ?params.direction,
        "computed layout"
    );

    paint(&layout, &normalized, options.color)
}

/// Layout phase on its own: canvas size and placements for already decoded images.
pub fn plan_layout(images: &[NormalizedImage], options: &MergeOptions) -> MergeResult<MergeLayout> {
    layout_normalized(images, &options.layout_params()?)
}

fn layout_normalized(images: &[NormalizedImage], params: &LayoutParams) -> MergeResult<MergeLayout> {
    let extents: Vec<ImageExtent> = images.iter().map(NormalizedImage::extent).collect();
    compute_layout(&extents, params)
}

#[cfg(test)]
#[path = "../tests/unit/merge.rs"]
mod tests;
