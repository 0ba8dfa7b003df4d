use image::{RgbaImage, imageops};

use crate::{
    assets::input::NormalizedImage,
    foundation::core::{Canvas, FillColor, Point},
    foundation::error::{MergeError, MergeResult},
    layout::solver::MergeLayout,
};

/// Allocate a canvas filled with `color`.
pub fn create_canvas(canvas: Canvas, color: FillColor) -> RgbaImage {
    RgbaImage::from_pixel(canvas.width, canvas.height, color.to_pixel())
}

/// Copy `src` onto `dst` with its top-left corner at `at`, replacing destination pixels.
///
/// Fractional coordinates are truncated toward zero. Pixels falling outside `dst`
/// (including at negative coordinates) are dropped.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, at: Point) {
    imageops::replace(dst, src, at.x as i64, at.y as i64);
}

/// Paint every image at its computed placement, in input order, onto a fresh canvas.
pub fn paint(
    layout: &MergeLayout,
    images: &[NormalizedImage],
    color: FillColor,
) -> MergeResult<RgbaImage> {
    if images.len() != layout.placements.len() {
        return Err(MergeError::validation(format!(
            "layout has {} placements for {} images",
            layout.placements.len(),
            images.len()
        )));
    }

    let mut out = create_canvas(layout.canvas, color);
    for (img, &at) in images.iter().zip(&layout.placements) {
        blit(&mut out, &img.bitmap, at);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
