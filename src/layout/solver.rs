use std::{convert::Infallible, str::FromStr};

use serde::Deserialize;

use crate::{
    foundation::core::{Canvas, Point},
    foundation::error::{MergeError, MergeResult},
    layout::margin::Margin,
};

/// Stacking direction of the merged images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Images laid out left to right (stacking axis X).
    #[default]
    Horizontal,
    /// Images laid out top to bottom (stacking axis Y).
    Vertical,
}

impl Direction {
    /// Axis along which images are laid end to end.
    pub fn stacking_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::X,
            Self::Vertical => Axis::Y,
        }
    }

    /// Axis on which alignment applies.
    pub fn cross_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::Y,
            Self::Vertical => Axis::X,
        }
    }
}

/// `true` selects vertical stacking, `false` horizontal.
impl From<bool> for Direction {
    fn from(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(v) => Ok(Self::from(v)),
            Repr::Name(name) => match name.to_ascii_lowercase().as_str() {
                "horizontal" | "row" => Ok(Self::Horizontal),
                "vertical" | "column" => Ok(Self::Vertical),
                other => Err(serde::de::Error::custom(format!(
                    "unknown direction '{other}'"
                ))),
            },
        }
    }
}

/// Cross-axis alignment of images smaller than the widest/tallest one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush with the top/left edge.
    #[default]
    Start,
    /// Centered; the offset may be fractional.
    Center,
    /// Flush with the bottom/right edge.
    End,
}

/// Unrecognized names fall back to [`Align::Start`].
impl FromStr for Align {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(match s {
            "center" => Self::Center,
            "end" => Self::End,
            _ => Self::Start,
        })
    }
}

impl<'de> Deserialize<'de> for Align {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        let Ok(align) = name.parse::<Align>();
        Ok(align)
    }
}

/// Image axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis (widths, `offset_x`).
    X,
    /// Vertical axis (heights, `offset_y`).
    Y,
}

/// Size and per-image offsets of one input; everything the solver needs to know about it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageExtent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Extra shift along X.
    pub offset_x: u32,
    /// Extra shift along Y.
    pub offset_y: u32,
}

impl ImageExtent {
    /// Extent without offsets.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Same extent with per-image offsets.
    pub fn with_offsets(self, offset_x: u32, offset_y: u32) -> Self {
        Self {
            offset_x,
            offset_y,
            ..self
        }
    }

    fn size_on(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => i64::from(self.width),
            Axis::Y => i64::from(self.height),
        }
    }

    fn offset_on(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => i64::from(self.offset_x),
            Axis::Y => i64::from(self.offset_y),
        }
    }
}

/// Cumulative placement of one image along both axes, before spacing,
/// alignment and margin are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutEntry {
    /// Sum of previous widths and X offsets, plus this image's own X offset.
    pub x: i64,
    /// Sum of previous heights and Y offsets, plus this image's own Y offset.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Per-image X offset.
    pub offset_x: u32,
    /// Per-image Y offset.
    pub offset_y: u32,
}

/// Layout inputs that are not per image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutParams {
    /// Stacking direction.
    pub direction: Direction,
    /// Cross-axis alignment.
    pub align: Align,
    /// Gap inserted between consecutive images on the stacking axis.
    pub offset: u32,
    /// Outer border.
    pub margin: Margin,
}

/// Result of the layout pass: canvas size plus one paint position per image.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeLayout {
    /// Final canvas size, margin included.
    pub canvas: Canvas,
    /// Content width before the margin is added.
    pub content_width: i64,
    /// Content height before the margin is added.
    pub content_height: i64,
    /// Margin that was applied.
    pub margin: Margin,
    /// Cumulative placements, in input order.
    pub entries: Vec<LayoutEntry>,
    /// Top-left paint coordinate of each image, in input order.
    pub placements: Vec<Point>,
}

/// Walk the inputs once, accumulating widths and heights (with offsets) on both axes.
pub fn stack_entries(extents: &[ImageExtent]) -> Vec<LayoutEntry> {
    let mut total_x = 0i64;
    let mut total_y = 0i64;
    let mut out = Vec::with_capacity(extents.len());
    for e in extents {
        let offset_x = i64::from(e.offset_x);
        let offset_y = i64::from(e.offset_y);
        out.push(LayoutEntry {
            x: total_x + offset_x,
            y: total_y + offset_y,
            width: e.width,
            height: e.height,
            offset_x: e.offset_x,
            offset_y: e.offset_y,
        });
        total_x += i64::from(e.width) + offset_x;
        total_y += i64::from(e.height) + offset_y;
    }
    out
}

/// Stacking-axis extent: each size plus its own offset on `axis`, plus `offset`
/// once per gap between neighbours.
pub fn count_total_reduce(extents: &[ImageExtent], axis: Axis, offset: u32) -> i64 {
    let gaps = extents.len().saturating_sub(1) as i64;
    extents
        .iter()
        .map(|e| e.size_on(axis) + e.offset_on(axis))
        .sum::<i64>()
        + gaps * i64::from(offset)
}

/// Cross-axis extent: the largest size plus own offset on `axis`.
pub fn count_total_max(extents: &[ImageExtent], axis: Axis) -> i64 {
    extents
        .iter()
        .map(|e| e.size_on(axis) + e.offset_on(axis))
        .max()
        .unwrap_or(0)
}

/// Position of an item of `size` inside `total` on the cross axis.
pub fn align_offset(total: i64, size: u32, align: Align) -> f64 {
    let rem = (total - i64::from(size)) as f64;
    match align {
        Align::Start => 0.0,
        Align::Center => rem / 2.0,
        Align::End => rem,
    }
}

/// Compute the canvas size and every image's top-left paint coordinate.
///
/// Pure geometry: no pixels are touched. Placements never fall outside the canvas
/// unless the margin is negative.
pub fn compute_layout(extents: &[ImageExtent], params: &LayoutParams) -> MergeResult<MergeLayout> {
    let entries = stack_entries(extents);
    let direction = params.direction;
    let margin = params.margin;

    let stack_total = count_total_reduce(extents, direction.stacking_axis(), params.offset);
    let cross_total = count_total_max(extents, direction.cross_axis());
    let (content_width, content_height) = match direction {
        Direction::Horizontal => (stack_total, cross_total),
        Direction::Vertical => (cross_total, stack_total),
    };

    let canvas = Canvas {
        width: canvas_dim(content_width + margin.horizontal(), "width")?,
        height: canvas_dim(content_height + margin.vertical(), "height")?,
    };

    let left = f64::from(margin.left);
    let top = f64::from(margin.top);
    let placements = entries
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            let spacing = idx as f64 * f64::from(params.offset);
            let (x, y) = match direction {
                Direction::Horizontal => (
                    e.x as f64 + spacing,
                    align_offset(content_height, e.height, params.align) + f64::from(e.offset_y),
                ),
                Direction::Vertical => (
                    align_offset(content_width, e.width, params.align) + f64::from(e.offset_x),
                    e.y as f64 + spacing,
                ),
            };
            Point::new(x + left, y + top)
        })
        .collect();

    Ok(MergeLayout {
        canvas,
        content_width,
        content_height,
        margin,
        entries,
        placements,
    })
}

fn canvas_dim(v: i64, name: &str) -> MergeResult<u32> {
    u32::try_from(v).map_err(|_| {
        MergeError::validation(format!(
            "merged canvas {name} {v} is outside the supported pixel range"
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
