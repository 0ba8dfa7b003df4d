//! Concatenate raster images into a single image.
//!
//! Images are stacked along one axis (horizontal rows or vertical columns) with optional
//! per-image offsets, spacing between neighbours, an outer margin, a fill color and
//! cross-axis alignment.
//!
//! # Pipeline overview
//!
//! 1. **Gather**: every [`ImageInput`] is resolved to a decoded bitmap through an
//!    [`ImageLoader`], concurrently, all or nothing.
//! 2. **Layout**: [`compute_layout`] turns sizes and offsets into a canvas size and one
//!    paint position per image. Pure geometry, testable without pixels.
//! 3. **Paint**: a canvas is allocated and each bitmap is copied onto it in input order.
//!
//! ```no_run
//! use merge_img::{Direction, MergeOptions, ImageInput, merge};
//!
//! let images = vec![ImageInput::from("a.png"), ImageInput::from("b.png")];
//! let opts = MergeOptions {
//!     direction: Direction::Vertical,
//!     offset: 10,
//!     ..MergeOptions::default()
//! };
//! let merged = merge(&images, &opts)?;
//! merged.save("merged.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod layout;
mod merge;
mod render;
mod request;

pub use assets::decode::{FsImageLoader, ImageLoader, decode_image};
pub use assets::input::{
    ImageDescriptor, ImageInput, ImageSource, LoadSettings, NormalizedImage, normalize_inputs,
};
pub use foundation::core::{Canvas, FillColor, Point};
pub use foundation::error::{MergeError, MergeResult};
pub use layout::margin::{Margin, MarginSides, MarginSpec, resolve_margin};
pub use layout::solver::{
    Align, Axis, Direction, ImageExtent, LayoutEntry, LayoutParams, MergeLayout, align_offset,
    compute_layout, count_total_max, count_total_reduce, stack_entries,
};
pub use merge::{MergeOptions, merge, merge_with_loader, plan_layout};
pub use render::composite::{blit, create_canvas, paint};
pub use request::MergeRequest;
