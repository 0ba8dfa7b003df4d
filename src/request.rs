//! JSON front door: `{"images": [...], "options": {...}}`.
//!
//! Each image is either a path string or `{"src": "<path>", "offsetX": n, "offsetY": n}`.

use image::RgbaImage;
use serde_json::Value;

use crate::{
    assets::decode::{FsImageLoader, ImageLoader},
    assets::input::{ImageDescriptor, ImageInput, ImageSource},
    foundation::error::{MergeError, MergeResult},
    merge::{MergeOptions, merge_with_loader},
};

/// A parsed merge call.
#[derive(Clone, Debug)]
pub struct MergeRequest {
    /// Inputs in paint order.
    pub images: Vec<ImageInput>,
    /// Merge configuration.
    pub options: MergeOptions,
}

#[derive(serde::Deserialize)]
struct DescriptorRepr {
    src: String,
    #[serde(default, alias = "offsetX")]
    offset_x: u32,
    #[serde(default, alias = "offsetY")]
    offset_y: u32,
}

impl MergeRequest {
    /// Parse a request from JSON text.
    pub fn from_json(text: &str) -> MergeResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MergeError::parse(format!("invalid merge request json: {e}")))?;
        Self::from_value(value)
    }

    /// Build a request from an already parsed JSON value.
    ///
    /// The image count is not checked here; [`MergeRequest::execute`] does that.
    pub fn from_value(value: Value) -> MergeResult<Self> {
        let Value::Object(mut obj) = value else {
            return Err(MergeError::type_error("merge request must be a JSON object"));
        };

        let images = match obj.remove("images") {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| image_input_from_value(idx, item))
                .collect::<MergeResult<Vec<_>>>()?,
            _ => {
                return Err(MergeError::type_error(
                    "\"images\" must be an array with images",
                ));
            }
        };

        let options = match obj.remove("options") {
            None | Some(Value::Null) => MergeOptions::default(),
            Some(v) => serde_json::from_value(v)
                .map_err(|e| MergeError::parse(format!("invalid merge options: {e}")))?,
        };

        Ok(Self { images, options })
    }

    /// Run the merge, reading paths from the filesystem as given.
    pub fn execute(&self) -> MergeResult<RgbaImage> {
        self.execute_with_loader(&FsImageLoader::new())
    }

    /// Run the merge through a custom loader.
    pub fn execute_with_loader<L: ImageLoader + ?Sized>(&self, loader: &L) -> MergeResult<RgbaImage> {
        merge_with_loader(&self.images, &self.options, loader)
    }
}

fn image_input_from_value(idx: usize, value: Value) -> MergeResult<ImageInput> {
    match value {
        Value::String(path) => Ok(ImageInput::Source(ImageSource::from(path.as_str()))),
        Value::Object(_) => {
            let repr: DescriptorRepr = serde_json::from_value(value)
                .map_err(|e| MergeError::parse(format!("invalid images[{idx}]: {e}")))?;
            Ok(ImageInput::Descriptor(
                ImageDescriptor::new(ImageSource::from(repr.src.as_str()))
                    .offset(repr.offset_x, repr.offset_y),
            ))
        }
        other => Err(MergeError::type_error(format!(
            "images[{idx}] must be a path string or an object with \"src\", got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
