/// Convenience result type used across the crate.
pub type MergeResult<T> = Result<T, MergeError>;

/// Top-level error taxonomy returned by merge APIs.
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    /// Input had the wrong shape (for example `images` was not an array).
    #[error("type error: {0}")]
    Type(String),

    /// Input had the right shape but an unusable value.
    #[error("validation error: {0}")]
    Validation(String),

    /// A textual option (margin shorthand, color, request field) could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Image decoding failed. Propagated from the `image` crate unchanged.
    #[error(transparent)]
    Decode(#[from] image::ImageError),

    /// Reading an image source failed. Propagated unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error, typically from a custom [`crate::ImageLoader`].
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MergeError {
    /// Build a [`MergeError::Type`] value.
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    /// Build a [`MergeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MergeError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
