/// Convenience result type used across frameloom.
pub type LoomResult<T> = Result<T, LoomError>;

/// Top-level error taxonomy used by the paint, filter and encode pipeline.
#[derive(thiserror::Error, Debug)]
pub enum LoomError {
    /// Invalid caller-provided configuration (filter names, sizes, fonts, keyframes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed transform or keyframe data.
    #[error("animation error: {0}")]
    Animation(String),

    /// Raster failures while painting a widget tree.
    #[error("paint error: {0}")]
    Paint(String),

    /// A stage of a filter chain failed.
    #[error("filter {index} ({name}) failed: {source}")]
    Filter {
        /// Zero-based position of the failing filter in its chain.
        index: usize,
        /// Name of the failing filter.
        name: String,
        /// Error reported by the filter.
        source: Box<LoomError>,
    },

    /// Container or encoder failures that are not reported by `image` itself.
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors reported by the `image` codecs and decoders.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoomError {
    /// Build a [`LoomError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoomError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`LoomError::Paint`] value.
    pub fn paint(msg: impl Into<String>) -> Self {
        Self::Paint(msg.into())
    }

    /// Build a [`LoomError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`LoomError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Wrap `self` as the failure of chain stage `index`.
    pub fn in_filter(self, index: usize, name: impl Into<String>) -> Self {
        Self::Filter {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for LoomError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
