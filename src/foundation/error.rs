/// Convenience result type used across photo-caption.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Error taxonomy for the compositor and its collaborators.
///
/// [`Compositor::composite`](crate::Compositor::composite) only ever yields
/// [`CaptionError::ImageDecode`] or [`CaptionError::RenderSurface`]; the remaining variants
/// belong to configuration loading and the shrink/upload collaborators.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// The source bytes could not be decoded into a non-empty raster.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// A drawable surface could not be allocated, rendered or read back.
    #[error("render surface error: {0}")]
    RenderSurface(String),

    /// Invalid user-provided configuration or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures reported by an upload collaborator.
    #[error("upload error: {0}")]
    Upload(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`CaptionError::RenderSurface`] value.
    pub fn render_surface(msg: impl Into<String>) -> Self {
        Self::RenderSurface(msg.into())
    }

    /// Build a [`CaptionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptionError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
