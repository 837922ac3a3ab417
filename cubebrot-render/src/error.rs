use thiserror::Error;

/// Errors originating from the render pipeline or the graphics device behind it.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid target size: {width}×{height} (must be > 0)")]
    InvalidTargetSize { width: u32, height: u32 },

    #[error("supersampled target overflows: {width}×{height} at {factor}x")]
    TargetOverflow { width: u32, height: u32, factor: u32 },

    #[error("graphics device error: {0}")]
    Device(String),

    #[error(transparent)]
    Core(#[from] cubebrot_core::CoreError),
}
