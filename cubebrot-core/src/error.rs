use thiserror::Error;

/// Errors originating from view-state construction and tour configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid supersample factor: {0} (must be >= 1)")]
    InvalidSupersampleFactor(u32),

    #[error("invalid zoom base: {0} (must be finite and > 1.0)")]
    InvalidZoomBase(f64),

    #[error("invalid duration {duration} for shot {index} (must be finite and > 0.0)")]
    InvalidShotDuration { index: usize, duration: f64 },

    #[error("invalid shot {index}: {reason}")]
    InvalidShot { index: usize, reason: String },

    #[error("tour must contain at least one shot")]
    EmptyTour,
}
