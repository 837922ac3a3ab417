use std::path::PathBuf;

use cubebrot_core::CoreError;
use cubebrot_render::RenderError;

/// Fatal startup failures. Anything here aborts before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read tour file {}: {source}", path.display())]
    ReadTour {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid tour file {}: {source}", path.display())]
    ParseTour {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("OpenGL context unavailable; the glow renderer is required")]
    NoGlContext,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
