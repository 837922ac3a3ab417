pub mod device;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod target;
pub mod transform;
pub mod uniforms;

pub use device::GraphicsDevice;
pub use error::RenderError;
pub use geometry::{cube_indices, cube_vertices, CubeVertex, QuadVertex, FULLSCREEN_QUAD};
pub use pipeline::{FrameStats, PipelineSettings, RenderPipeline};
pub use target::Extent;
pub use transform::RotationClock;
pub use uniforms::{CubeUniforms, UniformSink};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
