pub mod complex;
pub mod error;
pub mod navigation;
pub mod scroll;
pub mod tour;
pub mod view_state;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use navigation::{FrameEvents, InputSnapshot, NavigationController, NavigationMode};
pub use scroll::ScrollAccumulator;
pub use tour::{Shot, Tour, TourPlayer, TourSample};
pub use view_state::{Rgb, ViewSettings, ViewState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
