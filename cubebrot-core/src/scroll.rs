use tracing::warn;

use crate::error::CoreError;

/// Converts discrete wheel steps into a continuous, exponential zoom level.
///
/// The accumulated exponent is unbounded in both directions: the set is
/// self-similar, so the only practical depth limit is `f64` precision.
/// `current_zoom()` is the span of the view (smaller = deeper), while
/// `magnification()` is its reciprocal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAccumulator {
    base: f64,
    accumulator: f64,
}

impl ScrollAccumulator {
    pub const DEFAULT_BASE: f64 = 1.25;

    pub fn new(base: f64) -> crate::Result<Self> {
        if !base.is_finite() || base <= 1.0 {
            return Err(CoreError::InvalidZoomBase(base));
        }
        Ok(Self {
            base,
            accumulator: 0.0,
        })
    }

    /// Apply one wheel event. Positive deltas (scrolling away from the user)
    /// zoom in.
    pub fn apply_scroll_delta(&mut self, delta: f64) {
        if !delta.is_finite() {
            warn!("Ignoring non-finite scroll delta {delta}");
            return;
        }
        self.accumulator -= delta;
    }

    /// `base ^ accumulator`. Always strictly positive for finite exponents
    /// within `f64` range.
    #[inline]
    pub fn current_zoom(&self) -> f64 {
        self.base.powf(self.accumulator)
    }

    /// How many times the view is magnified relative to exponent 0.
    #[inline]
    pub fn magnification(&self) -> f64 {
        1.0 / self.current_zoom()
    }

    #[inline]
    pub fn exponent(&self) -> f64 {
        self.accumulator
    }

    pub fn set_exponent(&mut self, exponent: f64) {
        self.accumulator = exponent;
    }
}

impl Default for ScrollAccumulator {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            accumulator: 0.0,
        }
    }
}
