use crate::error::RenderError;

/// Pixel dimensions of a framebuffer or render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; 1.0 for an empty extent.
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Offscreen size for a display of this size at `factor`x supersampling.
    pub fn supersampled(self, factor: u32) -> crate::Result<Self> {
        if self.is_empty() {
            return Err(RenderError::InvalidTargetSize {
                width: self.width,
                height: self.height,
            });
        }
        if factor == 0 {
            return Err(cubebrot_core::CoreError::InvalidSupersampleFactor(factor).into());
        }
        match (self.width.checked_mul(factor), self.height.checked_mul(factor)) {
            (Some(width), Some(height)) if width <= i32::MAX as u32 && height <= i32::MAX as u32 => {
                Ok(Self { width, height })
            }
            _ => Err(RenderError::TargetOverflow {
                width: self.width,
                height: self.height,
                factor,
            }),
        }
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supersampled_multiplies_both_axes() {
        let display = Extent::new(800, 600);
        assert_eq!(display.supersampled(2).unwrap(), Extent::new(1600, 1200));
        assert_eq!(display.supersampled(1).unwrap(), display);
    }

    #[test]
    fn empty_extent_rejected() {
        assert!(matches!(
            Extent::new(0, 600).supersampled(2),
            Err(RenderError::InvalidTargetSize { .. })
        ));
    }

    #[test]
    fn zero_factor_rejected() {
        assert!(matches!(
            Extent::new(800, 600).supersampled(0),
            Err(RenderError::Core(_))
        ));
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            Extent::new(u32::MAX / 2, 10).supersampled(4),
            Err(RenderError::TargetOverflow { .. })
        ));
    }

    #[test]
    fn aspect_ratio() {
        assert_eq!(Extent::new(1920, 1080).aspect_ratio(), 1920.0 / 1080.0);
        assert_eq!(Extent::default().aspect_ratio(), 1.0);
    }
}
