use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::scroll::ScrollAccumulator;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamp each component into `[0, 1]`. NaN becomes 0.
    pub fn clamped(self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self {
            r: unit(self.r),
            g: unit(self.g),
            b: unit(self.b),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Startup parameters for a [`ViewState`].
///
/// Deserializable so the application can embed it in its preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub position: Complex,
    pub zoom_base: f64,
    pub zoom_exponent: f64,
    pub iteration_cap: u32,
    pub color_primary: Rgb,
    pub color_secondary: Rgb,
    pub banding_level: u32,
    pub supersample_factor: u32,
}

impl ViewSettings {
    pub const DEFAULT_POSITION: Complex = Complex {
        re: -0.216361,
        im: 0.817863,
    };
    pub const DEFAULT_ITERATION_CAP: u32 = 100;
    pub const DEFAULT_BANDING_LEVEL: u32 = 8;
    pub const DEFAULT_SUPERSAMPLE_FACTOR: u32 = 2;
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            position: Self::DEFAULT_POSITION,
            zoom_base: ScrollAccumulator::DEFAULT_BASE,
            zoom_exponent: 0.0,
            iteration_cap: Self::DEFAULT_ITERATION_CAP,
            color_primary: Rgb::new(0.05, 0.12, 0.45),
            color_secondary: Rgb::new(1.0, 0.78, 0.25),
            banding_level: Self::DEFAULT_BANDING_LEVEL,
            supersample_factor: Self::DEFAULT_SUPERSAMPLE_FACTOR,
        }
    }
}

/// Camera and coloring parameters fed to the renderer every frame.
///
/// Owned by the navigation controller; the renderer only ever sees a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub position: Complex,
    pub scroll: ScrollAccumulator,
    iteration_cap: u32,
    pub color_primary: Rgb,
    pub color_secondary: Rgb,
    pub banding_level: u32,
    supersample_factor: u32,
}

impl ViewState {
    pub fn new(settings: ViewSettings) -> crate::Result<Self> {
        if settings.supersample_factor == 0 {
            return Err(CoreError::InvalidSupersampleFactor(0));
        }
        let mut scroll = ScrollAccumulator::new(settings.zoom_base)?;
        scroll.set_exponent(settings.zoom_exponent);
        Ok(Self {
            position: settings.position,
            scroll,
            iteration_cap: settings.iteration_cap,
            color_primary: settings.color_primary.clamped(),
            color_secondary: settings.color_secondary.clamped(),
            banding_level: settings.banding_level,
            supersample_factor: settings.supersample_factor,
        })
    }

    /// `zoom_base ^ zoom_exponent`: complex-plane span covered by the view.
    #[inline]
    pub fn zoom_level(&self) -> f64 {
        self.scroll.current_zoom()
    }

    #[inline]
    pub fn zoom_exponent(&self) -> f64 {
        self.scroll.exponent()
    }

    pub fn set_zoom_exponent(&mut self, exponent: f64) {
        self.scroll.set_exponent(exponent);
    }

    #[inline]
    pub fn iteration_cap(&self) -> u32 {
        self.iteration_cap
    }

    pub fn increment_iterations(&mut self) {
        self.iteration_cap = self.iteration_cap.saturating_add(1);
    }

    /// Saturates at zero.
    pub fn decrement_iterations(&mut self) {
        self.iteration_cap = self.iteration_cap.saturating_sub(1);
    }

    #[inline]
    pub fn supersample_factor(&self) -> u32 {
        self.supersample_factor
    }

    pub fn set_supersample_factor(&mut self, factor: u32) -> crate::Result<()> {
        if factor == 0 {
            return Err(CoreError::InvalidSupersampleFactor(factor));
        }
        self.supersample_factor = factor;
        Ok(())
    }

    /// Move by `direction * zoom_level * dt`, so the on-screen pan speed is
    /// the same at every depth.
    pub fn pan(&mut self, direction: Complex, dt: f64) {
        self.position += direction * (self.zoom_level() * dt);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            position: settings.position,
            scroll: ScrollAccumulator::default(),
            iteration_cap: settings.iteration_cap,
            color_primary: settings.color_primary,
            color_secondary: settings.color_secondary,
            banding_level: settings.banding_level,
            supersample_factor: settings.supersample_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_default_settings() {
        let from_settings = ViewState::new(ViewSettings::default()).unwrap();
        assert_eq!(from_settings, ViewState::default());
        assert_eq!(from_settings.zoom_level(), 1.0);
    }

    #[test]
    fn iteration_cap_never_negative() {
        let mut view = ViewState::new(ViewSettings {
            iteration_cap: 3,
            ..Default::default()
        })
        .unwrap();
        for _ in 0..10 {
            view.decrement_iterations();
        }
        assert_eq!(view.iteration_cap(), 0);
        view.increment_iterations();
        assert_eq!(view.iteration_cap(), 1);
    }

    #[test]
    fn zero_supersample_rejected() {
        let result = ViewState::new(ViewSettings {
            supersample_factor: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(CoreError::InvalidSupersampleFactor(0))));

        let mut view = ViewState::default();
        assert!(view.set_supersample_factor(0).is_err());
        assert_eq!(view.supersample_factor(), 2);
        view.set_supersample_factor(4).unwrap();
        assert_eq!(view.supersample_factor(), 4);
    }

    #[test]
    fn bad_zoom_base_rejected() {
        let result = ViewState::new(ViewSettings {
            zoom_base: 0.9,
            ..Default::default()
        });
        assert!(matches!(result, Err(CoreError::InvalidZoomBase(_))));
    }

    #[test]
    fn colors_clamped_on_construction() {
        let view = ViewState::new(ViewSettings {
            color_primary: Rgb::new(-1.0, 0.5, 2.0),
            color_secondary: Rgb::new(f32::NAN, 1.0, 1.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(view.color_primary, Rgb::new(0.0, 0.5, 1.0));
        assert_eq!(view.color_secondary, Rgb::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn pan_scales_with_zoom() {
        let mut view = ViewState::new(ViewSettings {
            position: Complex::ZERO,
            zoom_base: 2.0,
            zoom_exponent: -3.0,
            ..Default::default()
        })
        .unwrap();
        view.pan(Complex::new(1.0, 0.0), 0.5);
        assert!((view.position.re - 0.0625).abs() < 1e-15);
        assert_eq!(view.position.im, 0.0);
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let settings: ViewSettings =
            serde_json::from_str(r#"{ "iteration_cap": 250, "supersample_factor": 1 }"#).unwrap();
        assert_eq!(settings.iteration_cap, 250);
        assert_eq!(settings.supersample_factor, 1);
        assert_eq!(settings.zoom_base, ScrollAccumulator::DEFAULT_BASE);
    }
}
