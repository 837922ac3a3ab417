use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::{lerp, Complex};
use crate::error::CoreError;

/// One segment of a scripted tour: a linear flight from one position and
/// zoom exponent to another over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub start_position: Complex,
    pub end_position: Complex,
    pub start_zoom_exponent: f64,
    pub end_zoom_exponent: f64,
    /// Seconds. Finite and strictly positive.
    pub duration: f64,
}

impl Shot {
    pub fn new(
        start_position: Complex,
        end_position: Complex,
        start_zoom_exponent: f64,
        end_zoom_exponent: f64,
        duration: f64,
    ) -> crate::Result<Self> {
        let shot = Self {
            start_position,
            end_position,
            start_zoom_exponent,
            end_zoom_exponent,
            duration,
        };
        shot.validate(0)?;
        Ok(shot)
    }

    /// A shot that holds still at one place for `duration` seconds.
    pub fn hold(position: Complex, zoom_exponent: f64, duration: f64) -> crate::Result<Self> {
        Self::new(position, position, zoom_exponent, zoom_exponent, duration)
    }

    fn validate(&self, index: usize) -> crate::Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(CoreError::InvalidShotDuration {
                index,
                duration: self.duration,
            });
        }
        if !self.start_position.is_finite() || !self.end_position.is_finite() {
            return Err(CoreError::InvalidShot {
                index,
                reason: "positions must be finite".into(),
            });
        }
        if !self.start_zoom_exponent.is_finite() || !self.end_zoom_exponent.is_finite() {
            return Err(CoreError::InvalidShot {
                index,
                reason: "zoom exponents must be finite".into(),
            });
        }
        Ok(())
    }

    /// Interpolated position and zoom exponent at `progress`, clamped to `[0, 1]`.
    pub fn sample(&self, progress: f64) -> TourSample {
        let t = progress.clamp(0.0, 1.0);
        TourSample {
            position: self.start_position.lerp(self.end_position, t),
            zoom_exponent: lerp(self.start_zoom_exponent, self.end_zoom_exponent, t),
        }
    }
}

/// A validated, non-empty, immutable sequence of shots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Shot>", into = "Vec<Shot>")]
pub struct Tour {
    shots: Vec<Shot>,
    total_duration: f64,
}

impl Tour {
    pub fn new(shots: Vec<Shot>) -> crate::Result<Self> {
        if shots.is_empty() {
            return Err(CoreError::EmptyTour);
        }
        for (index, shot) in shots.iter().enumerate() {
            shot.validate(index)?;
        }
        let total_duration: f64 = shots.iter().map(|s| s.duration).sum();
        if !total_duration.is_finite() {
            return Err(CoreError::InvalidShot {
                index: shots.len() - 1,
                reason: "total tour duration overflows".into(),
            });
        }
        Ok(Self {
            shots,
            total_duration,
        })
    }

    /// The default sightseeing route: overview, Seahorse Valley, Elephant
    /// Valley, a spiral near the upper bulb, then back out.
    pub fn builtin() -> Self {
        let overview = Complex::new(-0.5, 0.0);
        let seahorse = Complex::new(-0.743_643_887, 0.131_825_904);
        let elephant = Complex::new(0.282_013_5, -0.010_015_3);
        let spiral = Complex::new(-0.216_361, 0.817_863);

        let shots = vec![
            Shot {
                start_position: overview,
                end_position: overview,
                start_zoom_exponent: 2.0,
                end_zoom_exponent: 0.0,
                duration: 15.0,
            },
            Shot {
                start_position: Complex::new(-0.75, 0.1),
                end_position: seahorse,
                start_zoom_exponent: 0.0,
                end_zoom_exponent: -32.0,
                duration: 30.0,
            },
            Shot {
                start_position: Complex::new(0.275, 0.0),
                end_position: elephant,
                start_zoom_exponent: -4.0,
                end_zoom_exponent: -36.0,
                duration: 30.0,
            },
            Shot {
                start_position: spiral,
                end_position: spiral,
                start_zoom_exponent: -2.0,
                end_zoom_exponent: -40.0,
                duration: 40.0,
            },
            Shot {
                start_position: spiral,
                end_position: overview,
                start_zoom_exponent: -40.0,
                end_zoom_exponent: 2.0,
                duration: 20.0,
            },
        ];
        Self {
            total_duration: shots.iter().map(|s| s.duration).sum(),
            shots,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    #[inline]
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }
}

impl TryFrom<Vec<Shot>> for Tour {
    type Error = CoreError;

    fn try_from(shots: Vec<Shot>) -> crate::Result<Self> {
        Self::new(shots)
    }
}

impl From<Tour> for Vec<Shot> {
    fn from(tour: Tour) -> Self {
        tour.shots
    }
}

/// Camera parameters produced by the tour for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourSample {
    pub position: Complex,
    pub zoom_exponent: f64,
}

/// Plays a [`Tour`] back as a function of accumulated frame time.
#[derive(Debug, Clone)]
pub struct TourPlayer {
    tour: Tour,
    current: usize,
    elapsed_in_shot: f64,
}

impl TourPlayer {
    pub fn new(tour: Tour) -> Self {
        Self {
            tour,
            current: 0,
            elapsed_in_shot: 0.0,
        }
    }

    /// Step the playback cursor by `dt` seconds and sample the active shot.
    ///
    /// Time left over past the end of a shot carries into the next one, so a
    /// single large step may skip several shots. Negative or non-finite steps
    /// are treated as zero.
    pub fn advance(&mut self, dt: f64) -> TourSample {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed_in_shot += dt;

        // A full cycle returns to the same shot, so drop whole cycles first.
        let cycle = self.tour.total_duration();
        if self.elapsed_in_shot > cycle {
            self.elapsed_in_shot %= cycle;
        }

        // The raw (unclamped) progress decides when to move on.
        while self.progress() > 1.0 {
            self.elapsed_in_shot -= self.current_shot().duration;
            self.current = self.next_index();
            debug!(shot = self.current, "Tour advanced to next shot");
        }
        self.elapsed_in_shot = self.elapsed_in_shot.max(0.0);

        self.sample()
    }

    /// Sample the active shot without moving the cursor.
    pub fn sample(&self) -> TourSample {
        self.current_shot().sample(self.progress())
    }

    fn next_index(&self) -> usize {
        let next = self.current + 1;
        if next == self.tour.len() {
            0
        } else {
            next
        }
    }

    /// Rewind the active shot to its start.
    pub fn restart_shot(&mut self) {
        self.elapsed_in_shot = 0.0;
    }

    /// Rewind to the first shot.
    pub fn reset(&mut self) {
        self.current = 0;
        self.elapsed_in_shot = 0.0;
    }

    /// Unclamped fraction of the active shot that has played.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.elapsed_in_shot / self.current_shot().duration
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn current_shot(&self) -> &Shot {
        &self.tour.shots[self.current]
    }

    #[inline]
    pub fn elapsed_in_shot(&self) -> f64 {
        self.elapsed_in_shot
    }

    #[inline]
    pub fn shot_count(&self) -> usize {
        self.tour.len()
    }
}
