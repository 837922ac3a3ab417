use tracing::debug;

use crate::complex::Complex;
use crate::tour::{Tour, TourPlayer};
use crate::view_state::ViewState;

/// Which source drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    /// Keyboard pan and wheel zoom.
    FreeExploration,
    /// Interpolated playback through the tour's shots.
    #[default]
    ScriptedTour,
}

impl NavigationMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::FreeExploration => "Free exploration",
            Self::ScriptedTour => "Scripted tour",
        }
    }
}

/// The input commands asserted during one frame.
///
/// Held commands (`iteration_*`, `pan_*`) are sampled every frame; the rest
/// are edge-triggered by the caller and seen once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub quit: bool,
    pub iteration_increase: bool,
    pub iteration_decrease: bool,
    pub pan_up: bool,
    pub pan_down: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    pub print_position: bool,
    pub restart_shot: bool,
    pub reset_tour: bool,
    pub enter_free_exploration: bool,
    pub enter_scripted_tour: bool,
    /// Wheel movement in lines; positive zooms in.
    pub scroll_delta: f64,
}

impl InputSnapshot {
    /// Unit pan direction from the four directional flags. Opposite flags
    /// cancel each other.
    pub fn pan_direction(&self) -> Complex {
        let axis = |pos: bool, neg: bool| f64::from(u8::from(pos)) - f64::from(u8::from(neg));
        Complex::new(
            axis(self.pan_right, self.pan_left),
            axis(self.pan_up, self.pan_down),
        )
    }
}

/// Side effects the frame loop must carry out after [`NavigationController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameEvents {
    pub quit: bool,
    /// Set when `print_position` was asserted; holds the position after the update.
    pub report_position: Option<Complex>,
}

/// Owns the [`ViewState`] and decides, each frame, whether the keyboard or
/// the tour moves the camera.
#[derive(Debug, Clone)]
pub struct NavigationController {
    view: ViewState,
    mode: NavigationMode,
    tour: TourPlayer,
}

impl NavigationController {
    /// Starts in [`NavigationMode::ScriptedTour`], with the view already
    /// placed at the first sample of the tour.
    pub fn new(view: ViewState, tour: Tour) -> Self {
        let mut controller = Self {
            view,
            mode: NavigationMode::default(),
            tour: TourPlayer::new(tour),
        };
        controller.apply_tour_sample();
        controller
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn tour(&self) -> &TourPlayer {
        &self.tour
    }

    /// Returns `true` if the mode changed.
    pub fn enter_free_exploration(&mut self) -> bool {
        self.switch_to(NavigationMode::FreeExploration)
    }

    /// Resumes the tour where it was left. Returns `true` if the mode changed.
    pub fn enter_scripted_tour(&mut self) -> bool {
        self.switch_to(NavigationMode::ScriptedTour)
    }

    fn switch_to(&mut self, mode: NavigationMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!(from = ?self.mode, to = ?mode, "Navigation mode switch");
        self.mode = mode;
        true
    }

    pub fn restart_shot(&mut self) {
        debug!(shot = self.tour.current_index(), "Restarting shot");
        self.tour.restart_shot();
    }

    pub fn reset_tour(&mut self) {
        debug!("Resetting tour");
        self.tour.reset();
    }

    /// Apply one frame of input and elapsed time.
    ///
    /// When both mode commands arrive in the same frame the tour command is
    /// handled first, so free exploration ends up active.
    pub fn advance(&mut self, dt: f64, input: &InputSnapshot) -> FrameEvents {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if input.enter_scripted_tour {
            self.enter_scripted_tour();
        }
        if input.enter_free_exploration {
            self.enter_free_exploration();
        }
        if input.reset_tour {
            self.reset_tour();
        }
        if input.restart_shot {
            self.restart_shot();
        }

        if input.scroll_delta != 0.0 {
            self.view.scroll.apply_scroll_delta(input.scroll_delta);
        }

        if input.iteration_increase {
            self.view.increment_iterations();
        }
        if input.iteration_decrease {
            self.view.decrement_iterations();
        }

        match self.mode {
            NavigationMode::FreeExploration => {
                let direction = input.pan_direction();
                if direction != Complex::ZERO {
                    self.view.pan(direction, dt);
                }
            }
            NavigationMode::ScriptedTour => {
                self.tour.advance(dt);
                self.apply_tour_sample();
            }
        }

        FrameEvents {
            quit: input.quit,
            report_position: input.print_position.then_some(self.view.position),
        }
    }

    fn apply_tour_sample(&mut self) {
        let sample = self.tour.sample();
        self.view.position = sample.position;
        self.view.set_zoom_exponent(sample.zoom_exponent);
    }
}
