use tracing::{debug, info};

use cubebrot_core::ViewState;

use crate::device::GraphicsDevice;
use crate::target::Extent;
use crate::transform::{effect_rotation, model_view_projection, RotationClock};
use crate::uniforms::CubeUniforms;

/// Tunables for the two render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Cube rotation speed in radians per second.
    pub rotation_rate: f32,
    /// Speed of the decorative in-shader rotation, radians per second.
    pub effect_rate: f32,
    /// Background behind the cube in the offscreen target.
    pub background: [f32; 4],
    /// Clear color of the visible framebuffer before compositing.
    pub letterbox: [f32; 4],
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rotation_rate: RotationClock::DEFAULT_RATE,
            effect_rate: 0.15,
            background: [0.1, 0.2, 0.3, 1.0],
            letterbox: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// What a call to [`RenderPipeline::render_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub display_size: Extent,
    pub target_size: Extent,
    pub rotation_angle: f32,
    /// The offscreen target was (re)created this frame.
    pub reallocated: bool,
}

struct OffscreenTarget<T> {
    handle: T,
    size: Extent,
}

/// Renders the cube into a supersampled offscreen target, then composites
/// that target onto the visible framebuffer.
///
/// The pipeline owns the offscreen target. It is never resized in place:
/// any size change destroys the old target and allocates a new one before
/// the next offscreen pass.
///
/// Generic over the device's target handle rather than the device itself, so
/// a device that only borrows its context for one frame can drive it.
pub struct RenderPipeline<T> {
    settings: PipelineSettings,
    clock: RotationClock,
    display: Extent,
    target: Option<OffscreenTarget<T>>,
}

impl<T> RenderPipeline<T> {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            clock: RotationClock::new(settings.rotation_rate),
            settings,
            display: Extent::default(),
            target: None,
        }
    }

    pub fn display_size(&self) -> Extent {
        self.display
    }

    /// Size of the current offscreen target, if one is allocated.
    pub fn target_size(&self) -> Option<Extent> {
        self.target.as_ref().map(|t| t.size)
    }

    pub fn rotation(&self) -> &RotationClock {
        &self.clock
    }

    pub fn set_rotation_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    /// Returns the new paused state.
    pub fn toggle_rotation(&mut self) -> bool {
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        debug!(paused, "Cube rotation toggled");
        paused
    }

    /// React to a display resize: store the new size and reallocate the
    /// offscreen target at `display * supersample_factor` right away.
    ///
    /// Returns `true` if the target was reallocated.
    pub fn resize<D: GraphicsDevice<Target = T>>(
        &mut self,
        device: &mut D,
        size: Extent,
        supersample_factor: u32,
    ) -> crate::Result<bool> {
        let wanted = size.supersampled(supersample_factor)?;
        if size != self.display {
            debug!(from = %self.display, to = %size, "Display resized");
            self.display = size;
        }
        self.ensure_target(device, wanted)
    }

    fn ensure_target<D: GraphicsDevice<Target = T>>(
        &mut self,
        device: &mut D,
        size: Extent,
    ) -> crate::Result<bool> {
        if self.target.as_ref().is_some_and(|t| t.size == size) {
            return Ok(false);
        }
        if let Some(old) = self.target.take() {
            debug!(from = %old.size, to = %size, "Reallocating offscreen target");
            device.destroy_target(old.handle);
        } else {
            info!(size = %size, "Allocating offscreen target");
        }
        let handle = device.create_target(size)?;
        self.target = Some(OffscreenTarget { handle, size });
        Ok(true)
    }

    /// Draw one frame: offscreen cube pass, then the composite pass.
    ///
    /// `time` is seconds since start and drives the decorative effect;
    /// `dt` advances the cube rotation.
    pub fn render_frame<D: GraphicsDevice<Target = T>>(
        &mut self,
        device: &mut D,
        view: &ViewState,
        time: f64,
        dt: f64,
        framebuffer_size: Extent,
    ) -> crate::Result<FrameStats> {
        let reallocated = self.resize(device, framebuffer_size, view.supersample_factor())?;
        let Some(target) = self.target.as_ref() else {
            return Err(crate::RenderError::Device(
                "offscreen target missing after allocation".into(),
            ));
        };

        // Pass 1: cube into the offscreen target, depth-tested.
        device.bind_target(&target.handle);
        device.set_viewport(target.size);
        device.set_depth_test(true);
        device.clear(self.settings.background, true);

        let angle = self.clock.advance(dt);
        let mvp = model_view_projection(angle, target.size.aspect_ratio());
        let effect = effect_rotation(time, self.settings.effect_rate);
        device.draw_cube(&CubeUniforms::new(view, mvp, effect))?;

        // Pass 2: composite at native resolution. Depth testing must be off
        // so the quad never tests against last frame's depth contents.
        device.bind_screen();
        device.set_viewport(self.display);
        device.set_depth_test(false);
        device.clear(self.settings.letterbox, false);
        device.draw_composite(&target.handle)?;

        Ok(FrameStats {
            display_size: self.display,
            target_size: target.size,
            rotation_angle: angle,
            reallocated,
        })
    }

    /// Free the offscreen target. The pipeline stays usable; the next frame
    /// allocates a fresh one.
    pub fn release<D: GraphicsDevice<Target = T>>(&mut self, device: &mut D) {
        if let Some(old) = self.target.take() {
            debug!(size = %old.size, "Releasing offscreen target");
            device.destroy_target(old.handle);
        }
    }
}
