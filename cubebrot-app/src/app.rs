use std::sync::{Arc, Mutex};

use eframe::egui;
use eframe::egui_glow;
use eframe::glow;
use tracing::{error, info, warn};

use cubebrot_core::{NavigationController, ViewState};
use cubebrot_render::{FrameStats, GraphicsDevice, RenderError, RenderPipeline};

use crate::error::AppError;
use crate::gl_device::{GlDevice, GlResources, GlTarget, ScreenTarget};
use crate::input;
use crate::preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Frame times below this are treated as "no measurement" for the FPS readout.
const MIN_FRAME_TIME: f64 = 1e-6;

/// HUD box margin from the window edge.
pub(crate) const HUD_MARGIN: f32 = 8.0;
/// HUD box corner radius.
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// GPU state shared with the paint callback
// ---------------------------------------------------------------------------

/// Everything the paint callback touches. Only ever locked on the UI thread.
pub(crate) struct GpuState {
    resources: GlResources,
    pub(crate) pipeline: RenderPipeline<GlTarget>,
    pub(crate) last_frame: Option<FrameStats>,
}

impl GpuState {
    fn paint(
        &mut self,
        painter: &egui_glow::Painter,
        info: &egui::PaintCallbackInfo,
        view: &ViewState,
        time: f64,
        dt: f64,
    ) {
        let (screen, size) = ScreenTarget::from_callback(info, painter.intermediate_fbo());
        let mut device = GlDevice::new(painter.gl(), &mut self.resources, screen);
        match self.pipeline.render_frame(&mut device, view, time, dt, size) {
            Ok(stats) => self.last_frame = Some(stats),
            Err(e) => {
                if matches!(
                    e,
                    RenderError::InvalidTargetSize { .. } | RenderError::TargetOverflow { .. }
                ) {
                    warn!("Frame skipped: {e}");
                } else {
                    error!("Frame skipped: {e}");
                }
                // Hand egui back its own framebuffer whatever pass failed.
                device.bind_screen();
            }
        }
    }

    fn destroy(&mut self, gl: &glow::Context) {
        let mut device = GlDevice::new(gl, &mut self.resources, ScreenTarget::detached());
        self.pipeline.release(&mut device);
        self.resources.destroy(gl);
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub(crate) struct CubebrotApp {
    pub(crate) controller: NavigationController,
    pub(crate) gpu: Arc<Mutex<GpuState>>,
    pub(crate) show_hud: bool,
    /// Last title sent to the window, to avoid redundant viewport commands.
    title: String,
}

impl CubebrotApp {
    pub(crate) fn new(
        cc: &eframe::CreationContext<'_>,
        prefs: &AppPreferences,
        controller: NavigationController,
    ) -> Result<Self, AppError> {
        let gl = cc.gl.as_ref().ok_or(AppError::NoGlContext)?;
        let resources = GlResources::new(gl)?;
        let pipeline = RenderPipeline::new(prefs.pipeline_settings());

        info!(
            mode = controller.mode().label(),
            shots = controller.tour().shot_count(),
            "Cubebrot ready"
        );

        Ok(Self {
            controller,
            gpu: Arc::new(Mutex::new(GpuState {
                resources,
                pipeline,
                last_frame: None,
            })),
            show_hud: prefs.show_hud,
            title: String::new(),
        })
    }

    fn update_title(&mut self, ctx: &egui::Context, dt: f64) {
        let title = window_title(dt, self.controller.view());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn show_cube(&self, ctx: &egui::Context, time: f64, dt: f64) {
        let view = *self.controller.view();
        let gpu = Arc::clone(&self.gpu);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let callback = egui::PaintCallback {
                    rect,
                    callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                        match gpu.lock() {
                            Ok(mut gpu) => gpu.paint(painter, &info, &view, time, dt),
                            Err(_) => error!("GPU state poisoned; frame skipped"),
                        }
                    })),
                };
                ui.painter().add(callback);
            });
    }
}

impl eframe::App for CubebrotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (time, dt) = ctx.input(|i| (i.time, f64::from(i.unstable_dt)));
        let (snapshot, commands) = input::read_input(ctx);

        let events = self.controller.advance(dt, &snapshot);

        if let Some(position) = events.report_position {
            info!(re = position.re, im = position.im, "position");
            println!("{position}");
        }
        if commands.toggle_hud {
            self.show_hud = !self.show_hud;
        }
        if commands.toggle_rotation {
            match self.gpu.lock() {
                Ok(mut gpu) => {
                    gpu.pipeline.toggle_rotation();
                }
                Err(_) => warn!("GPU state poisoned; rotation toggle ignored"),
            }
        }

        self.update_title(ctx, dt);
        self.show_cube(ctx, time, dt);
        if self.show_hud {
            self.show_hud_overlay(ctx);
        }

        if events.quit {
            info!("Quit requested");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Continuous animation: the tour and rotation advance every frame.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        let Some(gl) = gl else {
            return;
        };
        match self.gpu.lock() {
            Ok(mut gpu) => gpu.destroy(gl),
            Err(_) => warn!("GPU state poisoned; skipping GL cleanup"),
        }
        info!("Cubebrot shut down");
    }
}

/// `Cubebrot - {fps}fps  {magnification}x zoom  {iters} iters`. The FPS part is
/// left out when `dt` is too small to measure.
pub(crate) fn window_title(dt: f64, view: &ViewState) -> String {
    let fps = if dt.is_finite() && dt > MIN_FRAME_TIME {
        format!("{}fps  ", (1.0 / dt) as i64)
    } else {
        String::new()
    };
    format!(
        "Cubebrot - {fps}{}x zoom  {} iters",
        view.scroll.magnification() as i64,
        view.iteration_cap()
    )
}
