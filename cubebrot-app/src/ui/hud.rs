use eframe::egui;

use cubebrot_core::NavigationMode;

use crate::app::{CubebrotApp, HUD_CORNER_RADIUS, HUD_MARGIN};

/// Background alpha of the HUD box.
const HUD_ALPHA: u8 = 160;

impl CubebrotApp {
    pub(crate) fn show_hud_overlay(&self, ctx: &egui::Context) {
        let view = self.controller.view();
        let mode = self.controller.mode();
        let tour = self.controller.tour();
        let (paused, frame) = match self.gpu.lock() {
            Ok(gpu) => (gpu.pipeline.rotation().is_paused(), gpu.last_frame),
            Err(_) => (false, None),
        };

        // -- Top-left: navigation state --
        egui::Area::new(egui::Id::new("hud_view"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!("Mode: {}", mode.label()));
                        if mode == NavigationMode::ScriptedTour {
                            ui.label(format!(
                                "Shot {}/{} ({:.0}%)",
                                tour.current_index() + 1,
                                tour.shot_count(),
                                tour.progress().clamp(0.0, 1.0) * 100.0
                            ));
                        }
                        ui.label(format!(
                            "Position: {:.10} {:+.10}i",
                            view.position.re, view.position.im
                        ));
                        ui.label(format!("Zoom: {:.2e}x", view.scroll.magnification()));
                        ui.label(format!("Iterations: {}", view.iteration_cap()));
                    });
            });

        // -- Bottom-left: render state --
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        let factor = view.supersample_factor();
                        match frame {
                            Some(stats) => ui.label(format!(
                                "SSAA {factor}x ({} -> {})",
                                stats.target_size, stats.display_size
                            )),
                            None => ui.label(format!("SSAA {factor}x")),
                        };
                        if paused {
                            ui.colored_label(
                                egui::Color32::from_rgb(255, 180, 50),
                                "Rotation paused",
                            );
                        }
                    });
            });
    }
}
