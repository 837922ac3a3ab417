mod app;
mod app_dir;
mod error;
mod gl_device;
mod input;
mod preferences;
mod tour_file;
mod ui;

use eframe::egui;
use tracing::{error, info};

use cubebrot_core::{NavigationController, ViewState};

use app::CubebrotApp;
use error::AppError;
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Cubebrot");

    let prefs = AppPreferences::load();
    let controller = match build_controller(&prefs) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return Err(eframe::Error::AppCreation(Box::new(e)));
        }
    };

    let options = eframe::NativeOptions {
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_title("Cubebrot")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "Cubebrot",
        options,
        Box::new(move |cc| match CubebrotApp::new(cc, &prefs, controller) {
            Ok(app) => Ok(Box::new(app) as Box<dyn eframe::App>),
            Err(e) => {
                error!("Failed to initialise renderer: {e}");
                Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
            }
        }),
    )
}

fn build_controller(prefs: &AppPreferences) -> Result<NavigationController, AppError> {
    let view = ViewState::new(prefs.view)?;
    let tour = tour_file::load_tour(prefs)?;
    Ok(NavigationController::new(view, tour))
}
