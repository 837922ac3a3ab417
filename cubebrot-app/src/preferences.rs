use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use cubebrot_core::ViewSettings;
use cubebrot_render::PipelineSettings;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// Startup configuration. Read once; navigation state is never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Initial camera, coloring and supersampling.
    #[serde(default)]
    pub view: ViewSettings,
    /// Cube rotation speed, radians per second.
    #[serde(default = "default_rotation_rate")]
    pub rotation_rate: f32,
    /// Speed of the decorative in-shader rotation, radians per second.
    #[serde(default = "default_effect_rate")]
    pub effect_rate: f32,
    /// Optional JSON tour file. Relative paths resolve against the executable
    /// directory. When unset, the built-in tour is used.
    #[serde(default)]
    pub tour_file: Option<String>,
    #[serde(default = "default_true")]
    pub show_hud: bool,
}

fn default_window_width() -> f32 {
    1000.0
}
fn default_window_height() -> f32 {
    1000.0
}
fn default_rotation_rate() -> f32 {
    PipelineSettings::default().rotation_rate
}
fn default_effect_rate() -> f32 {
    PipelineSettings::default().effect_rate
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            view: ViewSettings::default(),
            rotation_rate: default_rotation_rate(),
            effect_rate: default_effect_rate(),
            tour_file: None,
            show_hud: true,
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    /// A missing file is created with the defaults so it can be edited.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
            Self::default()
        } else {
            debug!("No preferences file at {}", path.display());
            let prefs = Self::default();
            prefs.save();
            prefs
        }
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved default preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            rotation_rate: self.rotation_rate,
            effect_rate: self.effect_rate,
            ..PipelineSettings::default()
        }
    }

    /// Absolute path of the configured tour file, if any.
    pub fn tour_path(&self) -> Option<PathBuf> {
        self.tour_file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| crate::app_dir::exe_directory().join(p))
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
