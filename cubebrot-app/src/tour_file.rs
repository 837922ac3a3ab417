use std::fs;
use std::path::Path;

use tracing::info;

use cubebrot_core::Tour;

use crate::error::AppError;
use crate::preferences::AppPreferences;

/// The tour named in preferences, or the built-in one when none is set.
pub(crate) fn load_tour(prefs: &AppPreferences) -> Result<Tour, AppError> {
    match prefs.tour_path() {
        Some(path) => read_tour(&path),
        None => {
            info!("Using built-in tour");
            Ok(Tour::builtin())
        }
    }
}

/// Read a JSON array of shots. Validation runs during deserialization, so an
/// empty or malformed tour surfaces as [`AppError::ParseTour`].
pub(crate) fn read_tour(path: &Path) -> Result<Tour, AppError> {
    let json = fs::read_to_string(path).map_err(|source| AppError::ReadTour {
        path: path.to_path_buf(),
        source,
    })?;
    let tour: Tour = serde_json::from_str(&json).map_err(|source| AppError::ParseTour {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        shots = tour.len(),
        duration = tour.total_duration(),
        "Loaded tour from {}",
        path.display()
    );
    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cubebrot-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_valid_tour() {
        let path = temp_file(
            "valid.json",
            r#"[
                {
                    "start_position": { "re": -0.5, "im": 0.0 },
                    "end_position": { "re": -0.75, "im": 0.1 },
                    "start_zoom_exponent": 0.0,
                    "end_zoom_exponent": 10.0,
                    "duration": 4.0
                }
            ]"#,
        );
        let tour = read_tour(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(tour.len(), 1);
        assert_eq!(tour.total_duration(), 4.0);
    }

    #[test]
    fn empty_tour_is_rejected() {
        let path = temp_file("empty.json", "[]");
        let err = read_tour(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::ParseTour { .. }), "{err}");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("/nonexistent/cubebrot/tour.json");
        let err = read_tour(&path).unwrap_err();
        assert!(matches!(err, AppError::ReadTour { .. }));
        assert!(err.to_string().contains("tour.json"));
    }

    #[test]
    fn no_tour_file_means_builtin() {
        let tour = load_tour(&AppPreferences::default()).unwrap();
        assert_eq!(tour.len(), Tour::builtin().len());
    }
}
