//! Cubebrot keeps `preferences.json` and any custom tour files beside the
//! binary, so a copied build folder carries its own setup.

use std::path::PathBuf;

/// Folder holding the running binary, or the working directory when the
/// executable path cannot be resolved.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_to_an_existing_directory() {
        assert!(exe_directory().is_dir());
    }
}
