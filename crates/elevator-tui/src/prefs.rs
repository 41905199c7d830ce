//! Display preference file.
//!
//! A small JSON document, `{"theme": "light"}` or `{"theme": "dark"}`. A
//! missing or unreadable file means the light theme.

use std::{fs, io, path::Path};

use elevator_app::Theme;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preference file errors.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// File could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Preferences could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoredTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPrefs {
    #[serde(default)]
    theme: StoredTheme,
}

impl From<StoredTheme> for Theme {
    fn from(theme: StoredTheme) -> Self {
        match theme {
            StoredTheme::Light => Self::Light,
            StoredTheme::Dark => Self::Dark,
        }
    }
}

impl From<Theme> for StoredTheme {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::Light,
            Theme::Dark => Self::Dark,
        }
    }
}

/// Read the saved theme.
pub fn load(path: &Path) -> Theme {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no saved preferences");
            return Theme::default();
        },
    };

    match serde_json::from_str::<StoredPrefs>(&text) {
        Ok(prefs) => prefs.theme.into(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable preferences");
            Theme::default()
        },
    }
}

/// Write the theme, replacing the file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(path: &Path, theme: Theme) -> Result<(), PrefsError> {
    let text = serde_json::to_string(&StoredPrefs { theme: theme.into() })?;
    fs::write(path, text)?;
    tracing::debug!(path = %path.display(), ?theme, "saved preferences");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_is_light() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("prefs.json")), Theme::Light);
    }

    #[test]
    fn saved_theme_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        save(&path, Theme::Dark).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"theme":"dark"}"#);
        assert_eq!(load(&path), Theme::Dark);
    }

    #[test]
    fn unknown_theme_is_light() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();

        assert_eq!(load(&path), Theme::Light);
    }

    #[test]
    fn missing_theme_key_is_light() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(load(&path), Theme::Light);
    }
}
