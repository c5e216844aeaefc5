//! User preferences that survive between runs.  The only one so far is the colour theme.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The colour theme of the interface
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light text on a dark background
    Dark,
    /// Dark text on a light background
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// The name under which this theme is stored
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// The possible ways that reading or writing the preferences could fail
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The file (or its directory) couldn't be read or written
    #[error("failed to access preferences file {path:?}: {source}")]
    Io {
        /// The path being accessed
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },
    /// The file isn't valid TOML, or has an unexpected value
    #[error("preferences file {path:?} is malformed: {source}")]
    Parse {
        /// The path of the preferences file
        path: PathBuf,
        /// The underlying parse error
        source: toml::de::Error,
    },
    /// The preferences couldn't be turned into TOML
    #[error("failed to serialise preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The on-disk contents of the preferences file
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
struct Stored {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// The preferences, tied to the file they are stored in
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    stored: Stored,
}

impl Preferences {
    /// Reads the preferences stored at `path`.  A missing file means that nothing has been
    /// chosen yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let stored = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| PrefsError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No preferences at {:?}", path);
                Stored::default()
            }
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        Ok(Preferences { path, stored })
    }

    /// The file these preferences are stored in
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The chosen theme, or `None` if the user never chose one
    pub fn theme(&self) -> Option<Theme> {
        self.stored.theme
    }

    /// Chooses a theme and writes it to disk
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PrefsError> {
        self.stored.theme = Some(theme);
        self.save()
    }

    fn save(&self) -> Result<(), PrefsError> {
        let text = toml::to_string(&self.stored)?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| PrefsError::Io {
                path: dir.to_owned(),
                source,
            })?;
        }
        std::fs::write(&self.path, text).map_err(|source| PrefsError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Preferences, PrefsError, Theme};

    #[test]
    fn missing_file_has_no_theme() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(prefs.theme(), None);
    }

    #[test]
    fn theme_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let mut prefs = Preferences::load(&path).unwrap();
        prefs.set_theme(Theme::Light).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "theme = \"light\"\n");

        let mut reloaded = Preferences::load(&path).unwrap();
        assert_eq!(reloaded.theme(), Some(Theme::Light));
        reloaded.set_theme(Theme::Light.toggled()).unwrap();
        assert_eq!(Preferences::load(&path).unwrap().theme(), Some(Theme::Dark));
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let mut prefs = Preferences::load(&path).unwrap();
        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(Preferences::load(&path).unwrap().theme(), Some(Theme::Dark));
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = \"sepia\"\n").unwrap();
        assert!(matches!(
            Preferences::load(&path),
            Err(PrefsError::Parse { .. })
        ));
    }
}
