//! User-scoped preference persistence.
//!
//! Preferences live in a single JSON file. Writes go through the
//! equality-checked `update_*` methods so that an export which leaves the
//! options untouched causes no write (and no downstream change
//! notification).

use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::export::{ExportPlotOptions, SavePlotAsPdfOptions};

/// Default preferences file location, computed once.
pub static DEFAULT_PREFS_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".plotpane").join("prefs.json")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiPrefs {
    #[serde(default)]
    pub export_plot_options: ExportPlotOptions,
    #[serde(default)]
    pub save_plot_as_pdf_options: SavePlotAsPdfOptions,
}

/// Preference store bound to a file path.
pub struct UiPrefsStore {
    path: PathBuf,
    prefs: UiPrefs,
}

impl UiPrefsStore {
    /// Load preferences from `path`. A missing file yields defaults; an
    /// unreadable or unparsable file logs a warning and also yields defaults
    /// rather than blocking startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(error) => {
                    log::warn!("ignoring malformed prefs file {}: {error}", path.display());
                    UiPrefs::default()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => UiPrefs::default(),
            Err(error) => {
                log::warn!("failed to read prefs file {}: {error}", path.display());
                UiPrefs::default()
            }
        };
        Self { path, prefs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefs(&self) -> &UiPrefs {
        &self.prefs
    }

    /// Persist new image-export options. Returns whether a write occurred;
    /// unchanged options are not rewritten.
    pub fn update_export_plot_options(
        &mut self,
        options: ExportPlotOptions,
    ) -> io::Result<bool> {
        if options == self.prefs.export_plot_options {
            return Ok(false);
        }
        self.prefs.export_plot_options = options;
        self.save()?;
        Ok(true)
    }

    /// Persist new PDF-export options under the same equality check.
    pub fn update_save_plot_as_pdf_options(
        &mut self,
        options: SavePlotAsPdfOptions,
    ) -> io::Result<bool> {
        if options == self.prefs.save_plot_as_pdf_options {
            return Ok(false);
        }
        self.prefs.save_plot_as_pdf_options = options;
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        std::fs::write(&self.path, json)
    }
}
