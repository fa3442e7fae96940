//! Configuration for the plot pane.

use std::path::PathBuf;
use std::sync::Arc;

/// Toggle individual pane features on or off.
///
/// All features default to `true`. Disable features for a minimal, embedded
/// pane.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    /// Next/previous plot buttons.
    pub navigation: bool,
    /// Remove-plot button.
    pub remove: bool,
    /// Clear-all button.
    pub clear: bool,
    /// Refresh button.
    pub refresh: bool,
    /// Zoom window button.
    pub zoom: bool,
    /// Export menu (image / PDF / clipboard).
    pub export: bool,
    /// Manipulator panel toggle.
    pub manipulator: bool,
    /// Session interrupt button.
    pub interrupt: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            navigation: true,
            remove: true,
            clear: true,
            refresh: true,
            zoom: true,
            export: true,
            manipulator: true,
            interrupt: true,
        }
    }
}

/// Top-level configuration for the plot pane.
#[derive(Clone)]
pub struct PlotPaneConfig {
    /// Native window title.
    pub title: String,
    /// Set when running inside an embedded desktop shell that drives its own
    /// progress channel for plot navigation.
    pub desktop_shell: bool,
    /// Default directory offered for exports.
    pub save_directory: PathBuf,
    /// Preferences file; `None` uses [`crate::prefs::DEFAULT_PREFS_PATH`].
    pub prefs_path: Option<PathBuf>,
    pub features: FeatureFlags,
    /// Invoked when the user hits the interrupt button; the embedding shell
    /// wires this to its console command.
    pub on_interrupt: Option<Arc<dyn Fn() + Send + Sync>>,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for PlotPaneConfig {
    fn default() -> Self {
        Self {
            title: "Plots".to_string(),
            desktop_shell: false,
            save_directory: PathBuf::from("."),
            prefs_path: None,
            features: FeatureFlags::default(),
            on_interrupt: None,
            native_options: None,
        }
    }
}
