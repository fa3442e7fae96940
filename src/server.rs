//! Remote operations facade: the session-side calls the plot pane can make.
//!
//! Every operation is asynchronous and one-shot: the implementation performs
//! the request on whatever transport it owns and invokes the callback exactly
//! once with either the result value or a [`ServerError`]. Callbacks may fire
//! on any thread; callers that need the result on the UI thread route it
//! through a channel. No retries happen at this layer — a failed attempt
//! surfaces directly to the caller.

use std::path::Path;

use crate::export::SavePlotContext;
use crate::model::plots::Point;

/// Result of a single remote operation.
pub type ServerResult<T> = Result<T, ServerError>;

/// Completion callback for an asynchronous operation.
pub type ServerCallback<T> = Box<dyn FnOnce(ServerResult<T>) + Send + 'static>;

/// The one error kind this layer models: a remote-operation failure carrying
/// a user-displayable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{user_message} (status {status})")]
pub struct ServerError {
    /// HTTP-style status code.
    pub status: u16,
    pub user_message: String,
}

impl ServerError {
    pub fn new(status: u16, user_message: impl Into<String>) -> Self {
        Self {
            status,
            user_message: user_message.into(),
        }
    }
}

/// Capability-typed interface to the remote rendering session.
pub trait PlotServer: Send + Sync {
    /// Compose the display URL for a graphics resource (a rendered plot file
    /// name, or a parameterized path like `plot_zoom?width=..&height=..`).
    fn graphics_url(&self, filename: &str) -> String;

    /// Fetch the encoded image bytes behind a graphics URL.
    fn fetch_plot(&self, url: &str, done: ServerCallback<Vec<u8>>);

    // ── Plot history navigation ─────────────────────────────────────────────
    fn next_plot(&self, done: ServerCallback<()>);
    fn previous_plot(&self, done: ServerCallback<()>);
    fn remove_plot(&self, done: ServerCallback<()>);
    fn clear_plots(&self, done: ServerCallback<()>);
    fn refresh_plot(&self, done: ServerCallback<()>);

    // ── Locator ─────────────────────────────────────────────────────────────
    /// Report the outcome of a locator session: a picked point, or `None`
    /// for a cancellation.
    fn locator_completed(&self, point: Option<Point>, done: ServerCallback<()>);

    // ── Manipulator ─────────────────────────────────────────────────────────
    fn set_manipulator_values(&self, values: serde_json::Value, done: ServerCallback<()>);
    fn manipulator_plot_clicked(&self, x: f64, y: f64, done: ServerCallback<()>);

    // ── Export ──────────────────────────────────────────────────────────────
    /// Resolve the export context (target directory, unique file stem,
    /// available formats) for saving the current plot as an image.
    fn save_plot_context(&self, directory: &Path, done: ServerCallback<SavePlotContext>);

    /// Resolve a unique file stem within `directory` for a PDF export.
    fn unique_save_stem(&self, directory: &Path, done: ServerCallback<String>);
}
