//! Plot state as reported by the remote rendering session.

use serde::{Deserialize, Serialize};

use super::manipulator::Manipulator;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSize {
    pub width: i32,
    pub height: i32,
}

impl PlotSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A point on the plot surface, in plot pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Snapshot of the currently active plot, produced by the session after each
/// plot-affecting operation and delivered as an out-of-band notification.
///
/// Consumed exactly once per notification; never persisted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotsState {
    /// Session-side file name of the rendered plot image.
    pub filename: String,
    pub width: i32,
    pub height: i32,
    /// Whether the pane should be brought to the foreground.
    #[serde(default)]
    pub activate_plots: bool,
    /// Manipulator schema declared by the plot's generating expression, if any.
    #[serde(default)]
    pub manipulator: Option<Manipulator>,
    #[serde(default)]
    pub show_manipulator: bool,
}

impl PlotsState {
    /// The session returns a zero-byte `empty.*` image when no plot exists.
    /// Some engines render that URL as visible garbage, so the client shows
    /// its own placeholder instead of loading the image.
    pub fn is_empty_placeholder(&self) -> bool {
        self.filename.starts_with("empty.")
    }

    pub fn size(&self) -> PlotSize {
        PlotSize::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_placeholder_matches_prefix_only() {
        let mut state = PlotsState {
            filename: "empty.png".into(),
            width: 400,
            height: 300,
            activate_plots: false,
            manipulator: None,
            show_manipulator: false,
        };
        assert!(state.is_empty_placeholder());

        state.filename = "plot-7.png".into();
        assert!(!state.is_empty_placeholder());

        // "empty" must be a prefix, not a substring
        state.filename = "not-empty.png".into();
        assert!(!state.is_empty_placeholder());
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let state: PlotsState =
            serde_json::from_str(r#"{"filename":"plot-1.png","width":640,"height":480}"#).unwrap();
        assert_eq!(state.size(), PlotSize::new(640, 480));
        assert!(!state.activate_plots);
        assert!(state.manipulator.is_none());
    }
}
