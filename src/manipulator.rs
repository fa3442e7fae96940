//! Manipulator coordinator: the parameter-adjustment panel bound to the
//! current plot.
//!
//! The schema and visibility are replaced wholesale on every plot-state
//! notification. The panel tracks its own busy flag, independent of the main
//! progress indicator: a manipulator edit in flight does not block other
//! gestures from being distinguished. Busy is set immediately before each
//! server call and cleared only on error — the success clear is deferred to
//! the next plot-state notification, like the main presenter's.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::model::manipulator::Manipulator;
use crate::presenter::Reply;
use crate::server::PlotServer;

pub struct ManipulatorPanel {
    server: Arc<dyn PlotServer>,
    reply_tx: Sender<Reply>,
    manipulator: Option<Manipulator>,
    values: Map<String, Value>,
    visible: bool,
    busy: bool,
}

impl ManipulatorPanel {
    pub(crate) fn new(server: Arc<dyn PlotServer>, reply_tx: Sender<Reply>) -> Self {
        Self {
            server,
            reply_tx,
            manipulator: None,
            values: Map::new(),
            visible: false,
            busy: false,
        }
    }

    /// Replace schema and visibility from a plot-state notification. Values
    /// are re-seeded from the schema's declared initials (the session
    /// re-declares current values as initials after each re-render).
    pub fn set_manipulator(&mut self, manipulator: Option<Manipulator>, show: bool) {
        self.values = manipulator
            .as_ref()
            .map(Manipulator::initial_values)
            .unwrap_or_default();
        self.visible = show && manipulator.is_some();
        self.manipulator = manipulator;
    }

    /// Show the panel if the current plot declares a manipulator.
    pub fn show(&mut self) {
        if self.manipulator.is_some() {
            self.visible = true;
        }
    }

    pub fn manipulator(&self) -> Option<&Manipulator> {
        self.manipulator.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Busy flag for this panel only; independent of the main progress
    /// indicator.
    pub fn set_progress(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.values
    }

    /// Push the current value set to the session for a re-render.
    pub fn values_changed(&mut self) {
        self.busy = true;
        let tx = self.reply_tx.clone();
        self.server.set_manipulator_values(
            Value::Object(self.values.clone()),
            Box::new(move |result| {
                let _ = tx.send(Reply::Manipulator(result));
            }),
        );
    }

    /// Forward a click on the plot surface while the manipulator is shown.
    pub fn plot_clicked(&mut self, x: f64, y: f64) {
        self.busy = true;
        let tx = self.reply_tx.clone();
        self.server.manipulator_plot_clicked(
            x,
            y,
            Box::new(move |result| {
                let _ = tx.send(Reply::Manipulator(result));
            }),
        );
    }
}
