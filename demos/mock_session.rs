//! Run the plot pane against an in-process mock session.
//!
//! The mock renders sine plots with the `image` crate and drives the full
//! notification protocol: plot-state events after every operation, busy
//! toggles around slow renders, and a manipulator schema on the first plot.
//!
//! ```bash
//! cargo run --example mock_session
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use plotpane::export::{ExportFormat, SavePlotContext};
use plotpane::model::manipulator::Manipulator;
use plotpane::server::{PlotServer, ServerCallback, ServerError};
use plotpane::{EventBus, PlotPaneConfig, PlotsState, SessionEvent};

const PLOT_WIDTH: u32 = 640;
const PLOT_HEIGHT: u32 = 480;

struct SessionState {
    /// Frequencies of the plots in the history, newest last.
    plots: Vec<f64>,
    index: usize,
    /// Manipulator-controlled parameters for plot 0.
    amplitude: f64,
    show_axis: bool,
}

struct MockSession {
    bus: EventBus,
    state: Mutex<SessionState>,
}

impl MockSession {
    fn new(bus: EventBus) -> Self {
        Self {
            bus,
            state: Mutex::new(SessionState {
                plots: vec![1.0, 2.0, 3.5, 5.0],
                index: 0,
                amplitude: 0.8,
                show_axis: true,
            }),
        }
    }

    fn manipulator_schema(state: &SessionState) -> Manipulator {
        serde_json::from_value(serde_json::json!({
            "controls": [
                {"name": "amplitude", "label": "Amplitude", "type": "slider",
                 "min": 0.1, "max": 1.0, "step": 0.1, "initial": state.amplitude},
                {"name": "show_axis", "label": "Show axis", "type": "check_box",
                 "initial": state.show_axis}
            ]
        }))
        .expect("static schema is valid")
    }

    /// Emit the plot-state notification for the current history position.
    fn notify(&self, activate: bool) {
        let state = self.state.lock().unwrap();
        let plots_state = if state.plots.is_empty() {
            PlotsState {
                filename: "empty.png".into(),
                width: PLOT_WIDTH as i32,
                height: PLOT_HEIGHT as i32,
                activate_plots: activate,
                manipulator: None,
                show_manipulator: false,
            }
        } else {
            let has_manipulator = state.index == 0;
            PlotsState {
                filename: format!("plot-{}.png", state.index),
                width: PLOT_WIDTH as i32,
                height: PLOT_HEIGHT as i32,
                activate_plots: activate,
                manipulator: has_manipulator.then(|| Self::manipulator_schema(&state)),
                show_manipulator: has_manipulator,
            }
        };
        drop(state);
        self.bus.emit(SessionEvent::plots_changed(plots_state));
    }

    fn render(&self, width: u32, height: u32, frequency: f64) -> Vec<u8> {
        let state = self.state.lock().unwrap();
        let (amplitude, show_axis) = (state.amplitude, state.show_axis);
        drop(state);

        let mut img =
            image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
        if show_axis {
            for x in 0..width {
                img.put_pixel(x, height / 2, image::Rgba([180, 180, 180, 255]));
            }
        }
        for x in 0..width {
            let phase = x as f64 / width as f64 * frequency * std::f64::consts::TAU;
            let y = (height as f64 / 2.0) * (1.0 - amplitude * phase.sin());
            let y = (y as u32).min(height - 1);
            img.put_pixel(x, y, image::Rgba([30, 90, 200, 255]));
            if y + 1 < height {
                img.put_pixel(x, y + 1, image::Rgba([30, 90, 200, 255]));
            }
        }

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("in-memory PNG encode");
        png
    }

    fn current_frequency(&self) -> f64 {
        let state = self.state.lock().unwrap();
        state.plots.get(state.index).copied().unwrap_or(1.0)
    }

    /// Parse `width=..&height=..` out of a parameterized graphics path.
    fn parse_size(url: &str) -> (u32, u32) {
        let mut width = PLOT_WIDTH;
        let mut height = PLOT_HEIGHT;
        if let Some(query) = url.split('?').nth(1) {
            for pair in query.split('&') {
                match pair.split_once('=') {
                    Some(("width", v)) => width = v.parse().unwrap_or(PLOT_WIDTH),
                    Some(("height", v)) => height = v.parse().unwrap_or(PLOT_HEIGHT),
                    _ => {}
                }
            }
        }
        (width, height)
    }
}

impl PlotServer for MockSession {
    fn graphics_url(&self, filename: &str) -> String {
        format!("mock/{filename}")
    }

    fn fetch_plot(&self, url: &str, done: ServerCallback<Vec<u8>>) {
        let (width, height) = if url.contains('?') {
            MockSession::parse_size(url)
        } else {
            (PLOT_WIDTH, PLOT_HEIGHT)
        };
        done(Ok(self.render(width, height, self.current_frequency())));
    }

    fn next_plot(&self, done: ServerCallback<()>) {
        let advanced = {
            let mut state = self.state.lock().unwrap();
            if state.index + 1 < state.plots.len() {
                state.index += 1;
                true
            } else {
                false
            }
        };
        if advanced {
            done(Ok(()));
            self.notify(false);
        } else {
            done(Err(ServerError::new(400, "No next plot available")));
        }
    }

    fn previous_plot(&self, done: ServerCallback<()>) {
        let moved = {
            let mut state = self.state.lock().unwrap();
            if state.index > 0 {
                state.index -= 1;
                true
            } else {
                false
            }
        };
        if moved {
            done(Ok(()));
            self.notify(false);
        } else {
            done(Err(ServerError::new(400, "No previous plot available")));
        }
    }

    fn remove_plot(&self, done: ServerCallback<()>) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.plots.is_empty() {
                let index = state.index;
                state.plots.remove(index);
                state.index = index.min(state.plots.len().saturating_sub(1));
            }
        }
        done(Ok(()));
        self.notify(false);
    }

    fn clear_plots(&self, done: ServerCallback<()>) {
        {
            let mut state = self.state.lock().unwrap();
            state.plots.clear();
            state.index = 0;
        }
        done(Ok(()));
        self.notify(false);
    }

    fn refresh_plot(&self, done: ServerCallback<()>) {
        done(Ok(()));
        self.notify(false);
    }

    fn locator_completed(
        &self,
        point: Option<plotpane::Point>,
        done: ServerCallback<()>,
    ) {
        match point {
            Some(p) => log::info!("locator picked ({:.0}, {:.0})", p.x, p.y),
            None => log::info!("locator cancelled"),
        }
        done(Ok(()));
        self.bus.emit(SessionEvent::console_prompt());
    }

    fn set_manipulator_values(&self, values: serde_json::Value, done: ServerCallback<()>) {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(amplitude) = values.get("amplitude").and_then(|v| v.as_f64()) {
                state.amplitude = amplitude;
            }
            if let Some(show_axis) = values.get("show_axis").and_then(|v| v.as_bool()) {
                state.show_axis = show_axis;
            }
        }
        done(Ok(()));
        self.notify(false);
    }

    fn manipulator_plot_clicked(&self, x: f64, y: f64, done: ServerCallback<()>) {
        log::info!("manipulator plot clicked at ({x:.0}, {y:.0})");
        done(Ok(()));
        self.notify(false);
    }

    fn save_plot_context(&self, directory: &Path, done: ServerCallback<SavePlotContext>) {
        let index = self.state.lock().unwrap().index;
        done(Ok(SavePlotContext {
            directory: directory.to_path_buf(),
            stem: format!("plot-{index}"),
            formats: vec![
                ExportFormat::Png,
                ExportFormat::Jpeg,
                ExportFormat::Tiff,
                ExportFormat::Svg,
            ],
        }));
    }

    fn unique_save_stem(&self, _directory: &Path, done: ServerCallback<String>) {
        let index = self.state.lock().unwrap().index;
        done(Ok(format!("plot-{index}")));
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let bus = EventBus::new();
    let session = Arc::new(MockSession::new(bus.clone()));

    // Deliver the initial plot state and cycle busy to exercise the
    // interrupt button.
    {
        let bus = bus.clone();
        let session = session.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            session.notify(true);
            loop {
                std::thread::sleep(Duration::from_secs(8));
                bus.emit(SessionEvent::busy(true));
                std::thread::sleep(Duration::from_secs(3));
                bus.emit(SessionEvent::busy(false));
                bus.emit(SessionEvent::console_prompt());
            }
        });
    }

    let config = PlotPaneConfig {
        title: "plotpane – mock session".into(),
        on_interrupt: Some(Arc::new(|| log::info!("interrupt requested"))),
        ..Default::default()
    };
    plotpane::run_plot_pane(session, &bus, config)
}
