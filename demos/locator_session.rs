//! Locator walkthrough: the mock session periodically enters locator mode
//! and logs the point the user picks.
//!
//! ```bash
//! cargo run --example locator_session
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use plotpane::export::{ExportFormat, SavePlotContext};
use plotpane::server::{PlotServer, ServerCallback, ServerError};
use plotpane::{EventBus, PlotPaneConfig, PlotsState, Point, SessionEvent};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 360;

/// Single static scatter plot; every navigation operation fails to show the
/// error-dialog path.
struct ScatterSession {
    bus: EventBus,
}

impl ScatterSession {
    fn notify(&self) {
        self.bus.emit(SessionEvent::plots_changed(PlotsState {
            filename: "scatter.png".into(),
            width: WIDTH as i32,
            height: HEIGHT as i32,
            activate_plots: true,
            manipulator: None,
            show_manipulator: false,
        }));
    }

    fn render(width: u32, height: u32) -> Vec<u8> {
        let mut img =
            image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
        // deterministic pseudo-random scatter
        let mut seed = 0x2545f491u32;
        for _ in 0..60 {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            let x = (seed >> 8) % width;
            let y = (seed >> 20) % height;
            for dx in 0..3u32 {
                for dy in 0..3u32 {
                    let px = (x + dx).min(width - 1);
                    let py = (y + dy).min(height - 1);
                    img.put_pixel(px, py, image::Rgba([200, 60, 40, 255]));
                }
            }
        }
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("in-memory PNG encode");
        png
    }

    fn unsupported(done: ServerCallback<()>) {
        done(Err(ServerError::new(
            400,
            "This demo session has a single plot",
        )));
    }
}

impl PlotServer for ScatterSession {
    fn graphics_url(&self, filename: &str) -> String {
        format!("scatter/{filename}")
    }

    fn fetch_plot(&self, _url: &str, done: ServerCallback<Vec<u8>>) {
        done(Ok(Self::render(WIDTH, HEIGHT)));
    }

    fn next_plot(&self, done: ServerCallback<()>) {
        Self::unsupported(done);
    }

    fn previous_plot(&self, done: ServerCallback<()>) {
        Self::unsupported(done);
    }

    fn remove_plot(&self, done: ServerCallback<()>) {
        Self::unsupported(done);
    }

    fn clear_plots(&self, done: ServerCallback<()>) {
        Self::unsupported(done);
    }

    fn refresh_plot(&self, done: ServerCallback<()>) {
        done(Ok(()));
        self.notify();
    }

    fn locator_completed(&self, point: Option<Point>, done: ServerCallback<()>) {
        match point {
            Some(p) => log::info!("nearest data element to ({:.0}, {:.0})", p.x, p.y),
            None => log::info!("locator session cancelled"),
        }
        done(Ok(()));
        self.bus.emit(SessionEvent::console_prompt());
    }

    fn set_manipulator_values(&self, _values: serde_json::Value, done: ServerCallback<()>) {
        done(Ok(()));
    }

    fn manipulator_plot_clicked(&self, _x: f64, _y: f64, done: ServerCallback<()>) {
        done(Ok(()));
    }

    fn save_plot_context(&self, directory: &Path, done: ServerCallback<SavePlotContext>) {
        done(Ok(SavePlotContext {
            directory: directory.to_path_buf(),
            stem: "scatter".into(),
            formats: vec![ExportFormat::Png],
        }));
    }

    fn unique_save_stem(&self, _directory: &Path, done: ServerCallback<String>) {
        done(Ok("scatter".into()));
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let bus = EventBus::new();
    let session = Arc::new(ScatterSession { bus: bus.clone() });

    {
        let bus = bus.clone();
        let session = session.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            session.notify();
            loop {
                std::thread::sleep(Duration::from_secs(10));
                log::info!("session entering locator mode — click a point");
                bus.emit(SessionEvent::locator());
            }
        });
    }

    let config = PlotPaneConfig {
        title: "plotpane – locator session".into(),
        ..Default::default()
    };
    plotpane::run_plot_pane(session, &bus, config)
}
