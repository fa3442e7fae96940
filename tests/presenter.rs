//! Presenter behaviour against a scripted fake server and recording display.

use std::path::Path;
use std::sync::{Arc, Mutex};

use plotpane::export::{ExportFormat, SavePlotContext};
use plotpane::presenter::{ConfirmRequest, DestructiveGesture, ExportRequest, PlotsDisplay};
use plotpane::server::{PlotServer, ServerCallback, ServerError, ServerResult};
use plotpane::{
    EventBus, PlotPaneConfig, PlotSize, PlotsPresenter, PlotsState, Point, SessionEvent,
};

// ─────────────────────────────────────────────────────────────────────────────
// Fakes
// ─────────────────────────────────────────────────────────────────────────────

/// Records calls and defers gesture callbacks so tests control reply timing.
#[derive(Default)]
struct FakeServer {
    url_requests: Mutex<Vec<String>>,
    gesture_callbacks: Mutex<Vec<ServerCallback<()>>>,
    remove_calls: Mutex<usize>,
    clear_calls: Mutex<usize>,
    locator_reports: Mutex<Vec<Option<Point>>>,
    locator_fail: bool,
    manipulator_fail: bool,
    context_callbacks: Mutex<Vec<ServerCallback<SavePlotContext>>>,
}

impl FakeServer {
    fn fire_gesture(&self, result: ServerResult<()>) {
        let cb = self.gesture_callbacks.lock().unwrap().remove(0);
        cb(result);
    }

    fn fire_save_context(&self, result: ServerResult<SavePlotContext>) {
        let cb = self.context_callbacks.lock().unwrap().remove(0);
        cb(result);
    }

    fn pending_gestures(&self) -> usize {
        self.gesture_callbacks.lock().unwrap().len()
    }
}

impl PlotServer for FakeServer {
    fn graphics_url(&self, filename: &str) -> String {
        self.url_requests.lock().unwrap().push(filename.to_string());
        format!("graphics/{filename}")
    }
    fn fetch_plot(&self, _url: &str, _done: ServerCallback<Vec<u8>>) {}
    fn next_plot(&self, done: ServerCallback<()>) {
        self.gesture_callbacks.lock().unwrap().push(done);
    }
    fn previous_plot(&self, done: ServerCallback<()>) {
        self.gesture_callbacks.lock().unwrap().push(done);
    }
    fn remove_plot(&self, done: ServerCallback<()>) {
        *self.remove_calls.lock().unwrap() += 1;
        self.gesture_callbacks.lock().unwrap().push(done);
    }
    fn clear_plots(&self, done: ServerCallback<()>) {
        *self.clear_calls.lock().unwrap() += 1;
        self.gesture_callbacks.lock().unwrap().push(done);
    }
    fn refresh_plot(&self, done: ServerCallback<()>) {
        self.gesture_callbacks.lock().unwrap().push(done);
    }
    fn locator_completed(&self, point: Option<Point>, done: ServerCallback<()>) {
        self.locator_reports.lock().unwrap().push(point);
        if self.locator_fail {
            done(Err(ServerError::new(500, "locator state already cleared")));
        } else {
            done(Ok(()));
        }
    }
    fn set_manipulator_values(&self, _values: serde_json::Value, done: ServerCallback<()>) {
        if self.manipulator_fail {
            done(Err(ServerError::new(500, "re-render failed")));
        } else {
            done(Ok(()));
        }
    }
    fn manipulator_plot_clicked(&self, _x: f64, _y: f64, done: ServerCallback<()>) {
        done(Ok(()));
    }
    fn save_plot_context(&self, _directory: &Path, done: ServerCallback<SavePlotContext>) {
        self.context_callbacks.lock().unwrap().push(done);
    }
    fn unique_save_stem(&self, _directory: &Path, done: ServerCallback<String>) {
        done(Ok("plot-1".into()));
    }
}

#[derive(Default)]
struct FakeDisplay {
    empty_shown: usize,
    plots_shown: Vec<String>,
    progress: bool,
    progress_history: Vec<bool>,
    errors: Vec<(String, String)>,
    confirms: Vec<ConfirmRequest>,
    zooms: Vec<(String, PlotSize)>,
    front_count: usize,
    frame_size: PlotSize,
    client_size: PlotSize,
    url: Option<String>,
}

impl FakeDisplay {
    fn new() -> Self {
        Self {
            frame_size: PlotSize::new(500, 400),
            client_size: PlotSize::new(1000, 800),
            ..Default::default()
        }
    }
}

impl PlotsDisplay for FakeDisplay {
    fn show_empty_plot(&mut self) {
        self.empty_shown += 1;
        self.url = None;
    }
    fn show_plot(&mut self, url: &str) {
        self.plots_shown.push(url.to_string());
        self.url = Some(url.to_string());
    }
    fn plot_url(&self) -> Option<String> {
        self.url.clone()
    }
    fn plot_frame_size(&self) -> PlotSize {
        self.frame_size
    }
    fn client_size(&self) -> PlotSize {
        self.client_size
    }
    fn bring_to_front(&mut self) {
        self.front_count += 1;
    }
    fn set_progress(&mut self, busy: bool) {
        self.progress = busy;
        self.progress_history.push(busy);
    }
    fn show_error(&mut self, caption: &str, message: &str) {
        self.errors.push((caption.to_string(), message.to_string()));
    }
    fn confirm(&mut self, request: ConfirmRequest) {
        self.confirms.push(request);
    }
    fn open_zoom_window(&mut self, url: &str, size: PlotSize) {
        self.zooms.push((url.to_string(), size));
    }
}

fn state(filename: &str, width: i32, height: i32) -> PlotsState {
    PlotsState {
        filename: filename.into(),
        width,
        height,
        activate_plots: false,
        manipulator: None,
        show_manipulator: false,
    }
}

struct Harness {
    server: Arc<FakeServer>,
    bus: EventBus,
    presenter: PlotsPresenter,
    display: FakeDisplay,
}

impl Harness {
    fn new() -> Self {
        Self::with_server(FakeServer::default(), PlotPaneConfig::default())
    }

    fn with_server(server: FakeServer, config: PlotPaneConfig) -> Self {
        let server = Arc::new(server);
        let bus = EventBus::new();
        let presenter = PlotsPresenter::new(server.clone(), &bus, &config);
        Self {
            server,
            bus,
            presenter,
            display: FakeDisplay::new(),
        }
    }

    fn notify(&mut self, state: PlotsState) {
        self.bus.emit(SessionEvent::plots_changed(state));
        self.presenter.poll(&mut self.display);
    }

    fn poll(&mut self) {
        self.presenter.poll(&mut self.display);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plot-state notifications
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_placeholder_shows_empty_view_and_requests_no_url() {
    let mut h = Harness::new();
    h.notify(state("empty.png", 400, 300));

    assert_eq!(h.display.empty_shown, 1);
    assert!(h.display.plots_shown.is_empty());
    assert!(h.server.url_requests.lock().unwrap().is_empty());
}

#[test]
fn notification_requests_exactly_one_display_url() {
    let mut h = Harness::new();
    h.notify(state("plot-7.png", 400, 300));

    assert_eq!(
        h.server.url_requests.lock().unwrap().as_slice(),
        &["plot-7.png".to_string()]
    );
    assert_eq!(h.display.plots_shown, vec!["graphics/plot-7.png"]);
}

#[test]
fn activate_flag_brings_view_to_front() {
    let mut h = Harness::new();
    let mut s = state("plot-1.png", 400, 300);
    s.activate_plots = true;
    h.notify(s);
    assert_eq!(h.display.front_count, 1);

    h.notify(state("plot-2.png", 400, 300));
    assert_eq!(h.display.front_count, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress policy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn progress_clears_only_on_next_notification_not_on_gesture_success() {
    let mut h = Harness::new();
    h.presenter.next_plot(&mut h.display);
    assert!(h.display.progress);

    // server acknowledges, but rendering has not completed yet
    h.server.fire_gesture(Ok(()));
    h.poll();
    assert!(h.display.progress, "success must not clear progress");

    h.notify(state("plot-2.png", 400, 300));
    assert!(!h.display.progress);
}

#[test]
fn gesture_error_clears_progress_and_shows_dialog() {
    let mut h = Harness::new();
    h.presenter.refresh_plot(&mut h.display);
    assert!(h.display.progress);

    h.server.fire_gesture(Err(ServerError::new(500, "graphics device lost")));
    h.poll();

    assert!(!h.display.progress);
    assert_eq!(
        h.display.errors.as_slice(),
        &[("Server Error".to_string(), "graphics device lost".to_string())]
    );
}

#[test]
fn desktop_shell_skips_progress_for_navigation_only() {
    let config = PlotPaneConfig {
        desktop_shell: true,
        ..Default::default()
    };
    let mut h = Harness::with_server(FakeServer::default(), config);

    h.presenter.next_plot(&mut h.display);
    h.presenter.previous_plot(&mut h.display);
    assert!(h.display.progress_history.is_empty());

    h.presenter.refresh_plot(&mut h.display);
    assert_eq!(h.display.progress_history, vec![true]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Locator
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn locate_uses_cached_plot_size_over_frame_size() {
    let mut h = Harness::new();
    h.notify(state("plot-1.png", 400, 300));
    h.display.frame_size = PlotSize::new(512, 384);

    h.bus.emit(SessionEvent::locator());
    h.poll();

    let surface = h.presenter.locator().surface().expect("locator active");
    assert_eq!(surface.size, PlotSize::new(400, 300));
    assert_eq!(surface.plot_url, "graphics/plot-1.png");
}

#[test]
fn locate_falls_back_to_frame_size_without_a_cached_size() {
    let mut h = Harness::new();
    h.bus.emit(SessionEvent::locator());
    h.poll();

    let surface = h.presenter.locator().surface().expect("locator active");
    assert_eq!(surface.size, PlotSize::new(500, 400));
}

#[test]
fn notification_redrives_an_active_locator() {
    let mut h = Harness::new();
    h.bus.emit(SessionEvent::locator());
    h.poll();

    h.notify(state("plot-9.png", 404, 304));

    let surface = h.presenter.locator().surface().expect("still active");
    assert_eq!(surface.size, PlotSize::new(404, 304));
    assert_eq!(surface.plot_url, "graphics/plot-9.png");
}

#[test]
fn console_prompt_clears_locator_without_reporting() {
    let mut h = Harness::new();
    h.bus.emit(SessionEvent::locator());
    h.poll();
    assert!(h.presenter.locator().is_active());

    h.bus.emit(SessionEvent::console_prompt());
    h.poll();

    assert!(!h.presenter.locator().is_active());
    assert!(h.server.locator_reports.lock().unwrap().is_empty());
}

#[test]
fn point_selection_reports_once() {
    let mut h = Harness::new();
    h.bus.emit(SessionEvent::locator());
    h.poll();

    h.presenter.locator_point_selected(Point::new(120.0, 80.0));
    h.poll();

    assert!(!h.presenter.locator().is_active());
    assert_eq!(
        h.server.locator_reports.lock().unwrap().as_slice(),
        &[Some(Point::new(120.0, 80.0))]
    );
    assert!(h.display.errors.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Destructive gestures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn remove_plot_quietly_clears_locator_and_swallows_the_failure() {
    let server = FakeServer {
        locator_fail: true,
        ..Default::default()
    };
    let mut h = Harness::with_server(server, PlotPaneConfig::default());
    h.bus.emit(SessionEvent::locator());
    h.poll();

    h.presenter.remove_plot(&mut h.display);
    h.poll();

    // the cancellation was attempted and its failure stayed silent
    assert_eq!(h.server.locator_reports.lock().unwrap().as_slice(), &[None]);
    assert!(h.display.errors.is_empty());
    assert!(!h.presenter.locator().is_active());
}

#[test]
fn destructive_gestures_wait_for_confirmation() {
    let mut h = Harness::new();
    h.presenter.remove_plot(&mut h.display);

    assert_eq!(h.display.confirms.len(), 1);
    assert_eq!(
        h.display.confirms[0].gesture,
        DestructiveGesture::RemovePlot
    );
    assert_eq!(*h.server.remove_calls.lock().unwrap(), 0);

    h.presenter
        .confirm_resolved(&mut h.display, DestructiveGesture::RemovePlot, true);
    assert_eq!(*h.server.remove_calls.lock().unwrap(), 1);
    assert!(h.display.progress);
}

#[test]
fn declined_confirmation_calls_nothing() {
    let mut h = Harness::new();
    h.presenter.clear_plots(&mut h.display);
    assert_eq!(h.display.confirms[0].gesture, DestructiveGesture::ClearPlots);

    h.presenter
        .confirm_resolved(&mut h.display, DestructiveGesture::ClearPlots, false);

    assert_eq!(*h.server.clear_calls.lock().unwrap(), 0);
    assert!(!h.display.progress);
    assert_eq!(h.server.pending_gestures(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Manipulator
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn manipulator_error_clears_its_own_busy_flag_only() {
    let server = FakeServer {
        manipulator_fail: true,
        ..Default::default()
    };
    let mut h = Harness::with_server(server, PlotPaneConfig::default());
    h.display.set_progress(true);

    h.presenter.manipulator_mut().values_changed();
    assert!(h.presenter.manipulator().is_busy());
    h.poll();

    assert!(!h.presenter.manipulator().is_busy());
    assert_eq!(h.display.errors.len(), 1);
    // the main indicator is untouched by a manipulator failure
    assert!(h.display.progress);
}

#[test]
fn notification_clears_both_progress_flags() {
    let mut h = Harness::new();
    h.display.set_progress(true);
    h.presenter.manipulator_mut().set_progress(true);

    h.notify(state("plot-3.png", 400, 300));

    assert!(!h.display.progress);
    assert!(!h.presenter.manipulator().is_busy());
}

// ─────────────────────────────────────────────────────────────────────────────
// Zoom and export
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zoom_opens_a_window_fit_to_the_client_area() {
    let mut h = Harness::new();
    h.display.frame_size = PlotSize::new(1600, 1200);
    h.display.client_size = PlotSize::new(1000, 800);

    h.presenter.zoom_plot(&mut h.display);

    assert_eq!(
        h.display.zooms.as_slice(),
        &[(
            "graphics/plot_zoom?width=980&height=735".to_string(),
            PlotSize::new(980, 735)
        )]
    );
}

#[test]
fn save_as_image_parks_an_export_request_on_success() {
    let mut h = Harness::new();
    h.presenter.save_plot_as_image(&mut h.display);
    assert!(h.display.progress);
    assert!(h.presenter.take_export_request().is_none());

    let context = SavePlotContext {
        directory: "/tmp/exports".into(),
        stem: "plot-1".into(),
        formats: vec![ExportFormat::Png],
    };
    h.server.fire_save_context(Ok(context.clone()));
    h.poll();

    assert!(!h.display.progress);
    assert_eq!(
        h.presenter.take_export_request(),
        Some(ExportRequest::Image { context })
    );
}

#[test]
fn save_context_error_surfaces_and_clears_progress() {
    let mut h = Harness::new();
    h.presenter.save_plot_as_image(&mut h.display);

    h.server
        .fire_save_context(Err(ServerError::new(500, "no active plot")));
    h.poll();

    assert!(!h.display.progress);
    assert_eq!(h.display.errors[0].1, "no active plot");
    assert!(h.presenter.take_export_request().is_none());
}

#[test]
fn save_as_pdf_resolves_stem_then_parks_request() {
    let mut h = Harness::new();
    h.presenter.save_plot_as_pdf(&mut h.display);
    h.poll();

    match h.presenter.take_export_request() {
        Some(ExportRequest::Pdf { stem, .. }) => assert_eq!(stem, "plot-1"),
        other => panic!("expected pdf request, got {other:?}"),
    }
}

#[test]
fn copy_to_clipboard_needs_no_server_roundtrip() {
    let mut h = Harness::new();
    h.presenter.copy_plot_to_clipboard(&mut h.display);
    assert_eq!(
        h.presenter.take_export_request(),
        Some(ExportRequest::Clipboard)
    );
}
