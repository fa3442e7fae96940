//! Locator coordinator: "pick a point on the plot" mode.
//!
//! At most one locator session is active at a time. Activation records the
//! surface (plot URL + size) the view should render a crosshair over; the
//! session ends by reporting its result to the server exactly once — a
//! picked point, or `None` for a cancellation. Clears triggered by
//! destructive gestures are "quiet": their report errors are logged and
//! swallowed, because the server may have already left locator mode. A
//! console prompt clears the display without reporting at all.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::model::plots::{PlotSize, Point};
use crate::presenter::Reply;
use crate::server::PlotServer;

/// The surface the view renders the point-picking overlay on.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorSurface {
    pub plot_url: String,
    pub size: PlotSize,
}

pub struct Locator {
    server: Arc<dyn PlotServer>,
    reply_tx: Sender<Reply>,
    surface: Option<LocatorSurface>,
}

impl Locator {
    pub(crate) fn new(server: Arc<dyn PlotServer>, reply_tx: Sender<Reply>) -> Self {
        Self {
            server,
            reply_tx,
            surface: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&LocatorSurface> {
        self.surface.as_ref()
    }

    /// Enter (or re-enter) locator mode over the given plot. Re-entering
    /// while already active just replaces the surface.
    pub fn locate(&mut self, plot_url: &str, size: PlotSize) {
        self.surface = Some(LocatorSurface {
            plot_url: plot_url.to_string(),
            size,
        });
    }

    /// End the session with a user result: a picked point, or `None` when
    /// the user cancelled the pick directly. Report errors surface to the
    /// caller through the reply channel.
    pub fn complete(&mut self, point: Option<Point>) {
        if self.surface.take().is_none() {
            return;
        }
        self.report(point, false);
    }

    /// Best-effort clear issued by destructive gestures. Reports a
    /// cancellation but swallows any failure: the server may already have
    /// left locator mode, and the user keeps the console's own gestures to
    /// resolve a still-pending locator either way.
    pub fn clear_quietly(&mut self) {
        if self.surface.take().is_none() {
            return;
        }
        self.report(None, true);
    }

    /// Drop the overlay without reporting. Used on console prompt: the
    /// server has already returned to a non-locator state on its own.
    pub fn clear_display(&mut self) {
        self.surface = None;
    }

    fn report(&self, point: Option<Point>, quiet: bool) {
        let tx = self.reply_tx.clone();
        self.server.locator_completed(
            point,
            Box::new(move |result| {
                let _ = tx.send(Reply::LocatorReport { quiet, result });
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{ServerCallback, ServerError};
    use std::path::Path;
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Records locator reports; other operations are unreachable from
    /// `Locator` and panic.
    struct LocatorOnlyServer {
        reports: Mutex<Vec<Option<Point>>>,
        fail: bool,
    }

    impl LocatorOnlyServer {
        fn new(fail: bool) -> Self {
            Self {
                reports: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl PlotServer for LocatorOnlyServer {
        fn graphics_url(&self, filename: &str) -> String {
            format!("graphics/{filename}")
        }
        fn fetch_plot(&self, _url: &str, _done: ServerCallback<Vec<u8>>) {
            unreachable!()
        }
        fn next_plot(&self, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn previous_plot(&self, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn remove_plot(&self, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn clear_plots(&self, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn refresh_plot(&self, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn locator_completed(&self, point: Option<Point>, done: ServerCallback<()>) {
            self.reports.lock().unwrap().push(point);
            if self.fail {
                done(Err(ServerError::new(500, "locator state already cleared")));
            } else {
                done(Ok(()));
            }
        }
        fn set_manipulator_values(&self, _values: serde_json::Value, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn manipulator_plot_clicked(&self, _x: f64, _y: f64, _done: ServerCallback<()>) {
            unreachable!()
        }
        fn save_plot_context(
            &self,
            _directory: &Path,
            _done: ServerCallback<crate::export::SavePlotContext>,
        ) {
            unreachable!()
        }
        fn unique_save_stem(&self, _directory: &Path, _done: ServerCallback<String>) {
            unreachable!()
        }
    }

    fn locator_with(server: Arc<LocatorOnlyServer>) -> (Locator, mpsc::Receiver<Reply>) {
        let (tx, rx) = mpsc::channel();
        (Locator::new(server, tx), rx)
    }

    #[test]
    fn reports_selection_exactly_once() {
        let server = Arc::new(LocatorOnlyServer::new(false));
        let (mut locator, _rx) = locator_with(server.clone());

        locator.locate("graphics/plot-1.png", PlotSize::new(400, 300));
        assert!(locator.is_active());

        locator.complete(Some(Point::new(10.0, 20.0)));
        assert!(!locator.is_active());
        // a second complete is a no-op
        locator.complete(Some(Point::new(1.0, 2.0)));

        let reports = server.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn relocate_replaces_surface_without_reporting() {
        let server = Arc::new(LocatorOnlyServer::new(false));
        let (mut locator, _rx) = locator_with(server.clone());

        locator.locate("graphics/plot-1.png", PlotSize::new(400, 300));
        locator.locate("graphics/plot-2.png", PlotSize::new(640, 480));

        assert_eq!(
            locator.surface().unwrap().size,
            PlotSize::new(640, 480)
        );
        assert!(server.reports.lock().unwrap().is_empty());
    }

    #[test]
    fn quiet_clear_marks_reply_quiet() {
        let server = Arc::new(LocatorOnlyServer::new(true));
        let (mut locator, rx) = locator_with(server.clone());

        locator.locate("graphics/plot-1.png", PlotSize::new(400, 300));
        locator.clear_quietly();

        match rx.try_recv().unwrap() {
            Reply::LocatorReport { quiet, result } => {
                assert!(quiet);
                assert!(result.is_err());
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(server.reports.lock().unwrap().as_slice(), &[None]);
    }

    #[test]
    fn quiet_clear_when_inactive_does_nothing() {
        let server = Arc::new(LocatorOnlyServer::new(false));
        let (mut locator, rx) = locator_with(server.clone());

        locator.clear_quietly();
        assert!(rx.try_recv().is_err());
        assert!(server.reports.lock().unwrap().is_empty());
    }

    #[test]
    fn console_prompt_clear_never_reports() {
        let server = Arc::new(LocatorOnlyServer::new(false));
        let (mut locator, rx) = locator_with(server.clone());

        locator.locate("graphics/plot-1.png", PlotSize::new(400, 300));
        locator.clear_display();

        assert!(!locator.is_active());
        assert!(rx.try_recv().is_err());
        assert!(server.reports.lock().unwrap().is_empty());
    }
}
