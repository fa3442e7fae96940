//! Plot presenter: orchestrates the plot pane against the remote session.
//!
//! User gestures call the server and set the progress indicator; the
//! indicator is cleared only by an error for that gesture or by the next
//! plot-state notification — never synchronously after issuing the call,
//! because rendering completion is signalled out-of-band. Server callbacks
//! may fire on any thread, so they post [`Reply`] messages to an internal
//! channel that [`poll`](PlotsPresenter::poll) drains on the UI thread, where
//! all mutation happens.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use crate::config::PlotPaneConfig;
use crate::events::{EventBus, EventFilter, EventKind, SessionEvent};
use crate::export::SavePlotContext;
use crate::locator::Locator;
use crate::manipulator::ManipulatorPanel;
use crate::model::plots::{PlotSize, PlotsState, Point};
use crate::server::{PlotServer, ServerCallback, ServerResult};
use crate::zoom;

/// View-side surface the presenter drives. The egui implementation lives in
/// [`crate::ui::plot_view`]; tests substitute a recording fake.
pub trait PlotsDisplay {
    fn show_empty_plot(&mut self);
    fn show_plot(&mut self, url: &str);
    /// URL of the plot currently shown, if any.
    fn plot_url(&self) -> Option<String>;
    /// Live size of the plot frame widget.
    fn plot_frame_size(&self) -> PlotSize;
    /// Size of the whole client area (for zoom-window fitting).
    fn client_size(&self) -> PlotSize;
    fn bring_to_front(&mut self);
    fn set_progress(&mut self, busy: bool);
    /// Blocking error dialog with a server-provided message.
    fn show_error(&mut self, caption: &str, message: &str);
    /// Ask the user to confirm a destructive gesture; the answer comes back
    /// through [`PlotsPresenter::confirm_resolved`].
    fn confirm(&mut self, request: ConfirmRequest);
    /// Open a separate minimal-chrome window showing `url` at `size`.
    fn open_zoom_window(&mut self, url: &str, size: PlotSize);
}

/// Destructive gestures that require confirmation before hitting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveGesture {
    RemovePlot,
    ClearPlots,
}

/// A yes/no question the view must put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub caption: &'static str,
    pub message: &'static str,
    pub gesture: DestructiveGesture,
}

/// An export the presenter has prepared; the UI picks it up via
/// [`PlotsPresenter::take_export_request`] and runs the dialog workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportRequest {
    Image { context: SavePlotContext },
    Pdf { directory: PathBuf, stem: String },
    Clipboard,
}

/// Completion messages routed from server callbacks back to the UI thread.
#[derive(Debug)]
pub(crate) enum Reply {
    /// Navigation / remove / clear / refresh outcome.
    Gesture(ServerResult<()>),
    Manipulator(ServerResult<()>),
    LocatorReport {
        quiet: bool,
        result: ServerResult<()>,
    },
    SaveContext(ServerResult<SavePlotContext>),
    SaveStem {
        directory: PathBuf,
        result: ServerResult<String>,
    },
}

pub struct PlotsPresenter {
    server: Arc<dyn PlotServer>,
    events: Receiver<SessionEvent>,
    reply_tx: Sender<Reply>,
    reply_rx: Receiver<Reply>,
    locator: Locator,
    manipulator: ManipulatorPanel,
    /// Size of the most recently rendered plot, from the last notification.
    plot_size: Option<PlotSize>,
    desktop_shell: bool,
    save_directory: PathBuf,
    pending_export: Option<ExportRequest>,
}

impl PlotsPresenter {
    /// Subscribes to the session events the presenter reacts to; the
    /// subscription lives as long as the presenter.
    pub fn new(server: Arc<dyn PlotServer>, bus: &EventBus, config: &PlotPaneConfig) -> Self {
        let events = bus.subscribe(EventFilter::only(
            EventKind::PLOTS_CHANGED | EventKind::CONSOLE_PROMPT | EventKind::LOCATOR,
        ));
        let (reply_tx, reply_rx) = std::sync::mpsc::channel();
        let locator = Locator::new(server.clone(), reply_tx.clone());
        let manipulator = ManipulatorPanel::new(server.clone(), reply_tx.clone());
        Self {
            server,
            events,
            reply_tx,
            reply_rx,
            locator,
            manipulator,
            plot_size: None,
            desktop_shell: config.desktop_shell,
            save_directory: config.save_directory.clone(),
            pending_export: None,
        }
    }

    /// Drain pending session events and server replies. Call once per frame
    /// on the UI thread. Notifications and replies interleave arbitrarily;
    /// the progress indicator clears on whichever relevant message arrives
    /// last.
    pub fn poll(&mut self, display: &mut dyn PlotsDisplay) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(display, event);
        }
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.handle_reply(display, reply);
        }
    }

    fn handle_event(&mut self, display: &mut dyn PlotsDisplay, event: SessionEvent) {
        if event.kinds.contains(EventKind::PLOTS_CHANGED) {
            if let Some(state) = event.plots_state {
                self.on_plots_changed(display, state);
            }
        } else if event.kinds.contains(EventKind::LOCATOR) {
            self.on_locator(display);
        } else if event.kinds.contains(EventKind::CONSOLE_PROMPT) {
            self.on_console_prompt();
        }
    }

    /// React to a plot-state notification.
    pub fn on_plots_changed(&mut self, display: &mut dyn PlotsDisplay, state: PlotsState) {
        // whichever of {gesture reply, notification} arrives last clears
        display.set_progress(false);
        self.manipulator.set_progress(false);

        if state.is_empty_placeholder() {
            display.show_empty_plot();
        } else {
            let url = self.server.graphics_url(&state.filename);
            display.show_plot(&url);
        }

        if state.activate_plots {
            display.bring_to_front();
        }

        self.plot_size = Some(state.size());

        self.manipulator
            .set_manipulator(state.manipulator.clone(), state.show_manipulator);

        if self.locator.is_active() {
            self.locate(display);
        }
    }

    /// The session entered locator mode.
    pub fn on_locator(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        self.locate(display);
    }

    /// Console prompt: the server already left locator mode on its own, so
    /// just drop the overlay without reporting.
    pub fn on_console_prompt(&mut self) {
        self.locator.clear_display();
    }

    // ── Gestures ────────────────────────────────────────────────────────────

    pub fn next_plot(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        self.set_change_plot_progress(display);
        self.server.next_plot(self.gesture_callback());
    }

    pub fn previous_plot(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        self.set_change_plot_progress(display);
        self.server.previous_plot(self.gesture_callback());
    }

    pub fn refresh_plot(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        display.set_progress(true);
        self.server.refresh_plot(self.gesture_callback());
    }

    pub fn remove_plot(&mut self, display: &mut dyn PlotsDisplay) {
        // the delete gesture means we are done with any locator session
        self.locator.clear_quietly();

        display.confirm(ConfirmRequest {
            caption: "Remove Plot",
            message: "Are you sure you want to remove the current plot?",
            gesture: DestructiveGesture::RemovePlot,
        });
        display.bring_to_front();
    }

    pub fn clear_plots(&mut self, display: &mut dyn PlotsDisplay) {
        self.locator.clear_quietly();

        display.confirm(ConfirmRequest {
            caption: "Clear Plots",
            message: "Are you sure you want to clear all of the plots in the history?",
            gesture: DestructiveGesture::ClearPlots,
        });
    }

    /// Outcome of a confirmation dialog raised by a destructive gesture.
    pub fn confirm_resolved(
        &mut self,
        display: &mut dyn PlotsDisplay,
        gesture: DestructiveGesture,
        confirmed: bool,
    ) {
        if !confirmed {
            return;
        }
        display.set_progress(true);
        match gesture {
            DestructiveGesture::RemovePlot => self.server.remove_plot(self.gesture_callback()),
            DestructiveGesture::ClearPlots => self.server.clear_plots(self.gesture_callback()),
        }
    }

    pub fn zoom_plot(&mut self, display: &mut dyn PlotsDisplay) {
        let size = zoom::zoom_window_size(display.plot_frame_size(), display.client_size());
        let url = self.server.graphics_url(&zoom::zoom_url_path(size));
        display.open_zoom_window(&url, size);
    }

    // ── Export gestures ─────────────────────────────────────────────────────

    pub fn save_plot_as_image(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        display.set_progress(true);

        let tx = self.reply_tx.clone();
        self.server.save_plot_context(
            &self.save_directory,
            Box::new(move |result| {
                let _ = tx.send(Reply::SaveContext(result));
            }),
        );
    }

    pub fn save_plot_as_pdf(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        display.set_progress(true);

        let directory = self.save_directory.clone();
        let tx = self.reply_tx.clone();
        self.server.unique_save_stem(
            &self.save_directory,
            Box::new(move |result| {
                let _ = tx.send(Reply::SaveStem { directory, result });
            }),
        );
    }

    pub fn copy_plot_to_clipboard(&mut self, display: &mut dyn PlotsDisplay) {
        display.bring_to_front();
        self.pending_export = Some(ExportRequest::Clipboard);
    }

    /// Export prepared by a gesture, if any. The UI consumes it and runs the
    /// dialog workflow.
    pub fn take_export_request(&mut self) -> Option<ExportRequest> {
        self.pending_export.take()
    }

    // ── Locator / manipulator access ────────────────────────────────────────

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn locator_point_selected(&mut self, point: Point) {
        self.locator.complete(Some(point));
    }

    pub fn locator_cancelled(&mut self) {
        self.locator.complete(None);
    }

    pub fn show_manipulator(&mut self) {
        self.manipulator.show();
    }

    pub fn manipulator(&self) -> &ManipulatorPanel {
        &self.manipulator
    }

    pub fn manipulator_mut(&mut self) -> &mut ManipulatorPanel {
        &mut self.manipulator
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn locate(&mut self, display: &mut dyn PlotsDisplay) {
        let url = display.plot_url().unwrap_or_default();
        let size = self.plot_size(display);
        self.locator.locate(&url, size);
    }

    /// The rendering engine may adjust plot dimensions to satisfy format
    /// constraints (e.g. multiples of 4 for some encoders), so the size from
    /// the last notification wins over the live frame size.
    fn plot_size(&self, display: &dyn PlotsDisplay) -> PlotSize {
        self.plot_size
            .unwrap_or_else(|| display.plot_frame_size())
    }

    /// An embedded desktop shell drives its own progress channel for plot
    /// navigation, so skip the in-pane indicator there.
    fn set_change_plot_progress(&self, display: &mut dyn PlotsDisplay) {
        if !self.desktop_shell {
            display.set_progress(true);
        }
    }

    fn gesture_callback(&self) -> ServerCallback<()> {
        let tx = self.reply_tx.clone();
        Box::new(move |result| {
            let _ = tx.send(Reply::Gesture(result));
        })
    }

    fn handle_reply(&mut self, display: &mut dyn PlotsDisplay, reply: Reply) {
        match reply {
            // Progress is not cleared on success: that waits for the next
            // plot-state notification, so rendering has finished by the time
            // the indicator goes away.
            Reply::Gesture(Ok(())) => {}
            Reply::Gesture(Err(error)) => {
                display.set_progress(false);
                display.show_error("Server Error", &error.user_message);
            }
            Reply::Manipulator(Ok(())) => {}
            Reply::Manipulator(Err(error)) => {
                self.manipulator.set_progress(false);
                display.show_error("Server Error", &error.user_message);
            }
            Reply::LocatorReport { result: Ok(()), .. } => {}
            Reply::LocatorReport {
                quiet: true,
                result: Err(error),
            } => {
                log::debug!("ignoring quiet locator clear failure: {error}");
            }
            Reply::LocatorReport {
                quiet: false,
                result: Err(error),
            } => {
                display.show_error("Server Error", &error.user_message);
            }
            Reply::SaveContext(Ok(context)) => {
                display.set_progress(false);
                self.pending_export = Some(ExportRequest::Image { context });
            }
            Reply::SaveContext(Err(error)) => {
                display.set_progress(false);
                display.show_error("Error", &error.user_message);
            }
            Reply::SaveStem {
                directory,
                result: Ok(stem),
            } => {
                display.set_progress(false);
                self.pending_export = Some(ExportRequest::Pdf { directory, stem });
            }
            Reply::SaveStem {
                result: Err(error), ..
            } => {
                display.set_progress(false);
                display.show_error("Error", &error.user_message);
            }
        }
    }
}
