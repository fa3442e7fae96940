//! eframe application wiring the presenter, view, coordinators, and session
//! event subscriptions into a runnable plot pane.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui_phosphor::regular::STOP;

use crate::config::{FeatureFlags, PlotPaneConfig};
use crate::console::InterruptButton;
use crate::events::{EventBus, EventFilter, EventKind, SessionEvent};
use crate::prefs::{UiPrefsStore, DEFAULT_PREFS_PATH};
use crate::presenter::PlotsPresenter;
use crate::server::PlotServer;
use crate::ui::export_ui::ExportDialogs;
use crate::ui::plot_view::{PlotGesture, PlotView};
use crate::ui::toolbar::{self, ToolbarAction};
use crate::ui::{dialogs, manipulator_ui};

pub struct PlotPane {
    presenter: PlotsPresenter,
    view: PlotView,
    interrupt: InterruptButton,
    interrupt_events: Receiver<SessionEvent>,
    export: ExportDialogs,
    prefs: UiPrefsStore,
    features: FeatureFlags,
    on_interrupt: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl PlotPane {
    pub fn new(server: Arc<dyn PlotServer>, bus: &EventBus, config: &PlotPaneConfig) -> Self {
        let prefs_path = config
            .prefs_path
            .clone()
            .unwrap_or_else(|| DEFAULT_PREFS_PATH.clone());
        Self {
            presenter: PlotsPresenter::new(server.clone(), bus, config),
            view: PlotView::new(server.clone()),
            interrupt: InterruptButton::new(),
            interrupt_events: bus.subscribe(EventFilter::only(
                EventKind::BUSY | EventKind::CONSOLE_PROMPT,
            )),
            export: ExportDialogs::new(server),
            prefs: UiPrefsStore::load(prefs_path),
            features: config.features.clone(),
            on_interrupt: config.on_interrupt.clone(),
        }
    }

    fn dispatch(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::PreviousPlot => self.presenter.previous_plot(&mut self.view),
            ToolbarAction::NextPlot => self.presenter.next_plot(&mut self.view),
            ToolbarAction::ZoomPlot => self.presenter.zoom_plot(&mut self.view),
            ToolbarAction::SaveAsImage => self.presenter.save_plot_as_image(&mut self.view),
            ToolbarAction::SaveAsPdf => self.presenter.save_plot_as_pdf(&mut self.view),
            ToolbarAction::CopyToClipboard => {
                self.presenter.copy_plot_to_clipboard(&mut self.view)
            }
            ToolbarAction::RemovePlot => self.presenter.remove_plot(&mut self.view),
            ToolbarAction::ClearPlots => self.presenter.clear_plots(&mut self.view),
            ToolbarAction::RefreshPlot => self.presenter.refresh_plot(&mut self.view),
            ToolbarAction::ShowManipulator => self.presenter.show_manipulator(),
        }
    }

    fn drain_interrupt_events(&mut self, now: Instant) {
        while let Ok(event) = self.interrupt_events.try_recv() {
            if event.kinds.contains(EventKind::BUSY) {
                if let Some(busy) = event.busy {
                    self.interrupt.on_busy(busy, now);
                }
            } else if event.kinds.contains(EventKind::CONSOLE_PROMPT) {
                self.interrupt.on_console_prompt();
            }
        }
    }

    fn render_interrupt_button(&mut self, ui: &mut egui::Ui, now: Instant) {
        if !self.features.interrupt || !self.interrupt.is_visible(now) {
            return;
        }
        let opacity = self.interrupt.opacity(now);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.scope(|ui| {
                ui.set_opacity(opacity);
                let clicked = ui
                    .add_enabled(self.interrupt.is_enabled(), egui::Button::new(STOP))
                    .on_hover_text("Interrupt the session")
                    .clicked();
                if clicked {
                    if let Some(on_interrupt) = &self.on_interrupt {
                        on_interrupt();
                    }
                }
            });
        });
    }
}

impl eframe::App for PlotPane {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.drain_interrupt_events(now);
        self.interrupt.tick(now);

        self.presenter.poll(&mut self.view);

        if let Some(request) = self.presenter.take_export_request() {
            self.export.open(request, &self.prefs);
        }

        egui::TopBottomPanel::top("plot_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let manipulator_available =
                    self.presenter.manipulator().manipulator().is_some();
                if let Some(action) =
                    toolbar::render_toolbar(ui, &self.features, manipulator_available)
                {
                    self.dispatch(action);
                }
                self.render_interrupt_button(ui, now);
            });
        });

        if self.presenter.manipulator().is_visible() {
            egui::SidePanel::right("manipulator_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.strong("Manipulate");
                    ui.separator();
                    if manipulator_ui::render_controls(ui, self.presenter.manipulator_mut()) {
                        self.presenter.manipulator_mut().values_changed();
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let locator_surface = self.presenter.locator().surface().map(|s| s.size);
            let manipulator_shown = self.presenter.manipulator().is_visible();
            match self.view.render_plot(ui, locator_surface, manipulator_shown) {
                Some(PlotGesture::LocatorPicked(point)) => {
                    self.presenter.locator_point_selected(point);
                }
                Some(PlotGesture::LocatorCancelled) => {
                    self.presenter.locator_cancelled();
                }
                Some(PlotGesture::ManipulatorClicked { x, y }) => {
                    self.presenter.manipulator_mut().plot_clicked(x, y);
                }
                None => {}
            }
        });

        dialogs::error_dialog(ctx, self.view.error_slot());
        if let Some((gesture, confirmed)) = dialogs::confirm_dialog(ctx, self.view.confirm_slot())
        {
            self.presenter
                .confirm_resolved(&mut self.view, gesture, confirmed);
        }

        self.export.render(ctx, &mut self.prefs);
        self.view.render_zoom_window(ctx);

        if self.view.take_bring_to_front() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }

        // keep draining the event/reply channels while idle
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Launch the plot pane in a native window. Blocks until the window closes.
pub fn run_plot_pane(
    server: Arc<dyn PlotServer>,
    bus: &EventBus,
    mut config: PlotPaneConfig,
) -> eframe::Result<()> {
    let app = PlotPane::new(server, bus, &config);

    let title = config.title.clone();
    let mut opts = config
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1000.0, 700.0));
    }

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
