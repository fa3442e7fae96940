//! egui implementation of [`PlotsDisplay`]: the central plot image, the
//! locator overlay, the zoom window, and the dialog slots the presenter
//! writes into.
//!
//! Image bytes are fetched through the facade on a background callback and
//! land on an mpsc channel drained during rendering, so the view never
//! blocks the UI thread on the transport.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use eframe::egui;

use crate::model::plots::{PlotSize, Point};
use crate::presenter::{ConfirmRequest, PlotsDisplay};
use crate::server::{PlotServer, ServerResult};
use crate::ui::image_loader::decode_plot_image;
use crate::ui::locator_ui::{self, LocatorGesture};

/// Interaction gestures raised by the central plot surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotGesture {
    LocatorPicked(Point),
    LocatorCancelled,
    /// A plain click while the manipulator is shown.
    ManipulatorClicked { x: f64, y: f64 },
}

struct FetchResult {
    url: String,
    result: ServerResult<Vec<u8>>,
}

struct PlotTexture {
    url: String,
    handle: egui::TextureHandle,
}

/// A zoom window opened by the presenter.
struct ZoomWindow {
    url: String,
    size: PlotSize,
    texture: Option<PlotTexture>,
    open: bool,
}

pub struct PlotView {
    server: Arc<dyn PlotServer>,

    plot_url: Option<String>,
    empty: bool,
    progress: bool,
    bring_to_front: bool,

    error: Option<(String, String)>,
    confirm: Option<ConfirmRequest>,
    zoom: Option<ZoomWindow>,

    frame_size: PlotSize,
    client_size: PlotSize,

    texture: Option<PlotTexture>,
    fetching: Option<String>,
    fetch_tx: Sender<FetchResult>,
    fetch_rx: Receiver<FetchResult>,
}

impl PlotView {
    pub fn new(server: Arc<dyn PlotServer>) -> Self {
        let (fetch_tx, fetch_rx) = std::sync::mpsc::channel();
        Self {
            server,
            plot_url: None,
            empty: true,
            progress: false,
            bring_to_front: false,
            error: None,
            confirm: None,
            zoom: None,
            frame_size: PlotSize::new(0, 0),
            client_size: PlotSize::new(0, 0),
            texture: None,
            fetching: None,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Consume the focus request raised by `bring_to_front`. The embedding
    /// shell decides what focusing the pane means.
    pub fn take_bring_to_front(&mut self) -> bool {
        std::mem::take(&mut self.bring_to_front)
    }

    /// Pending error dialog slot, rendered by [`crate::ui::dialogs`].
    pub fn error_slot(&mut self) -> &mut Option<(String, String)> {
        &mut self.error
    }

    /// Pending confirmation dialog slot.
    pub fn confirm_slot(&mut self) -> &mut Option<ConfirmRequest> {
        &mut self.confirm
    }

    fn request_fetch(&mut self, ctx: &egui::Context, url: &str) {
        if self.fetching.as_deref() == Some(url) {
            return;
        }
        if self.texture.as_ref().map(|t| t.url.as_str()) == Some(url) {
            return;
        }
        self.fetching = Some(url.to_string());
        let tx = self.fetch_tx.clone();
        let ctx = ctx.clone();
        let owned = url.to_string();
        self.server.fetch_plot(
            url,
            Box::new(move |result| {
                let _ = tx.send(FetchResult { url: owned, result });
                ctx.request_repaint();
            }),
        );
    }

    fn drain_fetches(&mut self, ctx: &egui::Context) {
        while let Ok(FetchResult { url, result }) = self.fetch_rx.try_recv() {
            if self.fetching.as_deref() == Some(url.as_str()) {
                self.fetching = None;
            }
            // ignore results superseded by a newer plot
            let current = self.plot_url.as_deref() == Some(url.as_str());
            let for_zoom = self
                .zoom
                .as_ref()
                .is_some_and(|z| z.open && z.url == url);
            if !current && !for_zoom {
                continue;
            }
            match result {
                Ok(bytes) => {
                    let Some(color_image) = decode_plot_image(&bytes) else {
                        log::warn!("could not decode plot image from {url}");
                        continue;
                    };
                    let handle =
                        ctx.load_texture(url.clone(), color_image, egui::TextureOptions::LINEAR);
                    let texture = PlotTexture {
                        url: url.clone(),
                        handle,
                    };
                    if for_zoom {
                        if let Some(zoom) = &mut self.zoom {
                            zoom.texture = Some(texture);
                        }
                    } else {
                        self.texture = Some(texture);
                    }
                }
                Err(error) => {
                    log::warn!("failed to fetch plot {url}: {error}");
                }
            }
        }
    }

    /// Render the central plot surface. Returns a gesture when the user
    /// interacted with an active locator or manipulator surface.
    pub fn render_plot(
        &mut self,
        ui: &mut egui::Ui,
        locator_surface: Option<PlotSize>,
        manipulator_shown: bool,
    ) -> Option<PlotGesture> {
        let ctx = ui.ctx().clone();
        self.drain_fetches(&ctx);

        let available = ui.available_rect_before_wrap();
        self.frame_size = PlotSize::new(available.width() as i32, available.height() as i32);
        let screen = ctx.screen_rect();
        self.client_size = PlotSize::new(screen.width() as i32, screen.height() as i32);

        if self.empty {
            ui.centered_and_justified(|ui| {
                ui.weak("No plots to display");
            });
            return None;
        }

        if let Some(url) = self.plot_url.clone() {
            self.request_fetch(&ctx, &url);
        }

        let mut gesture = None;

        if let Some(texture) = &self.texture {
            let tex_size = texture.handle.size_vec2();
            let scale = (available.width() / tex_size.x)
                .min(available.height() / tex_size.y)
                .min(1.0);
            let image_size = tex_size * scale;
            let image_rect =
                egui::Rect::from_center_size(available.center(), image_size);

            egui::Image::new(&texture.handle).paint_at(ui, image_rect);

            if let Some(surface_size) = locator_surface {
                match locator_ui::locator_overlay(ui, image_rect, surface_size) {
                    Some(LocatorGesture::Picked(point)) => {
                        gesture = Some(PlotGesture::LocatorPicked(point));
                    }
                    Some(LocatorGesture::Cancelled) => {
                        gesture = Some(PlotGesture::LocatorCancelled);
                    }
                    None => {}
                }
            } else if manipulator_shown {
                let response = ui.interact(
                    image_rect,
                    ui.id().with("manipulator_surface"),
                    egui::Sense::click(),
                );
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        gesture = Some(PlotGesture::ManipulatorClicked {
                            x: (pos.x - image_rect.left()) as f64 / scale as f64,
                            y: (pos.y - image_rect.top()) as f64 / scale as f64,
                        });
                    }
                }
            }
        } else {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Spinner::new());
            });
        }

        if self.progress {
            let painter = ui.painter_at(available);
            painter.rect_filled(
                available,
                0.0,
                ui.visuals().extreme_bg_color.gamma_multiply(0.4),
            );
            egui::Area::new(ui.id().with("plot_progress"))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(&ctx, |ui| {
                    ui.add(egui::Spinner::new());
                });
        }

        gesture
    }

    /// Render the zoom window as its own viewport while it stays open.
    pub fn render_zoom_window(&mut self, ctx: &egui::Context) {
        let Some(zoom) = self.zoom.as_ref() else {
            return;
        };
        if !zoom.open {
            self.zoom = None;
            return;
        }

        let url = zoom.url.clone();
        let size = zoom.size;
        let texture_id = zoom.texture.as_ref().map(|t| t.handle.id());
        let needs_fetch =
            zoom.texture.is_none() && self.fetching.as_deref() != Some(url.as_str());

        if needs_fetch {
            self.fetching = Some(url.clone());
            let tx = self.fetch_tx.clone();
            let repaint = ctx.clone();
            let cb_url = url.clone();
            self.server.fetch_plot(
                &url,
                Box::new(move |result| {
                    let _ = tx.send(FetchResult {
                        url: cb_url,
                        result,
                    });
                    repaint.request_repaint();
                }),
            );
        }

        let viewport_id = egui::ViewportId::from_hash_of("plotpane_zoom");
        let builder = egui::ViewportBuilder::default()
            .with_title("Plot Zoom")
            .with_inner_size([size.width as f32, size.height as f32]);

        let mut keep_open = true;
        ctx.show_viewport_immediate(viewport_id, builder, |ctx, _class| {
            egui::CentralPanel::default().show(ctx, |ui| match texture_id {
                Some(id) => {
                    let rect = ui.available_rect_before_wrap();
                    ui.painter().image(
                        id,
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Spinner::new());
                    });
                }
            });
            if ctx.input(|i| i.viewport().close_requested()) {
                keep_open = false;
            }
        });

        if let Some(zoom) = &mut self.zoom {
            zoom.open = keep_open;
        }
    }
}

impl PlotsDisplay for PlotView {
    fn show_empty_plot(&mut self) {
        self.empty = true;
        self.plot_url = None;
        self.texture = None;
        self.fetching = None;
    }

    fn show_plot(&mut self, url: &str) {
        self.empty = false;
        self.plot_url = Some(url.to_string());
    }

    fn plot_url(&self) -> Option<String> {
        self.plot_url.clone()
    }

    fn plot_frame_size(&self) -> PlotSize {
        self.frame_size
    }

    fn client_size(&self) -> PlotSize {
        self.client_size
    }

    fn bring_to_front(&mut self) {
        self.bring_to_front = true;
    }

    fn set_progress(&mut self, busy: bool) {
        self.progress = busy;
    }

    fn show_error(&mut self, caption: &str, message: &str) {
        self.error = Some((caption.to_string(), message.to_string()));
    }

    fn confirm(&mut self, request: ConfirmRequest) {
        self.confirm = Some(request);
    }

    fn open_zoom_window(&mut self, url: &str, size: PlotSize) {
        self.zoom = Some(ZoomWindow {
            url: url.to_string(),
            size,
            texture: None,
            open: true,
        });
    }
}
