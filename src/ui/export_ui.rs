//! Export dialogs: save as image, save as PDF, copy to clipboard.
//!
//! Each dialog is seeded from the persisted options and, when the export
//! completes, writes the (possibly edited) options back through the
//! equality-checked preference store, so an export that leaves the options
//! untouched causes no preference write.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use eframe::egui;

use crate::export::{
    self, ExportFormat, ExportPlotOptions, SavePlotAsPdfOptions, SavePlotContext,
};
use crate::prefs::UiPrefsStore;
use crate::presenter::ExportRequest;
use crate::server::{PlotServer, ServerResult};
use crate::ui::image_loader::decode_plot_image;

struct ImageDialog {
    context: SavePlotContext,
    options: ExportPlotOptions,
    stem: String,
    directory: PathBuf,
    /// Aspect ratio captured at open time, used by the keep-ratio link.
    aspect: f64,
}

struct PdfDialog {
    options: SavePlotAsPdfOptions,
    stem: String,
    directory: PathBuf,
}

/// What to do with fetched bytes once they arrive.
enum Job {
    SaveImage {
        path: PathBuf,
        format: ExportFormat,
        options: ExportPlotOptions,
    },
    SavePdf {
        path: PathBuf,
        options: SavePlotAsPdfOptions,
    },
    Clipboard,
}

struct JobResult {
    job: Job,
    result: ServerResult<Vec<u8>>,
}

pub struct ExportDialogs {
    server: Arc<dyn PlotServer>,
    image: Option<ImageDialog>,
    pdf: Option<PdfDialog>,
    job_tx: Sender<JobResult>,
    job_rx: Receiver<JobResult>,
}

impl ExportDialogs {
    pub fn new(server: Arc<dyn PlotServer>) -> Self {
        let (job_tx, job_rx) = std::sync::mpsc::channel();
        Self {
            server,
            image: None,
            pdf: None,
            job_tx,
            job_rx,
        }
    }

    /// Open the workflow for an export the presenter prepared.
    pub fn open(&mut self, request: ExportRequest, prefs: &UiPrefsStore) {
        match request {
            ExportRequest::Image { context } => {
                let options = prefs.prefs().export_plot_options.clone();
                let aspect = if options.height > 0 {
                    options.width as f64 / options.height as f64
                } else {
                    1.0
                };
                self.image = Some(ImageDialog {
                    stem: if context.stem.is_empty() {
                        export::dated_stem("plot")
                    } else {
                        context.stem.clone()
                    },
                    directory: context.directory.clone(),
                    context,
                    options,
                    aspect,
                });
            }
            ExportRequest::Pdf { directory, stem } => {
                self.pdf = Some(PdfDialog {
                    options: prefs.prefs().save_plot_as_pdf_options.clone(),
                    stem,
                    directory,
                });
            }
            ExportRequest::Clipboard => {
                let options = &prefs.prefs().export_plot_options;
                let url = self
                    .server
                    .graphics_url(&export::export_url_path(ExportFormat::Png, options.size()));
                self.fetch(url, Job::Clipboard);
            }
        }
    }

    pub fn render(&mut self, ctx: &egui::Context, prefs: &mut UiPrefsStore) {
        self.finish_jobs(ctx, prefs);
        self.render_image_dialog(ctx);
        self.render_pdf_dialog(ctx);
    }

    fn fetch(&self, url: String, job: Job) {
        let tx = self.job_tx.clone();
        self.server.fetch_plot(
            &url,
            Box::new(move |result| {
                let _ = tx.send(JobResult { job, result });
            }),
        );
    }

    fn finish_jobs(&mut self, ctx: &egui::Context, prefs: &mut UiPrefsStore) {
        while let Ok(JobResult { job, result }) = self.job_rx.try_recv() {
            let bytes = match result {
                Ok(bytes) => bytes,
                Err(error) => {
                    log::warn!("plot export fetch failed: {error}");
                    continue;
                }
            };
            match job {
                Job::SaveImage {
                    path,
                    format,
                    options,
                } => {
                    match export::write_plot_file(&path, format, &bytes) {
                        Ok(()) => {
                            if options.view_after_save {
                                log::info!("saved plot to {}", path.display());
                            }
                        }
                        Err(error) => log::warn!("{error}"),
                    }
                    if let Err(error) = prefs.update_export_plot_options(options) {
                        log::warn!("failed to persist export options: {error}");
                    }
                }
                Job::SavePdf { path, options } => {
                    if let Err(error) = export::write_pdf_file(&path, &bytes) {
                        log::warn!("{error}");
                    }
                    if let Err(error) = prefs.update_save_plot_as_pdf_options(options) {
                        log::warn!("failed to persist PDF options: {error}");
                    }
                }
                Job::Clipboard => match decode_plot_image(&bytes) {
                    Some(image) => ctx.copy_image(image),
                    None => log::warn!("could not decode plot image for the clipboard"),
                },
            }
        }
    }

    fn render_image_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.image else {
            return;
        };

        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Save Plot as Image")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::ComboBox::from_label("Format")
                    .selected_text(dialog.options.format.label())
                    .show_ui(ui, |ui| {
                        for format in &dialog.context.formats {
                            ui.selectable_value(
                                &mut dialog.options.format,
                                *format,
                                format.label(),
                            );
                        }
                    });

                ui.horizontal(|ui| {
                    ui.label("Width:");
                    let width = ui.add(
                        egui::DragValue::new(&mut dialog.options.width).range(100..=4000),
                    );
                    ui.label("Height:");
                    let height = ui.add(
                        egui::DragValue::new(&mut dialog.options.height).range(100..=4000),
                    );
                    if dialog.options.keep_ratio {
                        if width.changed() {
                            dialog.options.height =
                                (dialog.options.width as f64 / dialog.aspect) as i32;
                        } else if height.changed() {
                            dialog.options.width =
                                (dialog.options.height as f64 * dialog.aspect) as i32;
                        }
                    }
                    ui.checkbox(&mut dialog.options.keep_ratio, "Maintain aspect ratio");
                });

                ui.horizontal(|ui| {
                    ui.label("File name:");
                    ui.text_edit_singleline(&mut dialog.stem);
                });

                ui.horizontal(|ui| {
                    ui.label("Directory:");
                    ui.monospace(dialog.directory.display().to_string());
                    if ui.button("Browse…").clicked() {
                        if let Some(dir) = rfd::FileDialog::new()
                            .set_directory(&dialog.directory)
                            .pick_folder()
                        {
                            dialog.directory = dir;
                        }
                    }
                });

                ui.checkbox(&mut dialog.options.view_after_save, "View plot after saving");

                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                });
            });

        if save {
            let Some(dialog) = self.image.take() else {
                return;
            };
            let path = dialog
                .directory
                .join(&dialog.stem)
                .with_extension(dialog.options.format.extension());
            let url = self.server.graphics_url(&export::export_url_path(
                dialog.options.format,
                dialog.options.size(),
            ));
            self.fetch(
                url,
                Job::SaveImage {
                    path,
                    format: dialog.options.format,
                    options: dialog.options,
                },
            );
        } else if cancel {
            self.image = None;
        }
    }

    fn render_pdf_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.pdf else {
            return;
        };

        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Save Plot as PDF")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Width (inches):");
                    ui.add(
                        egui::DragValue::new(&mut dialog.options.width_inches)
                            .range(1.0..=48.0)
                            .speed(0.25),
                    );
                    ui.label("Height (inches):");
                    ui.add(
                        egui::DragValue::new(&mut dialog.options.height_inches)
                            .range(1.0..=48.0)
                            .speed(0.25),
                    );
                });
                ui.checkbox(&mut dialog.options.portrait, "Portrait orientation");

                ui.horizontal(|ui| {
                    ui.label("File name:");
                    ui.text_edit_singleline(&mut dialog.stem);
                });

                ui.horizontal(|ui| {
                    ui.label("Directory:");
                    ui.monospace(dialog.directory.display().to_string());
                    if ui.button("Browse…").clicked() {
                        if let Some(dir) = rfd::FileDialog::new()
                            .set_directory(&dialog.directory)
                            .pick_folder()
                        {
                            dialog.directory = dir;
                        }
                    }
                });

                ui.checkbox(&mut dialog.options.view_after_save, "View plot after saving");

                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                });
            });

        if save {
            let Some(dialog) = self.pdf.take() else {
                return;
            };
            let path = dialog
                .directory
                .join(&dialog.stem)
                .with_extension("pdf");
            let url = self
                .server
                .graphics_url(&export::pdf_url_path(&dialog.options));
            self.fetch(
                url,
                Job::SavePdf {
                    path,
                    options: dialog.options,
                },
            );
        } else if cancel {
            self.pdf = None;
        }
    }
}
