//! Export options and file-writing helpers for saving plots.
//!
//! The session re-renders the plot at the requested size and hands back
//! encoded bytes; raster formats other than PNG are transcoded locally with
//! the `image` crate, SVG and PDF bytes are written through unchanged.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::plots::PlotSize;

/// Image formats offered by the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Svg,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Png,
            ExportFormat::Jpeg,
            ExportFormat::Bmp,
            ExportFormat::Tiff,
            ExportFormat::Svg,
        ]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Bmp => "bmp",
            ExportFormat::Tiff => "tiff",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Bmp => "BMP",
            ExportFormat::Tiff => "TIFF",
            ExportFormat::Svg => "SVG",
        }
    }

    /// Raster formats are transcoded client-side; vector bytes pass through.
    pub fn is_raster(&self) -> bool {
        !matches!(self, ExportFormat::Svg)
    }

    fn image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ExportFormat::Png => Some(image::ImageFormat::Png),
            ExportFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ExportFormat::Bmp => Some(image::ImageFormat::Bmp),
            ExportFormat::Tiff => Some(image::ImageFormat::Tiff),
            ExportFormat::Svg => None,
        }
    }
}

/// Options for saving a plot as an image. Persisted in user preferences and
/// rewritten only when an export leaves them changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlotOptions {
    pub format: ExportFormat,
    pub width: i32,
    pub height: i32,
    /// Keep width/height locked to the plot's aspect ratio while editing.
    pub keep_ratio: bool,
    pub view_after_save: bool,
}

impl Default for ExportPlotOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            width: 640,
            height: 480,
            keep_ratio: false,
            view_after_save: false,
        }
    }
}

impl ExportPlotOptions {
    pub fn size(&self) -> PlotSize {
        PlotSize::new(self.width, self.height)
    }
}

/// Options for saving a plot as a PDF (rendered session-side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePlotAsPdfOptions {
    pub width_inches: f64,
    pub height_inches: f64,
    pub portrait: bool,
    pub view_after_save: bool,
}

impl Default for SavePlotAsPdfOptions {
    fn default() -> Self {
        Self {
            width_inches: 8.0,
            height_inches: 6.0,
            portrait: false,
            view_after_save: false,
        }
    }
}

/// Export context resolved by the session before an image save: where to
/// save, a unique file stem within that directory, and the formats the
/// rendering engine supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePlotContext {
    pub directory: PathBuf,
    pub stem: String,
    pub formats: Vec<ExportFormat>,
}

/// Fallback stem when the session does not provide one.
pub fn dated_stem(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Local::now().format("%Y-%m-%d"))
}

/// Graphics path for a re-render at export size.
pub fn export_url_path(format: ExportFormat, size: PlotSize) -> String {
    format!(
        "plot?width={}&height={}&format={}",
        size.width,
        size.height,
        format.extension()
    )
}

/// Graphics path for a session-side PDF render.
pub fn pdf_url_path(options: &SavePlotAsPdfOptions) -> String {
    format!(
        "plot_pdf?width={}&height={}&portrait={}",
        options.width_inches, options.height_inches, options.portrait
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to decode plot image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

/// Write fetched plot bytes to `path`, transcoding raster formats. The
/// session always renders rasters as PNG; anything else is re-encoded here.
pub fn write_plot_file(path: &Path, format: ExportFormat, bytes: &[u8]) -> Result<(), ExportError> {
    match format.image_format() {
        Some(target) => {
            let img = image::load_from_memory(bytes)?;
            // JPEG has no alpha channel
            let img = if target == image::ImageFormat::Jpeg {
                image::DynamicImage::ImageRgb8(img.to_rgb8())
            } else {
                img
            };
            img.save_with_format(path, target)
                .map_err(ExportError::from)
        }
        None => std::fs::write(path, bytes).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write session-rendered PDF bytes to `path`.
pub fn write_pdf_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
