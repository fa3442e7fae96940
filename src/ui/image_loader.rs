//! Decode fetched plot bytes into an [`egui::ColorImage`].
//!
//! Rasters (PNG/JPEG/…) decode through the `image` crate. SVG output from
//! vector-capable rendering engines is rasterized with usvg/resvg when the
//! `svg` feature is enabled.

/// Decode encoded plot bytes. Returns `None` when the bytes are neither a
/// supported raster nor (with the `svg` feature) an SVG document.
pub fn decode_plot_image(bytes: &[u8]) -> Option<egui::ColorImage> {
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }
    let img = image::load_from_memory(bytes).ok()?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| &bytes[start..])
        .unwrap_or_default();
    head.starts_with(b"<svg") || head.starts_with(b"<?xml")
}

#[cfg(feature = "svg")]
fn decode_svg(bytes: &[u8]) -> Option<egui::ColorImage> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opt).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    let mut canvas = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::default(), &mut canvas);
    let rgba = pixmap.take();
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [size.width() as usize, size.height() as usize],
        &rgba,
    ))
}

#[cfg(not(feature = "svg"))]
fn decode_svg(_bytes: &[u8]) -> Option<egui::ColorImage> {
    log::warn!("received an SVG plot but the svg feature is disabled");
    None
}
