//! Zoom-window sizing: pick the largest window that preserves the plot's
//! aspect ratio, fits the client area, and stays within fixed bounds.

use crate::model::plots::PlotSize;

/// Padding subtracted from each client axis before fitting.
pub const WINDOW_PADDING: i32 = 20;

pub const MIN_WIDTH: i32 = 300;
pub const MAX_WIDTH: i32 = 1200;
pub const MIN_HEIGHT: i32 = 300;
pub const MAX_HEIGHT: i32 = 900;

/// Compute the zoom window size for a plot of `plot` pixels inside a client
/// area of `client` pixels.
///
/// The plot is scaled by the smaller of the two axis ratios against the
/// padded client bounds, so the aspect ratio is preserved, then each axis is
/// clamped to its fixed range.
pub fn zoom_window_size(plot: PlotSize, client: PlotSize) -> PlotSize {
    if plot.width <= 0 || plot.height <= 0 {
        return PlotSize::new(MIN_WIDTH, MIN_HEIGHT);
    }

    let bounds = PlotSize::new(client.width - WINDOW_PADDING, client.height - WINDOW_PADDING);

    let width_ratio = bounds.width as f32 / plot.width as f32;
    let height_ratio = bounds.height as f32 / plot.height as f32;
    let ratio = width_ratio.min(height_ratio);

    let width = ((ratio * plot.width as f32) as i32).clamp(MIN_WIDTH, MAX_WIDTH);
    let height = ((ratio * plot.height as f32) as i32).clamp(MIN_HEIGHT, MAX_HEIGHT);

    PlotSize::new(width, height)
}

/// Graphics path for a re-render at the zoomed size.
pub fn zoom_url_path(size: PlotSize) -> String {
    format!("plot_zoom?width={}&height={}", size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_aspect_ratio_within_bounds() {
        // bounds (980, 780); ratio = min(980/1600, 780/1200) = 0.6125
        let size = zoom_window_size(PlotSize::new(1600, 1200), PlotSize::new(1000, 800));
        assert_eq!(size, PlotSize::new(980, 735));
    }

    #[test]
    fn upscales_small_plots_to_fill_bounds() {
        // ratio = min(980/800, 780/600) = 1.225
        let size = zoom_window_size(PlotSize::new(800, 600), PlotSize::new(1000, 800));
        assert_eq!(size, PlotSize::new(980, 735));
    }

    #[test]
    fn clamps_to_fixed_ranges() {
        // Huge client: width would exceed 1200, height would exceed 900
        let size = zoom_window_size(PlotSize::new(800, 600), PlotSize::new(4000, 4000));
        assert_eq!(size.width, MAX_WIDTH);
        assert_eq!(size.height, MAX_HEIGHT);

        // Tiny client: both axes clamp up to the minimum
        let size = zoom_window_size(PlotSize::new(800, 600), PlotSize::new(200, 200));
        assert_eq!(size.width, MIN_WIDTH);
        assert_eq!(size.height, MIN_HEIGHT);
    }

    #[test]
    fn degenerate_plot_size_falls_back_to_minimum() {
        let size = zoom_window_size(PlotSize::new(0, 0), PlotSize::new(1000, 800));
        assert_eq!(size, PlotSize::new(MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn zoom_url_carries_dimensions() {
        assert_eq!(
            zoom_url_path(PlotSize::new(980, 735)),
            "plot_zoom?width=980&height=735"
        );
    }
}
