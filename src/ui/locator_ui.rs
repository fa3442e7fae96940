//! Point-picking overlay rendered over the plot image while a locator
//! session is active.

use eframe::egui;

use crate::model::plots::{PlotSize, Point};

/// Outcome of one frame of locator interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocatorGesture {
    /// The user clicked a point, in plot pixel coordinates.
    Picked(Point),
    /// The user cancelled the pick (Escape or secondary click).
    Cancelled,
}

/// Draw crosshair feedback over `image_rect` and translate interaction into
/// a gesture. `surface_size` is the plot's pixel size as reported by the
/// session, which may differ from the on-screen rect.
pub fn locator_overlay(
    ui: &mut egui::Ui,
    image_rect: egui::Rect,
    surface_size: PlotSize,
) -> Option<LocatorGesture> {
    let response = ui.interact(
        image_rect,
        ui.id().with("locator_surface"),
        egui::Sense::click(),
    );

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) || response.secondary_clicked() {
        return Some(LocatorGesture::Cancelled);
    }

    if let Some(pointer) = response.hover_pos() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        let painter = ui.painter_at(image_rect);
        let stroke = egui::Stroke::new(1.0, ui.visuals().strong_text_color());
        painter.line_segment(
            [
                egui::pos2(image_rect.left(), pointer.y),
                egui::pos2(image_rect.right(), pointer.y),
            ],
            stroke,
        );
        painter.line_segment(
            [
                egui::pos2(pointer.x, image_rect.top()),
                egui::pos2(pointer.x, image_rect.bottom()),
            ],
            stroke,
        );
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            return Some(LocatorGesture::Picked(to_plot_coords(
                pos,
                image_rect,
                surface_size,
            )));
        }
    }

    None
}

/// Map a screen position inside `image_rect` to plot pixel coordinates.
fn to_plot_coords(pos: egui::Pos2, image_rect: egui::Rect, surface_size: PlotSize) -> Point {
    let rel_x = ((pos.x - image_rect.left()) / image_rect.width()).clamp(0.0, 1.0);
    let rel_y = ((pos.y - image_rect.top()) / image_rect.height()).clamp(0.0, 1.0);
    Point::new(
        (rel_x * surface_size.width as f32) as f64,
        (rel_y * surface_size.height as f32) as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_positions_scale_to_plot_pixels() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(200.0, 150.0));
        let size = PlotSize::new(400, 300);

        let p = to_plot_coords(egui::pos2(100.0, 50.0), rect, size);
        assert_eq!((p.x, p.y), (0.0, 0.0));

        let p = to_plot_coords(egui::pos2(300.0, 200.0), rect, size);
        assert_eq!((p.x, p.y), (400.0, 300.0));

        let p = to_plot_coords(egui::pos2(200.0, 125.0), rect, size);
        assert_eq!((p.x, p.y), (200.0, 150.0));
    }

    #[test]
    fn positions_outside_the_rect_clamp_to_the_edge() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let size = PlotSize::new(400, 300);

        let p = to_plot_coords(egui::pos2(-10.0, 150.0), rect, size);
        assert_eq!((p.x, p.y), (0.0, 300.0));
    }
}
