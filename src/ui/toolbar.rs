//! Plot pane toolbar: navigation, zoom, export, destructive gestures.

use eframe::egui;
use egui_phosphor::regular::{
    ARROW_CLOCKWISE, BROOM, CARET_LEFT, CARET_RIGHT, CLIPBOARD_TEXT, EXPORT, FILE_PDF, IMAGE,
    MAGNIFYING_GLASS_PLUS, SLIDERS_HORIZONTAL, TRASH,
};

use crate::config::FeatureFlags;

/// A gesture initiated from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    PreviousPlot,
    NextPlot,
    ZoomPlot,
    SaveAsImage,
    SaveAsPdf,
    CopyToClipboard,
    RemovePlot,
    ClearPlots,
    RefreshPlot,
    ShowManipulator,
}

/// Render the toolbar row; returns the action triggered this frame, if any.
pub fn render_toolbar(
    ui: &mut egui::Ui,
    features: &FeatureFlags,
    manipulator_available: bool,
) -> Option<ToolbarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if features.navigation {
            if ui
                .button(CARET_LEFT)
                .on_hover_text("Previous plot")
                .clicked()
            {
                action = Some(ToolbarAction::PreviousPlot);
            }
            if ui.button(CARET_RIGHT).on_hover_text("Next plot").clicked() {
                action = Some(ToolbarAction::NextPlot);
            }
            ui.separator();
        }

        if features.zoom {
            if ui
                .button(format!("{MAGNIFYING_GLASS_PLUS} Zoom"))
                .on_hover_text("Open the plot in a zoom window")
                .clicked()
            {
                action = Some(ToolbarAction::ZoomPlot);
            }
        }

        if features.export {
            ui.menu_button(format!("{EXPORT} Export"), |ui| {
                if ui.button(format!("{IMAGE} Save as Image…")).clicked() {
                    action = Some(ToolbarAction::SaveAsImage);
                    ui.close();
                }
                if ui.button(format!("{FILE_PDF} Save as PDF…")).clicked() {
                    action = Some(ToolbarAction::SaveAsPdf);
                    ui.close();
                }
                if ui
                    .button(format!("{CLIPBOARD_TEXT} Copy to Clipboard"))
                    .clicked()
                {
                    action = Some(ToolbarAction::CopyToClipboard);
                    ui.close();
                }
            });
        }

        if features.remove {
            if ui
                .button(TRASH)
                .on_hover_text("Remove the current plot")
                .clicked()
            {
                action = Some(ToolbarAction::RemovePlot);
            }
        }
        if features.clear {
            if ui
                .button(BROOM)
                .on_hover_text("Clear all plots")
                .clicked()
            {
                action = Some(ToolbarAction::ClearPlots);
            }
        }

        if features.refresh {
            if ui
                .button(ARROW_CLOCKWISE)
                .on_hover_text("Refresh the current plot")
                .clicked()
            {
                action = Some(ToolbarAction::RefreshPlot);
            }
        }

        if features.manipulator {
            ui.add_enabled_ui(manipulator_available, |ui| {
                if ui
                    .button(SLIDERS_HORIZONTAL)
                    .on_hover_text("Show the manipulator")
                    .clicked()
                {
                    action = Some(ToolbarAction::ShowManipulator);
                }
            });
        }
    });

    action
}
