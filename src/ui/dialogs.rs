//! Blocking dialogs: server error messages and destructive-gesture
//! confirmation.

use eframe::egui;

use crate::presenter::{ConfirmRequest, DestructiveGesture};

/// Render the error dialog while one is pending. Clears the slot when the
/// user dismisses it.
pub fn error_dialog(ctx: &egui::Context, error: &mut Option<(String, String)>) {
    let Some((caption, message)) = error.clone() else {
        return;
    };
    let mut dismissed = false;
    egui::Window::new(caption)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(message);
            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    if dismissed {
        *error = None;
    }
}

/// Render the confirmation dialog while one is pending. Returns the resolved
/// answer and clears the slot once the user picks one.
pub fn confirm_dialog(
    ctx: &egui::Context,
    confirm: &mut Option<ConfirmRequest>,
) -> Option<(DestructiveGesture, bool)> {
    let request = confirm.clone()?;
    let mut answer = None;
    egui::Window::new(request.caption)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(request.message);
            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("No").clicked() {
                    answer = Some((request.gesture, false));
                }
                if ui.button("Yes").clicked() {
                    answer = Some((request.gesture, true));
                }
            });
        });
    if answer.is_some() {
        *confirm = None;
    }
    answer
}
