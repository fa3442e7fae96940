//! Schema-driven rendering of the manipulator side panel.

use eframe::egui;
use serde_json::Value;

use crate::manipulator::ManipulatorPanel;
use crate::model::manipulator::ControlKind;

/// Render the manipulator controls. Returns `true` when an edit finished
/// this frame and should be pushed to the session.
pub fn render_controls(ui: &mut egui::Ui, panel: &mut ManipulatorPanel) -> bool {
    let Some(manipulator) = panel.manipulator().cloned() else {
        return false;
    };

    let busy = panel.is_busy();
    let mut commit = false;

    ui.add_enabled_ui(!busy, |ui| {
        for control in &manipulator.controls {
            let label = control.label().to_string();
            match &control.kind {
                ControlKind::Slider {
                    min, max, step, ..
                } => {
                    let mut value = panel
                        .values()
                        .get(&control.name)
                        .and_then(Value::as_f64)
                        .unwrap_or(*min);
                    let response = ui.add(
                        egui::Slider::new(&mut value, *min..=*max)
                            .step_by(*step)
                            .text(label),
                    );
                    if response.changed() {
                        panel
                            .values_mut()
                            .insert(control.name.clone(), Value::from(value));
                    }
                    // push once per adjustment, not on every drag delta
                    if response.drag_stopped() || response.lost_focus() {
                        commit = true;
                    }
                }
                ControlKind::Picker { choices, .. } => {
                    let mut current = panel
                        .values()
                        .get(&control.name)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    egui::ComboBox::from_label(label)
                        .selected_text(current.clone())
                        .show_ui(ui, |ui| {
                            for choice in choices {
                                if ui
                                    .selectable_value(&mut current, choice.clone(), choice)
                                    .clicked()
                                {
                                    commit = true;
                                }
                            }
                        });
                    panel
                        .values_mut()
                        .insert(control.name.clone(), Value::from(current));
                }
                ControlKind::CheckBox { .. } => {
                    let mut value = panel
                        .values()
                        .get(&control.name)
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    if ui.checkbox(&mut value, label).changed() {
                        panel
                            .values_mut()
                            .insert(control.name.clone(), Value::from(value));
                        commit = true;
                    }
                }
            }
        }
    });

    if busy {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.weak("Updating plot…");
        });
    }

    commit && !busy
}
