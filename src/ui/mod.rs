//! egui implementation of the plot pane's view surface.

pub mod dialogs;
pub mod export_ui;
pub mod image_loader;
pub mod locator_ui;
pub mod manipulator_ui;
pub mod plot_view;
pub mod toolbar;
