//! plotpane crate root: re-exports and module wiring.
//!
//! This crate provides a ready-to-use plot pane built on egui/eframe for a
//! remote graphics session: the session renders plots and notifies the
//! client out-of-band; the pane displays the current plot, navigates the
//! plot history, runs locator (point-picking) sessions, hosts the
//! manipulator panel, and exports plots.
//!
//! The implementation is split into cohesive modules:
//! - `server`: the asynchronous remote-operations facade
//! - `events`: typed event channel for session notifications
//! - `presenter`: gesture/notification orchestration and progress policy
//! - `locator` / `manipulator`: the two interaction coordinators
//! - `ui` + `app`: the egui view and the runnable eframe application

pub mod app;
pub mod config;
pub mod console;
pub mod events;
pub mod export;
pub mod find_replace;
pub mod locator;
pub mod manipulator;
pub mod model;
pub mod prefs;
pub mod presenter;
pub mod server;
pub mod ui;
pub mod zoom;

// Public re-exports for a compact external API
pub use app::{run_plot_pane, PlotPane};
pub use config::{FeatureFlags, PlotPaneConfig};
pub use events::{EventBus, EventFilter, EventKind, SessionEvent};
pub use model::plots::{PlotSize, PlotsState, Point};
pub use presenter::{PlotsDisplay, PlotsPresenter};
pub use server::{PlotServer, ServerCallback, ServerError, ServerResult};
