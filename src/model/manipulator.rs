//! Manipulator schema: server-declared adjustable parameters bound to a
//! plot's generating expression.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single adjustable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManipulatorControl {
    /// Variable name the control binds to in the generating expression.
    pub name: String,
    /// Optional display label; falls back to `name`.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: ControlKind,
}

impl ManipulatorControl {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// The value the control starts out with.
    pub fn initial_value(&self) -> Value {
        match &self.kind {
            ControlKind::Slider { initial, .. } => Value::from(*initial),
            ControlKind::Picker { choices, initial } => {
                let choice = initial
                    .clone()
                    .or_else(|| choices.first().cloned())
                    .unwrap_or_default();
                Value::from(choice)
            }
            ControlKind::CheckBox { initial } => Value::from(*initial),
        }
    }
}

/// Control variants the session can declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Slider {
        min: f64,
        max: f64,
        #[serde(default = "default_step")]
        step: f64,
        initial: f64,
    },
    Picker {
        choices: Vec<String>,
        #[serde(default)]
        initial: Option<String>,
    },
    CheckBox {
        #[serde(default)]
        initial: bool,
    },
}

fn default_step() -> f64 {
    1.0
}

/// Ordered set of controls for the current plot. Replaced wholesale on every
/// plot-state notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manipulator {
    pub controls: Vec<ManipulatorControl>,
}

impl Manipulator {
    /// Value map seeded from each control's declared initial value. The
    /// session re-declares current values as initials after every re-render.
    pub fn initial_values(&self) -> Map<String, Value> {
        self.controls
            .iter()
            .map(|c| (c.name.clone(), c.initial_value()))
            .collect()
    }
}
