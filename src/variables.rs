//! Variable state holders for model inputs and outputs.
//!
//! Variables are the caller-visible, stateful side of the pipeline: after
//! every evaluation, each variable reflects the latest scalar (or image)
//! value seen or produced for its name. The pipeline owns them for its
//! lifetime and only ever replaces their value fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ModelError, Result};

/// Kind of quantity a variable holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    #[default]
    Scalar,
    Image,
}

/// Last-known value of an output variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Scalar(f64),
    /// Row-major image data with its `(height, width)` shape.
    Array {
        data: Vec<f64>,
        shape: (usize, usize),
    },
}

impl VariableValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Array { .. } => None,
        }
    }
}

fn full_range() -> (f64, f64) {
    (f64::NEG_INFINITY, f64::INFINITY)
}

/// A named model input with a default and last-known scalar state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputVariable {
    pub name: String,
    /// Value substituted when the input is absent from an evaluation call.
    pub default: f64,
    /// Inclusive (min, max) range; enforced by upstream validation tooling,
    /// recorded here as metadata.
    #[serde(default = "full_range")]
    pub value_range: (f64, f64),
    /// Last-known scalar state, refreshed whenever an evaluation supplies a
    /// single value for this input.
    #[serde(default)]
    pub value: Option<f64>,
}

impl InputVariable {
    pub fn new(name: impl Into<String>, default: f64) -> Self {
        Self {
            name: name.into(),
            default,
            value_range: full_range(),
            value: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.value_range = (min, max);
        self
    }
}

/// A named model output with last-known state and, for image outputs, a
/// declared shape plus optional plotting-bound cross-references.
///
/// The four `*_variable` fields name sibling outputs whose resolved scalar
/// value supplies this image's plotting bounds; they are re-resolved from
/// the same evaluation's outputs every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariable {
    pub name: String,
    #[serde(default)]
    pub variable_type: VariableType,
    #[serde(default)]
    pub value: Option<VariableValue>,
    /// Image outputs only: `(height, width)` the flat model output is
    /// reshaped into.
    #[serde(default)]
    pub shape: Option<(usize, usize)>,
    #[serde(default)]
    pub x_min_variable: Option<String>,
    #[serde(default)]
    pub x_max_variable: Option<String>,
    #[serde(default)]
    pub y_min_variable: Option<String>,
    #[serde(default)]
    pub y_max_variable: Option<String>,
    #[serde(default)]
    pub x_min: Option<f64>,
    #[serde(default)]
    pub x_max: Option<f64>,
    #[serde(default)]
    pub y_min: Option<f64>,
    #[serde(default)]
    pub y_max: Option<f64>,
}

impl OutputVariable {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variable_type: VariableType::Scalar,
            value: None,
            shape: None,
            x_min_variable: None,
            x_max_variable: None,
            y_min_variable: None,
            y_max_variable: None,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
        }
    }

    pub fn image(name: impl Into<String>, shape: (usize, usize)) -> Self {
        Self {
            variable_type: VariableType::Image,
            shape: Some(shape),
            ..Self::scalar(name)
        }
    }

    pub fn with_x_bounds(
        mut self,
        min_variable: impl Into<String>,
        max_variable: impl Into<String>,
    ) -> Self {
        self.x_min_variable = Some(min_variable.into());
        self.x_max_variable = Some(max_variable.into());
        self
    }

    pub fn with_y_bounds(
        mut self,
        min_variable: impl Into<String>,
        max_variable: impl Into<String>,
    ) -> Self {
        self.y_min_variable = Some(min_variable.into());
        self.y_max_variable = Some(max_variable.into());
        self
    }
}

/// Anything with a stable name usable as a lookup key.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for InputVariable {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for OutputVariable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Owned, order-preserving collection of variables with a stable
/// name-to-index map. Iteration order is insertion order, which supplies
/// the derived feature/output order when none is configured explicitly.
#[derive(Debug, Clone)]
pub struct VariableSet<V> {
    vars: Vec<V>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl<V: Named> VariableSet<V> {
    pub fn new(vars: Vec<V>) -> Result<Self> {
        let mut names = Vec::with_capacity(vars.len());
        let mut index = HashMap::with_capacity(vars.len());
        for (i, var) in vars.iter().enumerate() {
            let name = var.name().to_string();
            if index.insert(name.clone(), i).is_some() {
                return Err(ModelError::Config(format!(
                    "duplicate variable name '{name}'"
                )));
            }
            names.push(name);
        }
        Ok(Self { vars, names, index })
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&i| &self.vars[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.index.get(name).map(|&i| &mut self.vars[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
