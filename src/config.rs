//! Construction bundle for the evaluation pipeline.
//!
//! A [`ModelConfig`] lists everything needed to stand up a pipeline: the
//! model weight file, the input/output variable collections, transform
//! specs (inline or as file paths resolved at construction), the output
//! format and the explicit feature/output orders.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::transform::UntransformOrder;
use crate::variables::{InputVariable, OutputVariable};

/// How evaluation results are rendered back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain values pulled from the output variables' stored state.
    #[default]
    Raw,
    /// Disassembled tensors, possibly batched.
    Tensor,
    /// The (mutated) output variable objects themselves.
    Variable,
}

// Unrecognized format strings fall back to raw rather than failing the
// whole config load.
impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "tensor" => OutputFormat::Tensor,
            "variable" => OutputFormat::Variable,
            _ => OutputFormat::Raw,
        })
    }
}

/// A transform list entry: either a JSON file path or an inline affine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformSpec {
    File(PathBuf),
    Affine {
        coefficient: Vec<f64>,
        offset: Vec<f64>,
    },
}

/// Full construction bundle, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model weight file (JSON dense-network spec).
    pub model_file: PathBuf,
    pub input_variables: Vec<InputVariable>,
    pub output_variables: Vec<OutputVariable>,
    #[serde(default)]
    pub input_transformers: Vec<TransformSpec>,
    #[serde(default)]
    pub output_transformers: Vec<TransformSpec>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub untransform_order: UntransformOrder,
    /// Feature names in the order the model consumes them. Defaults to the
    /// input variable order.
    #[serde(default)]
    pub feature_order: Option<Vec<String>>,
    /// Output names in the order the model produces them. Defaults to the
    /// output variable order.
    #[serde(default)]
    pub output_order: Option<Vec<String>>,
}

impl ModelConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_output_format_falls_back_to_raw() {
        let fmt: OutputFormat = serde_json::from_str("\"tensor\"").unwrap();
        assert_eq!(fmt, OutputFormat::Tensor);

        let fmt: OutputFormat = serde_json::from_str("\"softmax\"").unwrap();
        assert_eq!(fmt, OutputFormat::Raw);
    }

    #[test]
    fn transform_spec_accepts_paths_and_inline_affines() {
        let specs: Vec<TransformSpec> = serde_json::from_str(
            r#"["normalization.json", {"coefficient": [2.0], "offset": [1.0]}]"#,
        )
        .unwrap();

        assert!(matches!(specs[0], TransformSpec::File(_)));
        assert!(matches!(specs[1], TransformSpec::Affine { .. }));
    }

    #[test]
    fn config_parses_with_defaults() {
        let config: ModelConfig = serde_json::from_str(
            r#"{
                "model_file": "model.json",
                "input_variables": [{"name": "x", "default": 0.5}],
                "output_variables": [{"name": "y"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output_format, OutputFormat::Raw);
        assert_eq!(config.untransform_order, UntransformOrder::ListOrder);
        assert!(config.input_transformers.is_empty());
        assert!(config.feature_order.is_none());
        assert_eq!(config.input_variables[0].default, 0.5);
        assert_eq!(
            config.input_variables[0].value_range,
            (f64::NEG_INFINITY, f64::INFINITY)
        );
    }
}
