//! Surrogate model execution (CPU-friendly dense networks).
//!
//! The pipeline treats the model as an opaque, pure function from an
//! ordered-feature tensor to an ordered-output tensor. [`MlpSurrogate`]
//! is the shipped implementation: a small dense network whose weights are
//! loaded from JSON and whose forward pass runs on burn tensors, so
//! gradient tracking and device placement flow through unchanged.

use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ModelError, Result};

/// An opaque differentiable function from feature tensor to output tensor.
///
/// `forward` must not detach the autodiff graph: callers rely on
/// backpropagating through the whole evaluation.
pub trait Surrogate<B: Backend>: Send {
    /// Single model call: `[batch, input_dim] -> [batch, output_dim]`.
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Expected feature-axis width of the input.
    fn input_dim(&self) -> usize;

    /// Feature-axis width of the produced output.
    fn output_dim(&self) -> usize;

    /// Move every owned tensor to `device`.
    fn to_device(&mut self, device: &B::Device);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

/// One dense layer as serialized on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpLayerSpec {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl MlpLayerSpec {
    fn in_dim(&self) -> usize {
        self.weights.first().map(|r| r.len()).unwrap_or(0)
    }

    fn out_dim(&self) -> usize {
        self.weights.len()
    }
}

/// JSON-serialized dense network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpSpec {
    /// Expected input dimension.
    pub input_dim: usize,
    pub layers: Vec<MlpLayerSpec>,
}

impl MlpSpec {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let spec: Self = serde_json::from_str(&content)?;
        spec.validate().map_err(ModelError::Config)?;
        Ok(spec)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }
        Ok(())
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }
}

struct MlpLayer<B: Backend> {
    /// Stored transposed, shape `[in_dim, out_dim]`, so forward is a plain
    /// matmul on `[batch, in_dim]`.
    weight: Tensor<B, 2>,
    bias: Tensor<B, 1>,
    activation: Activation,
}

/// Dense network executed with burn tensor ops.
pub struct MlpSurrogate<B: Backend> {
    layers: Vec<MlpLayer<B>>,
    input_dim: usize,
    output_dim: usize,
}

impl<B: Backend> std::fmt::Debug for MlpSurrogate<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MlpSurrogate")
            .field("input_dim", &self.input_dim)
            .field("output_dim", &self.output_dim)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl<B: Backend> MlpSurrogate<B> {
    pub fn from_spec(spec: MlpSpec, device: &B::Device) -> Result<Self> {
        spec.validate().map_err(ModelError::Config)?;

        let input_dim = spec.input_dim;
        let output_dim = spec.output_dim();
        let mut layers = Vec::with_capacity(spec.layers.len());
        for layer in &spec.layers {
            let in_dim = layer.in_dim();
            let out_dim = layer.out_dim();

            let mut transposed = Vec::with_capacity(in_dim * out_dim);
            for i in 0..in_dim {
                for row in &layer.weights {
                    transposed.push(row[i]);
                }
            }
            let weight = Tensor::from_data(
                TensorData::new(transposed, [in_dim, out_dim]).convert::<B::FloatElem>(),
                device,
            );
            let bias = Tensor::from_data(
                TensorData::new(layer.bias.clone(), [out_dim]).convert::<B::FloatElem>(),
                device,
            );
            layers.push(MlpLayer {
                weight,
                bias,
                activation: layer.activation,
            });
        }

        Ok(Self {
            layers,
            input_dim,
            output_dim,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Self> {
        Self::from_spec(MlpSpec::from_file(path)?, device)
    }
}

impl<B: Backend> Surrogate<B> for MlpSurrogate<B> {
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = input;
        for layer in &self.layers {
            x = x.matmul(layer.weight.clone()) + layer.bias.clone().unsqueeze::<2>();
            x = match layer.activation {
                Activation::Linear => x,
                Activation::Relu => activation::relu(x),
                Activation::Tanh => x.tanh(),
                Activation::Sigmoid => activation::sigmoid(x),
            };
        }
        x
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn to_device(&mut self, device: &B::Device) {
        for layer in &mut self.layers {
            layer.weight = layer.weight.clone().to_device(device);
            layer.bias = layer.bias.clone().to_device(device);
        }
    }
}
