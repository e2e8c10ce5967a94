//! modelpipe — ordered-contract evaluation of pre-trained surrogate models.
//!
//! Wraps a pre-trained neural network so it can be evaluated from
//! heterogeneous callers (raw floats, stateful variable objects, tensors)
//! while keeping a canonical, ordered numeric contract with the model:
//!
//! 1. inputs are normalized to per-feature tensors,
//! 2. arranged into one ordered feature tensor (defaults fill any gaps),
//! 3. pushed through a reversible input transform chain,
//! 4. evaluated by the model (gradient tracking preserved),
//! 5. untransformed by the output chain,
//! 6. sliced per output name and rendered as tensors, plain values or
//!    variable objects, with image outputs also receiving plotting bounds
//!    resolved from sibling outputs.
//!
//! The pipeline is generic over a burn [`Backend`](burn::tensor::backend::Backend);
//! instantiate it with `burn_ndarray::NdArray<f64>` for double-precision CPU
//! evaluation, or wrap the backend in `Autodiff` when callers need to
//! backpropagate through results.

pub mod config;
pub mod error;
pub mod model;
pub mod surrogate;
pub mod transform;
pub mod variables;

pub use config::{ModelConfig, OutputFormat, TransformSpec};
pub use error::{ModelError, Result};
pub use model::{InputValue, OutputValue, SurrogateModel};
pub use surrogate::{Activation, MlpSpec, MlpSurrogate, Surrogate};
pub use transform::{AffineSpec, AffineTransform, ReversibleTransform, TransformChain, UntransformOrder};
pub use variables::{
    InputVariable, Named, OutputVariable, VariableSet, VariableType, VariableValue,
};
