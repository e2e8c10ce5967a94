//! Reversible numeric transforms applied around the model call.
//!
//! Transforms map whole feature/output vectors and are shape-preserving
//! along the feature axis. Each one is statically bound to a fixed width at
//! construction; the pipeline checks that width against its own contract
//! when a transform is attached.

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ModelError, Result};

/// A numeric mapping with a forward and an inverse direction.
pub trait ReversibleTransform<B: Backend>: Send {
    /// Forward mapping (applied on the way into the model).
    fn transform(&self, x: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Inverse mapping (applied on the way out of the model).
    fn untransform(&self, x: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Feature-axis width this transform is bound to.
    fn width(&self) -> usize;

    /// Move every owned tensor to `device`.
    fn to_device(&mut self, device: &B::Device);
}

/// Order in which a chain applies inverse mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UntransformOrder {
    /// Apply each transform's inverse in list order.
    #[default]
    ListOrder,
    /// Apply inverses from the back of the list to the front.
    Reversed,
}

/// Serialized form of an [`AffineTransform`], as stored in JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineSpec {
    pub coefficient: Vec<f64>,
    pub offset: Vec<f64>,
}

/// Per-feature affine map: `transform(x) = (x - offset) / coefficient`,
/// `untransform(y) = y * coefficient + offset`.
pub struct AffineTransform<B: Backend> {
    coefficient: Tensor<B, 1>,
    offset: Tensor<B, 1>,
    width: usize,
}

impl<B: Backend> std::fmt::Debug for AffineTransform<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffineTransform")
            .field("width", &self.width)
            .finish()
    }
}

impl<B: Backend> AffineTransform<B> {
    pub fn new(coefficient: Vec<f64>, offset: Vec<f64>, device: &B::Device) -> Result<Self> {
        if coefficient.is_empty() {
            return Err(ModelError::Config(
                "affine transform must cover at least one feature".to_string(),
            ));
        }
        if coefficient.len() != offset.len() {
            return Err(ModelError::Config(format!(
                "affine coefficient length {} != offset length {}",
                coefficient.len(),
                offset.len()
            )));
        }
        if coefficient.iter().any(|v| !v.is_finite() || *v == 0.0) {
            return Err(ModelError::Config(
                "affine coefficients must be finite and non-zero".to_string(),
            ));
        }
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Config(
                "affine offsets must be finite".to_string(),
            ));
        }

        let width = coefficient.len();
        Ok(Self {
            coefficient: vector_tensor::<B>(&coefficient, device),
            offset: vector_tensor::<B>(&offset, device),
            width,
        })
    }

    pub fn from_spec(spec: AffineSpec, device: &B::Device) -> Result<Self> {
        Self::new(spec.coefficient, spec.offset, device)
    }

    /// Load coefficient/offset vectors from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let spec: AffineSpec = serde_json::from_str(&content)?;
        Self::from_spec(spec, device)
    }
}

impl<B: Backend> ReversibleTransform<B> for AffineTransform<B> {
    fn transform(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let offset = self.offset.clone().unsqueeze::<2>();
        let coefficient = self.coefficient.clone().unsqueeze::<2>();
        (x - offset) / coefficient
    }

    fn untransform(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let offset = self.offset.clone().unsqueeze::<2>();
        let coefficient = self.coefficient.clone().unsqueeze::<2>();
        x * coefficient + offset
    }

    fn width(&self) -> usize {
        self.width
    }

    fn to_device(&mut self, device: &B::Device) {
        self.coefficient = self.coefficient.clone().to_device(device);
        self.offset = self.offset.clone().to_device(device);
    }
}

/// Ordered list of transforms with runtime insertion. An empty chain is the
/// identity in both directions.
pub struct TransformChain<B: Backend> {
    transforms: Vec<Box<dyn ReversibleTransform<B>>>,
}

impl<B: Backend> Default for TransformChain<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> TransformChain<B> {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn push(&mut self, transform: Box<dyn ReversibleTransform<B>>) {
        self.transforms.push(transform);
    }

    /// Insert at `index`, shifting subsequent transforms back. Indices past
    /// the end append.
    pub fn insert(&mut self, index: usize, transform: Box<dyn ReversibleTransform<B>>) {
        let index = index.min(self.transforms.len());
        self.transforms.insert(index, transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Widths of the contained transforms, in order.
    pub fn widths(&self) -> Vec<usize> {
        self.transforms.iter().map(|t| t.width()).collect()
    }

    /// Apply every forward mapping in list order.
    pub fn transform(&self, mut x: Tensor<B, 2>) -> Tensor<B, 2> {
        for transform in &self.transforms {
            x = transform.transform(x);
        }
        x
    }

    /// Apply every inverse mapping in the given order.
    pub fn untransform(&self, mut x: Tensor<B, 2>, order: UntransformOrder) -> Tensor<B, 2> {
        match order {
            UntransformOrder::ListOrder => {
                for transform in &self.transforms {
                    x = transform.untransform(x);
                }
            }
            UntransformOrder::Reversed => {
                for transform in self.transforms.iter().rev() {
                    x = transform.untransform(x);
                }
            }
        }
        x
    }

    pub fn to_device(&mut self, device: &B::Device) {
        for transform in &mut self.transforms {
            transform.to_device(device);
        }
    }
}

fn vector_tensor<B: Backend>(values: &[f64], device: &B::Device) -> Tensor<B, 1> {
    let data = TensorData::new(values.to_vec(), [values.len()]);
    Tensor::from_data(data.convert::<B::FloatElem>(), device)
}
