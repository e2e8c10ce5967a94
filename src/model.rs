//! The evaluation pipeline.
//!
//! [`SurrogateModel`] wraps a pre-trained model behind a canonical, ordered
//! numeric contract. Every evaluation runs the same linear sequence: caller
//! inputs are normalized to per-feature tensors, arranged into one ordered
//! feature tensor (defaults filling any gaps), pushed through the input
//! transform chain and the model, untransformed, sliced into per-output
//! tensors and finally rendered in the caller's preferred representation.
//!
//! The pipeline's only mutable shared state is the variable collections:
//! after each call they reflect the latest scalar values seen and produced.

use std::collections::{HashMap, HashSet};

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor, TensorData};
use tracing::{debug, info, warn};

use crate::config::{ModelConfig, OutputFormat, TransformSpec};
use crate::error::{ModelError, Result};
use crate::surrogate::{MlpSurrogate, Surrogate};
use crate::transform::{AffineTransform, ReversibleTransform, TransformChain, UntransformOrder};
use crate::variables::{InputVariable, OutputVariable, VariableSet, VariableType, VariableValue};

/// A caller-supplied input payload.
///
/// Exactly these three kinds are accepted; the normalizer matches them
/// exhaustively. Per-feature tensors are rank 1 with length equal to the
/// batch size; length 1 is the unbatched case.
#[derive(Debug, Clone)]
pub enum InputValue<B: Backend> {
    Variable(InputVariable),
    Scalar(f64),
    Tensor(Tensor<B, 1>),
}

impl<B: Backend> From<f64> for InputValue<B> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl<B: Backend> From<InputVariable> for InputValue<B> {
    fn from(value: InputVariable) -> Self {
        Self::Variable(value)
    }
}

impl<B: Backend> From<Tensor<B, 1>> for InputValue<B> {
    fn from(value: Tensor<B, 1>) -> Self {
        Self::Tensor(value)
    }
}

/// One rendered evaluation result.
#[derive(Debug, Clone)]
pub enum OutputValue<B: Backend> {
    /// Disassembled output tensor (batch length along its only axis).
    Tensor(Tensor<B, 1>),
    /// The output variable's stored value; `None` when the output has never
    /// been scalar-resolved (e.g. only batched evaluations so far).
    Raw(Option<VariableValue>),
    /// Snapshot of the output variable after the state update.
    Variable(OutputVariable),
}

impl<B: Backend> OutputValue<B> {
    pub fn as_tensor(&self) -> Option<&Tensor<B, 1>> {
        match self {
            Self::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Scalar view of this result, whatever the configured format.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Tensor(t) if t.dims()[0] == 1 => Some(scalar_of(t)),
            Self::Tensor(_) => None,
            Self::Raw(value) => value.as_ref().and_then(VariableValue::as_scalar),
            Self::Variable(var) => var.value.as_ref().and_then(VariableValue::as_scalar),
        }
    }
}

#[derive(Default)]
struct ImageBounds {
    x_min: Option<f64>,
    x_max: Option<f64>,
    y_min: Option<f64>,
    y_max: Option<f64>,
}

/// Evaluation pipeline wrapping a pre-trained surrogate model.
pub struct SurrogateModel<B: Backend> {
    model: Box<dyn Surrogate<B>>,
    input_variables: VariableSet<InputVariable>,
    output_variables: VariableSet<OutputVariable>,
    feature_order: Vec<String>,
    output_order: Vec<String>,
    input_transformers: TransformChain<B>,
    output_transformers: TransformChain<B>,
    output_format: OutputFormat,
    untransform_order: UntransformOrder,
    /// Per-feature defaults in feature order, homed on the pipeline device.
    default_values: Tensor<B, 1>,
    device: B::Device,
}

impl<B: Backend> std::fmt::Debug for SurrogateModel<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrogateModel")
            .field("feature_order", &self.feature_order)
            .field("output_order", &self.output_order)
            .finish()
    }
}

impl<B: Backend> SurrogateModel<B> {
    /// Build a pipeline from materialized parts. Feature and output order
    /// default to the variable insertion order; both widths must match the
    /// model's contract.
    pub fn new(
        model: Box<dyn Surrogate<B>>,
        input_variables: Vec<InputVariable>,
        output_variables: Vec<OutputVariable>,
        device: &B::Device,
    ) -> Result<Self> {
        let input_variables = VariableSet::new(input_variables)?;
        let output_variables = VariableSet::new(output_variables)?;

        if input_variables.len() != model.input_dim() {
            return Err(ModelError::Config(format!(
                "{} input variables configured but the model expects {} features",
                input_variables.len(),
                model.input_dim()
            )));
        }
        if output_variables.len() != model.output_dim() {
            return Err(ModelError::Config(format!(
                "{} output variables configured but the model produces {} outputs",
                output_variables.len(),
                model.output_dim()
            )));
        }
        for var in output_variables.iter() {
            if var.variable_type == VariableType::Image && var.shape.is_none() {
                return Err(ModelError::Config(format!(
                    "image output '{}' declares no shape",
                    var.name
                )));
            }
        }

        let feature_order: Vec<String> = input_variables.names().to_vec();
        let output_order: Vec<String> = output_variables.names().to_vec();
        let default_values = build_default_values::<B>(&input_variables, &feature_order, device)?;

        info!(
            "surrogate pipeline constructed: {} features, {} outputs",
            feature_order.len(),
            output_order.len()
        );
        Ok(Self {
            model,
            input_variables,
            output_variables,
            feature_order,
            output_order,
            input_transformers: TransformChain::new(),
            output_transformers: TransformChain::new(),
            output_format: OutputFormat::default(),
            untransform_order: UntransformOrder::default(),
            default_values,
            device: device.clone(),
        })
    }

    /// Build a pipeline from a configuration bundle, resolving the model
    /// weight file and any transform file paths.
    pub fn from_config(config: ModelConfig, device: &B::Device) -> Result<Self> {
        let model = MlpSurrogate::<B>::from_file(&config.model_file, device)?;
        let mut pipeline = Self::new(
            Box::new(model),
            config.input_variables,
            config.output_variables,
            device,
        )?;

        if let Some(order) = config.feature_order {
            pipeline = pipeline.with_feature_order(order)?;
        }
        if let Some(order) = config.output_order {
            pipeline = pipeline.with_output_order(order)?;
        }
        for spec in config.input_transformers {
            let transform = resolve_transform::<B>(spec, device)?;
            pipeline.push_input_transformer(transform)?;
        }
        for spec in config.output_transformers {
            let transform = resolve_transform::<B>(spec, device)?;
            pipeline.push_output_transformer(transform)?;
        }
        pipeline.output_format = config.output_format;
        pipeline.untransform_order = config.untransform_order;
        Ok(pipeline)
    }

    /// Override the feature order (names must be exactly the configured
    /// input variables). Rebuilds the default vector to match.
    pub fn with_feature_order(mut self, order: Vec<String>) -> Result<Self> {
        validate_order(&order, self.input_variables.names(), "feature")?;
        self.default_values =
            build_default_values::<B>(&self.input_variables, &order, &self.device)?;
        self.feature_order = order;
        Ok(self)
    }

    /// Override the output order (names must be exactly the configured
    /// output variables).
    pub fn with_output_order(mut self, order: Vec<String>) -> Result<Self> {
        validate_order(&order, self.output_variables.names(), "output")?;
        self.output_order = order;
        Ok(self)
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_untransform_order(mut self, order: UntransformOrder) -> Self {
        self.untransform_order = order;
        self
    }

    /// Append an input transformer (must match the feature width).
    pub fn push_input_transformer(
        &mut self,
        transform: Box<dyn ReversibleTransform<B>>,
    ) -> Result<()> {
        let at = self.input_transformers.len();
        self.insert_input_transformer(at, transform)
    }

    /// Insert an input transformer at `index`, preserving subsequent
    /// positions.
    pub fn insert_input_transformer(
        &mut self,
        index: usize,
        transform: Box<dyn ReversibleTransform<B>>,
    ) -> Result<()> {
        let width = transform.width();
        if width != self.feature_order.len() {
            return Err(ModelError::Config(format!(
                "input transformer width {width} != feature count {}",
                self.feature_order.len()
            )));
        }
        self.input_transformers.insert(index, transform);
        Ok(())
    }

    /// Append an output transformer (must match the output width).
    pub fn push_output_transformer(
        &mut self,
        transform: Box<dyn ReversibleTransform<B>>,
    ) -> Result<()> {
        let at = self.output_transformers.len();
        self.insert_output_transformer(at, transform)
    }

    /// Insert an output transformer at `index`, preserving subsequent
    /// positions.
    pub fn insert_output_transformer(
        &mut self,
        index: usize,
        transform: Box<dyn ReversibleTransform<B>>,
    ) -> Result<()> {
        let width = transform.width();
        if width != self.output_order.len() {
            return Err(ModelError::Config(format!(
                "output transformer width {width} != output count {}",
                self.output_order.len()
            )));
        }
        self.output_transformers.insert(index, transform);
        Ok(())
    }

    /// Feature names in model order.
    pub fn features(&self) -> &[String] {
        &self.feature_order
    }

    /// Output names in model order.
    pub fn outputs(&self) -> &[String] {
        &self.output_order
    }

    pub fn input_variables(&self) -> &VariableSet<InputVariable> {
        &self.input_variables
    }

    pub fn input_variables_mut(&mut self) -> &mut VariableSet<InputVariable> {
        &mut self.input_variables
    }

    pub fn output_variables(&self) -> &VariableSet<OutputVariable> {
        &self.output_variables
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Re-home the model, every transform and the default vector on
    /// `device`. Idempotent; no partial-device state is observable.
    pub fn to_device(&mut self, device: &B::Device) {
        self.model.to_device(device);
        self.input_transformers.to_device(device);
        self.output_transformers.to_device(device);
        self.default_values = self.default_values.clone().to_device(device);
        self.device = device.clone();
    }

    /// Evaluate the model on a mapping of input name to payload. Absent
    /// inputs fall back to their stored defaults (with one warning each);
    /// shape and type problems abort the call with no partial results.
    pub fn evaluate(
        &mut self,
        input: HashMap<String, InputValue<B>>,
    ) -> Result<HashMap<String, OutputValue<B>>> {
        let normalized = self.normalize_inputs(input)?;
        let arranged = self.arrange_features(normalized)?;
        let batch = arranged.dims()[0];
        let features = self.input_transformers.transform(arranged);
        let raw_output = self.model.forward(features);
        let output = self
            .output_transformers
            .untransform(raw_output, self.untransform_order);
        let disassembled = self.disassemble_outputs(output)?;
        self.render_outputs(disassembled, batch)
    }

    /// Stage 1: coerce every payload to a per-feature tensor on the
    /// pipeline device, refreshing stored scalar state where a single value
    /// was supplied. Batched tensors leave variable state untouched since
    /// no single element can be recorded.
    fn normalize_inputs(
        &mut self,
        input: HashMap<String, InputValue<B>>,
    ) -> Result<HashMap<String, Tensor<B, 1>>> {
        let mut normalized = HashMap::with_capacity(input.len());
        for (name, payload) in input {
            let tensor = match payload {
                InputValue::Variable(var) => {
                    let value = var.value.ok_or_else(|| ModelError::TypeMismatch {
                        name: name.clone(),
                        reason: "variable payload carries no scalar value".to_string(),
                    })?;
                    self.record_input(&name, value);
                    scalar_tensor::<B>(value, &self.device)
                }
                InputValue::Scalar(value) => {
                    self.record_input(&name, value);
                    scalar_tensor::<B>(value, &self.device)
                }
                InputValue::Tensor(tensor) => {
                    let len = tensor.dims()[0];
                    if len == 0 {
                        return Err(ModelError::TypeMismatch {
                            name,
                            reason: "empty tensor supplied".to_string(),
                        });
                    }
                    // to_device is a tracked op; caller gradients survive
                    let tensor = tensor.to_device(&self.device);
                    if len == 1 {
                        self.record_input(&name, scalar_of(&tensor));
                    }
                    tensor
                }
            };
            normalized.insert(name, tensor);
        }
        Ok(normalized)
    }

    fn record_input(&mut self, name: &str, value: f64) {
        if let Some(var) = self.input_variables.get_mut(name) {
            let (min, max) = var.value_range;
            if value < min || value > max {
                debug!("'{name}' value {value} outside configured range ({min}, {max})");
            }
            var.value = Some(value);
        }
    }

    /// Stage 2: produce one `[batch, n_features]` tensor in feature order,
    /// broadcasting stored defaults across the batch and overwriting the
    /// supplied columns.
    fn arrange_features(
        &self,
        supplied: HashMap<String, Tensor<B, 1>>,
    ) -> Result<Tensor<B, 2>> {
        let n_features = self.feature_order.len();

        // walk the supplied names in feature order so the diagnostic is
        // deterministic regardless of map iteration order
        let mut batch: Option<usize> = None;
        for name in &self.feature_order {
            let Some(tensor) = supplied.get(name) else {
                continue;
            };
            let len = tensor.dims()[0];
            match batch {
                None => batch = Some(len),
                Some(expected) if expected != len => {
                    return Err(ModelError::InconsistentShape {
                        name: name.clone(),
                        got: len,
                        expected,
                    });
                }
                Some(_) => {}
            }
        }
        let batch = batch.unwrap_or(1);

        for name in &self.feature_order {
            if !supplied.contains_key(name) {
                warn!("'{name}' missing from input_dict, using default value");
            }
        }

        let mut arranged = self
            .default_values
            .clone()
            .unsqueeze::<2>()
            .expand([batch, n_features]);
        for (name, tensor) in supplied {
            let idx = self
                .feature_order
                .iter()
                .position(|feature| feature == &name)
                .ok_or_else(|| ModelError::UnknownFeature { name: name.clone() })?;
            arranged = arranged.slice_assign([0..batch, idx..idx + 1], tensor.unsqueeze_dim(1));
        }

        let width = arranged.dims()[1];
        if width != n_features {
            return Err(ModelError::ShapeMismatch {
                received: width,
                expected: n_features,
            });
        }
        Ok(arranged)
    }

    /// Stage 5: slice the untransformed output into one tensor per output
    /// name, dropping the trailing singleton axis.
    fn disassemble_outputs(
        &self,
        output: Tensor<B, 2>,
    ) -> Result<HashMap<String, Tensor<B, 1>>> {
        let [batch, width] = output.dims();
        let expected = self.output_order.len();
        if width != expected {
            return Err(ModelError::ShapeMismatch {
                received: width,
                expected,
            });
        }

        let mut disassembled = HashMap::with_capacity(expected);
        for (idx, name) in self.output_order.iter().enumerate() {
            let column = output.clone().slice([0..batch, idx..idx + 1]).squeeze::<1>(1);
            disassembled.insert(name.clone(), column);
        }
        Ok(disassembled)
    }

    /// Stage 6: write scalar/image results back into output variable state
    /// (including plotting bounds for image outputs), then render the
    /// mapping in the configured format. State writes only happen for
    /// unbatched (batch 1) evaluations; a batched call is ambiguous about
    /// which record to store, so variable state is left untouched.
    fn render_outputs(
        &mut self,
        disassembled: HashMap<String, Tensor<B, 1>>,
        batch: usize,
    ) -> Result<HashMap<String, OutputValue<B>>> {
        let order = self.output_order.clone();

        for name in &order {
            let tensor = disassembled.get(name).ok_or_else(|| {
                ModelError::Internal(format!("output '{name}' missing after disassembly"))
            })?;
            let len = tensor.dims()[0];

            let (variable_type, shape) = match self.output_variables.get(name) {
                Some(var) => (var.variable_type, var.shape),
                None => continue,
            };

            match variable_type {
                VariableType::Scalar => {
                    if batch == 1 {
                        let value = scalar_of(tensor);
                        if let Some(var) = self.output_variables.get_mut(name) {
                            var.value = Some(VariableValue::Scalar(value));
                        }
                    }
                }
                VariableType::Image => {
                    let (height, width) = shape.ok_or_else(|| {
                        ModelError::Config(format!("image output '{name}' declares no shape"))
                    })?;
                    if batch == 1 && len == height * width {
                        let data = tensor_to_vec(tensor)?;
                        let bounds = self.resolve_image_bounds(name, &disassembled)?;
                        if let Some(var) = self.output_variables.get_mut(name) {
                            var.value = Some(VariableValue::Array {
                                data,
                                shape: (height, width),
                            });
                            if bounds.x_min.is_some() {
                                var.x_min = bounds.x_min;
                            }
                            if bounds.x_max.is_some() {
                                var.x_max = bounds.x_max;
                            }
                            if bounds.y_min.is_some() {
                                var.y_min = bounds.y_min;
                            }
                            if bounds.y_max.is_some() {
                                var.y_max = bounds.y_max;
                            }
                        }
                    }
                }
            }
        }

        let mut rendered = HashMap::with_capacity(order.len());
        match self.output_format {
            OutputFormat::Tensor => {
                for (name, tensor) in disassembled {
                    rendered.insert(name, OutputValue::Tensor(tensor));
                }
            }
            OutputFormat::Variable => {
                for name in &order {
                    if let Some(var) = self.output_variables.get(name) {
                        rendered.insert(name.clone(), OutputValue::Variable(var.clone()));
                    }
                }
            }
            OutputFormat::Raw => {
                for name in &order {
                    let value = self
                        .output_variables
                        .get(name)
                        .and_then(|var| var.value.clone());
                    rendered.insert(name.clone(), OutputValue::Raw(value));
                }
            }
        }
        Ok(rendered)
    }

    /// Resolve an image output's bound cross-references against the current
    /// call's disassembled outputs. Unset references are no-ops; set
    /// references must name a scalar-resolved sibling.
    fn resolve_image_bounds(
        &self,
        image: &str,
        disassembled: &HashMap<String, Tensor<B, 1>>,
    ) -> Result<ImageBounds> {
        let var = self.output_variables.get(image).ok_or_else(|| {
            ModelError::Internal(format!("image output '{image}' not found"))
        })?;

        let resolve = |field: &str, reference: &Option<String>| -> Result<Option<f64>> {
            let Some(target) = reference else {
                return Ok(None);
            };
            let tensor = disassembled
                .get(target)
                .filter(|t| t.dims()[0] == 1)
                .ok_or_else(|| ModelError::UnresolvedReference {
                    image: image.to_string(),
                    field: field.to_string(),
                    target: target.clone(),
                })?;
            Ok(Some(scalar_of(tensor)))
        };

        Ok(ImageBounds {
            x_min: resolve("x_min", &var.x_min_variable)?,
            x_max: resolve("x_max", &var.x_max_variable)?,
            y_min: resolve("y_min", &var.y_min_variable)?,
            y_max: resolve("y_max", &var.y_max_variable)?,
        })
    }
}

fn validate_order(order: &[String], known: &[String], what: &str) -> Result<()> {
    if order.len() != known.len() {
        return Err(ModelError::Config(format!(
            "{what} order lists {} names but {} variables are configured",
            order.len(),
            known.len()
        )));
    }
    let mut seen = HashSet::with_capacity(order.len());
    for name in order {
        if !known.contains(name) {
            return Err(ModelError::Config(format!(
                "{what} order names '{name}', which is not a configured variable"
            )));
        }
        if !seen.insert(name) {
            return Err(ModelError::Config(format!(
                "{what} order repeats '{name}'"
            )));
        }
    }
    Ok(())
}

fn build_default_values<B: Backend>(
    variables: &VariableSet<InputVariable>,
    order: &[String],
    device: &B::Device,
) -> Result<Tensor<B, 1>> {
    let mut defaults = Vec::with_capacity(order.len());
    for name in order {
        let var = variables.get(name).ok_or_else(|| {
            ModelError::Config(format!("feature '{name}' is not an input variable"))
        })?;
        defaults.push(var.default);
    }
    Ok(Tensor::from_data(
        TensorData::new(defaults, [order.len()]).convert::<B::FloatElem>(),
        device,
    ))
}

fn resolve_transform<B: Backend>(
    spec: TransformSpec,
    device: &B::Device,
) -> Result<Box<dyn ReversibleTransform<B>>> {
    Ok(match spec {
        TransformSpec::File(path) => Box::new(AffineTransform::<B>::from_file(path, device)?),
        TransformSpec::Affine {
            coefficient,
            offset,
        } => Box::new(AffineTransform::<B>::new(coefficient, offset, device)?),
    })
}

fn scalar_tensor<B: Backend>(value: f64, device: &B::Device) -> Tensor<B, 1> {
    Tensor::from_data(
        TensorData::new(vec![value], [1]).convert::<B::FloatElem>(),
        device,
    )
}

fn scalar_of<B: Backend>(tensor: &Tensor<B, 1>) -> f64 {
    tensor.clone().into_scalar().elem::<f64>()
}

fn tensor_to_vec<B: Backend>(tensor: &Tensor<B, 1>) -> Result<Vec<f64>> {
    tensor
        .to_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| ModelError::Internal(format!("tensor readback failed: {e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::{MlpLayerSpec, MlpSpec};
    use burn_ndarray::{NdArray, NdArrayDevice};

    type TestBackend = NdArray<f64>;

    fn sum_model() -> Box<dyn Surrogate<TestBackend>> {
        // single linear layer summing both features
        let spec = MlpSpec {
            input_dim: 2,
            layers: vec![MlpLayerSpec {
                weights: vec![vec![1.0, 1.0]],
                bias: vec![0.0],
                activation: crate::surrogate::Activation::Linear,
            }],
        };
        Box::new(MlpSurrogate::from_spec(spec, &NdArrayDevice::default()).unwrap())
    }

    fn two_feature_pipeline() -> SurrogateModel<TestBackend> {
        SurrogateModel::new(
            sum_model(),
            vec![
                InputVariable::new("a", 1.0),
                InputVariable::new("b", 2.0),
            ],
            vec![OutputVariable::scalar("sum")],
            &NdArrayDevice::default(),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_width_mismatch() {
        let err = SurrogateModel::<TestBackend>::new(
            sum_model(),
            vec![InputVariable::new("a", 1.0)],
            vec![OutputVariable::scalar("sum")],
            &NdArrayDevice::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn construction_rejects_image_without_shape() {
        let mut image = OutputVariable::scalar("img");
        image.variable_type = VariableType::Image;

        let err = SurrogateModel::<TestBackend>::new(
            sum_model(),
            vec![
                InputVariable::new("a", 1.0),
                InputVariable::new("b", 2.0),
            ],
            vec![image],
            &NdArrayDevice::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("declares no shape"));
    }

    #[test]
    fn feature_order_must_match_variables() {
        let pipeline = two_feature_pipeline();
        let err = pipeline
            .with_feature_order(vec!["a".to_string(), "c".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("'c'"));

        let pipeline = two_feature_pipeline();
        let err = pipeline
            .with_feature_order(vec!["a".to_string(), "a".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("repeats"));
    }

    #[test]
    fn variable_payload_without_value_is_type_mismatch() {
        let mut pipeline = two_feature_pipeline();
        let mut input = HashMap::new();
        input.insert(
            "a".to_string(),
            InputValue::Variable(InputVariable::new("a", 1.0)),
        );

        let err = pipeline.evaluate(input).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
    }

    #[test]
    fn empty_tensor_is_type_mismatch() {
        let mut pipeline = two_feature_pipeline();
        let device = NdArrayDevice::default();
        let empty: Tensor<TestBackend, 1> =
            Tensor::from_data(TensorData::new(Vec::<f64>::new(), [0]), &device);

        let mut input = HashMap::new();
        input.insert("a".to_string(), InputValue::Tensor(empty));

        let err = pipeline.evaluate(input).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
    }

    #[test]
    fn transformer_width_is_validated() {
        let mut pipeline = two_feature_pipeline();
        let device = NdArrayDevice::default();
        let wrong_width =
            AffineTransform::<TestBackend>::new(vec![1.0, 1.0, 1.0], vec![0.0, 0.0, 0.0], &device)
                .unwrap();
        assert!(pipeline
            .insert_input_transformer(0, Box::new(wrong_width))
            .is_err());
    }
}
