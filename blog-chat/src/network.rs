//! Dense feed-forward classifier on candle
//!
//! ReLU hidden layers, dropout after the first hidden layer (training only),
//! linear output producing logits; [`Network::predict`] applies softmax.
//!
//! Parameters live in a [`VarMap`] under `hidden.<i>.weight`,
//! `hidden.<i>.bias`, `output.weight`, `output.bias` (weights are
//! `[out, in]`). The saved safetensors file is self-describing: layer widths
//! are read back from the tensor shapes.

use crate::{ChatError, Result};
use candle_core::{DType, Device, Module, Tensor, Var, D};
use candle_nn::{Dropout, Linear, VarBuilder, VarMap};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const HIDDEN_PREFIX: &str = "hidden";
const OUTPUT_PREFIX: &str = "output";

/// Layer widths of a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkShape {
    pub input_dim: usize,
    pub hidden: Vec<usize>,
    pub output_dim: usize,
}

/// Intent classifier network
pub struct Network {
    shape: NetworkShape,
    varmap: VarMap,
    hidden: Vec<Linear>,
    output: Linear,
    dropout: Dropout,
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network").field("shape", &self.shape).finish()
    }
}

fn tensor_name(prefix: &str, layer: Option<usize>, param: &str) -> String {
    match layer {
        Some(i) => format!("{}.{}.{}", prefix, i, param),
        None => format!("{}.{}", prefix, param),
    }
}

/// Glorot-uniform `[out, in]` weights and zero bias drawn from `rng`
fn glorot<R: Rng + ?Sized>(
    input_dim: usize,
    output_dim: usize,
    device: &Device,
    rng: &mut R,
) -> Result<(Tensor, Tensor)> {
    let limit = (6.0 / (input_dim + output_dim).max(1) as f32).sqrt();
    let values: Vec<f32> = (0..input_dim * output_dim)
        .map(|_| rng.gen_range(-limit..=limit))
        .collect();
    let weight = Tensor::from_vec(values, (output_dim, input_dim), device)?;
    let bias = Tensor::zeros(output_dim, DType::F32, device)?;
    Ok((weight, bias))
}

impl Network {
    /// Fresh classifier topology with weights drawn from `rng`
    pub fn feed_forward<R: Rng + ?Sized>(
        input_dim: usize,
        hidden: &[usize],
        output_dim: usize,
        dropout: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if !(0.0..1.0).contains(&dropout) {
            return Err(ChatError::InvalidModel(format!(
                "dropout {} outside [0, 1)",
                dropout
            )));
        }

        let device = Device::Cpu;
        let mut tensors = HashMap::new();
        let mut fan_in = input_dim;
        for (i, &width) in hidden.iter().enumerate() {
            let (weight, bias) = glorot(fan_in, width, &device, rng)?;
            tensors.insert(tensor_name(HIDDEN_PREFIX, Some(i), "weight"), weight);
            tensors.insert(tensor_name(HIDDEN_PREFIX, Some(i), "bias"), bias);
            fan_in = width;
        }
        let (weight, bias) = glorot(fan_in, output_dim, &device, rng)?;
        tensors.insert(tensor_name(OUTPUT_PREFIX, None, "weight"), weight);
        tensors.insert(tensor_name(OUTPUT_PREFIX, None, "bias"), bias);

        let shape = NetworkShape {
            input_dim,
            hidden: hidden.to_vec(),
            output_dim,
        };
        Self::build(shape, tensors, dropout)
    }

    /// Assemble a network from named parameter tensors, inferring its shape
    ///
    /// Used for loading; no dropout is configured.
    pub fn from_tensors(tensors: HashMap<String, Tensor>) -> Result<Self> {
        let shape = infer_shape(&tensors)?;
        Self::build(shape, tensors, 0.0)
    }

    /// Load a safetensors file written by [`Network::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ChatError::io(path, e))?;
        let tensors = candle_core::safetensors::load_buffer(&bytes, &Device::Cpu)
            .map_err(|e| ChatError::model(path, e))?;
        Self::from_tensors(tensors)
    }

    /// Write all parameters as safetensors, overwriting `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.varmap.save(path).map_err(|e| ChatError::model(path, e))
    }

    fn build(shape: NetworkShape, tensors: HashMap<String, Tensor>, dropout: f32) -> Result<Self> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        {
            let mut vars = varmap
                .data()
                .lock()
                .map_err(|_| ChatError::InvalidModel("parameter map lock poisoned".to_string()))?;
            for (name, tensor) in tensors {
                let tensor = tensor.to_dtype(DType::F32)?;
                vars.insert(name, Var::from_tensor(&tensor)?);
            }
        }

        // Existing variables are shape-checked by the builder
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let mut hidden = Vec::with_capacity(shape.hidden.len());
        let mut fan_in = shape.input_dim;
        for (i, &width) in shape.hidden.iter().enumerate() {
            hidden.push(candle_nn::linear(fan_in, width, vb.pp(HIDDEN_PREFIX).pp(i))?);
            fan_in = width;
        }
        let output = candle_nn::linear(fan_in, shape.output_dim, vb.pp(OUTPUT_PREFIX))?;

        Ok(Self {
            shape,
            varmap,
            hidden,
            output,
            dropout: Dropout::new(dropout),
        })
    }

    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    pub fn input_dim(&self) -> usize {
        self.shape.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.shape.output_dim
    }

    /// Trainable variables, for the optimizer
    pub fn vars(&self) -> Vec<Var> {
        self.varmap.all_vars()
    }

    /// Logits for a `[batch, input_dim]` tensor; dropout only when `train`
    pub fn forward(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let mut xs = xs.clone();
        for (i, layer) in self.hidden.iter().enumerate() {
            xs = layer.forward(&xs)?.relu()?;
            if i == 0 {
                xs = self.dropout.forward(&xs, train)?;
            }
        }
        Ok(self.output.forward(&xs)?)
    }

    /// Probability distribution over the output classes for one input
    pub fn predict(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.input_dim() {
            return Err(ChatError::DimensionMismatch {
                artifact: "input vector",
                expected: self.input_dim(),
                actual: input.len(),
            });
        }
        let xs = Tensor::from_slice(input, (1, input.len()), &Device::Cpu)?;
        let logits = self.forward(&xs, false)?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?;
        Ok(probabilities.squeeze(0)?.to_vec1::<f32>()?)
    }
}

/// Read layer widths from tensor shapes and check that layers chain
fn infer_shape(tensors: &HashMap<String, Tensor>) -> Result<NetworkShape> {
    let dims2 = |name: &str| -> Result<(usize, usize)> {
        let tensor = tensors
            .get(name)
            .ok_or_else(|| ChatError::InvalidModel(format!("missing tensor '{}'", name)))?;
        tensor
            .dims2()
            .map_err(|_| ChatError::InvalidModel(format!("tensor '{}' is not a matrix", name)))
    };
    let check_bias = |name: &str, expected: usize| -> Result<()> {
        let tensor = tensors
            .get(name)
            .ok_or_else(|| ChatError::InvalidModel(format!("missing tensor '{}'", name)))?;
        match tensor.dims1() {
            Ok(len) if len == expected => Ok(()),
            _ => Err(ChatError::InvalidModel(format!(
                "tensor '{}' has shape {:?}, expected [{}]",
                name,
                tensor.dims(),
                expected
            ))),
        }
    };

    let mut hidden = Vec::new();
    let mut input_dim = None;
    let mut fan_in = None;
    while tensors.contains_key(&tensor_name(HIDDEN_PREFIX, Some(hidden.len()), "weight")) {
        let i = hidden.len();
        let (out, inp) = dims2(&tensor_name(HIDDEN_PREFIX, Some(i), "weight"))?;
        check_bias(&tensor_name(HIDDEN_PREFIX, Some(i), "bias"), out)?;
        if let Some(previous) = fan_in {
            if previous != inp {
                return Err(ChatError::InvalidModel(format!(
                    "hidden layer {} expects {} inputs but the previous layer produces {}",
                    i, inp, previous
                )));
            }
        }
        input_dim.get_or_insert(inp);
        hidden.push(out);
        fan_in = Some(out);
    }

    let (output_dim, inp) = dims2(&tensor_name(OUTPUT_PREFIX, None, "weight"))?;
    check_bias(&tensor_name(OUTPUT_PREFIX, None, "bias"), output_dim)?;
    if let Some(previous) = fan_in {
        if previous != inp {
            return Err(ChatError::InvalidModel(format!(
                "output layer expects {} inputs but the last hidden layer produces {}",
                inp, previous
            )));
        }
    }

    let expected_tensors = 2 * (hidden.len() + 1);
    if tensors.len() != expected_tensors {
        return Err(ChatError::InvalidModel(format!(
            "expected {} parameter tensors, found {}",
            expected_tensors,
            tensors.len()
        )));
    }

    Ok(NetworkShape {
        input_dim: input_dim.unwrap_or(inp),
        hidden,
        output_dim,
    })
}
