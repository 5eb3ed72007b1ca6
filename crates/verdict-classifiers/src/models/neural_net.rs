//! Feed-forward network classifier built on candle.
//!
//! The architecture is a plain multi-layer perceptron: Linear layers with
//! ReLU between the hidden widths and a single output logit. Training runs
//! full-batch AdamW on binary cross-entropy until the per-epoch loss
//! reduction falls below the convergence threshold or the epoch cap hits.

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{loss, AdamW, Linear, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::NeuralNetParams;
use crate::data_handling::Diagnosis;
use crate::error::PipelineError;
use crate::models::classifier_trait::{check_fit_shapes, not_fitted, Classifier};

const MODEL_NAME: &str = "neural-net";

pub struct NeuralNetClassifier {
    params: NeuralNetParams,
    device: Device,
    network: Option<Mlp>,
}

struct Mlp {
    hidden: Vec<Linear>,
    output: Linear,
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut xs = xs.clone();
        for layer in &self.hidden {
            xs = layer.forward(&xs)?.relu()?;
        }
        self.output.forward(&xs)
    }
}

impl NeuralNetClassifier {
    pub fn new(params: NeuralNetParams) -> Self {
        NeuralNetClassifier { params, device: Device::Cpu, network: None }
    }

    /// Layer dimensions as (prefix, in, out) triples, hidden layers first.
    fn layer_dims(&self) -> Vec<(String, usize, usize)> {
        let mut dims = Vec::with_capacity(self.params.hidden_layers.len() + 1);
        let mut in_dim = self.params.input_dim;
        for (i, &width) in self.params.hidden_layers.iter().enumerate() {
            dims.push((format!("hidden_{}", i), in_dim, width));
            in_dim = width;
        }
        dims.push(("output".to_string(), in_dim, 1));
        dims
    }

    /// Populate the var map with seeded initial parameters so two fits with
    /// the same seed produce the same network. Weights are uniform in
    /// ±1/sqrt(fan_in), biases start at zero.
    fn seed_var_map(&self, varmap: &mut VarMap) -> candle_core::Result<()> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut tensors = Vec::new();
        for (prefix, in_dim, out_dim) in self.layer_dims() {
            let limit = (1.0 / in_dim as f32).sqrt();
            let weights: Vec<f32> =
                (0..out_dim * in_dim).map(|_| rng.gen_range(-limit..limit)).collect();
            tensors.push((
                format!("{}.weight", prefix),
                Tensor::from_vec(weights, (out_dim, in_dim), &self.device)?,
            ));
            tensors.push((
                format!("{}.bias", prefix),
                Tensor::zeros((out_dim,), DType::F32, &self.device)?,
            ));
        }

        let mut ws = varmap.data().lock().unwrap();
        for (name, tensor) in tensors {
            ws.insert(name, Var::from_tensor(&tensor)?);
        }
        Ok(())
    }

    fn build_network(&self, varmap: &VarMap) -> candle_core::Result<Mlp> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, &self.device);
        let mut hidden = Vec::with_capacity(self.params.hidden_layers.len());
        let mut in_dim = self.params.input_dim;
        for (i, &width) in self.params.hidden_layers.iter().enumerate() {
            hidden.push(linear_from_varbuilder(&vb, in_dim, width, &format!("hidden_{}", i))?);
            in_dim = width;
        }
        let output = linear_from_varbuilder(&vb, in_dim, 1, "output")?;
        Ok(Mlp { hidden, output })
    }

    fn train(&mut self, x: &Array2<f32>, y: &[Diagnosis]) -> candle_core::Result<()> {
        let n = x.nrows();
        let x_t = tensor_from_matrix(x, &self.device)?;
        let targets: Vec<f32> = y.iter().map(|d| d.index() as f32).collect();
        let y_t = Tensor::from_vec(targets, n, &self.device)?;

        let mut varmap = VarMap::new();
        self.seed_var_map(&mut varmap)?;
        let network = self.build_network(&varmap)?;

        let adamw_params = ParamsAdamW { lr: self.params.learning_rate, ..Default::default() };
        let mut opt = AdamW::new(varmap.all_vars(), adamw_params)?;

        log::info!(
            "training {} on {} records for up to {} epochs (lr {})",
            MODEL_NAME,
            n,
            self.params.max_epochs,
            self.params.learning_rate
        );

        let threshold = self.params.convergence_threshold as f32;
        let mut previous_loss = f32::INFINITY;
        for epoch in 0..self.params.max_epochs {
            let logits = network.forward(&x_t)?.squeeze(1)?;
            let loss = loss::binary_cross_entropy_with_logit(&logits, &y_t)?;
            opt.backward_step(&loss)?;

            let loss_value = loss.to_vec0::<f32>()?;
            if !loss_value.is_finite() {
                candle_core::bail!("loss diverged at epoch {}", epoch);
            }
            log::debug!("epoch {}: loss {:.6}", epoch, loss_value);

            let reduction = previous_loss - loss_value;
            if reduction >= 0.0 && reduction < threshold {
                log::info!(
                    "converged after {} epochs (loss {:.6}, reduction {:.2e})",
                    epoch + 1,
                    loss_value,
                    reduction
                );
                break;
            }
            previous_loss = loss_value;
        }

        self.network = Some(network);
        Ok(())
    }

    fn model_failure(&self, cause: impl ToString) -> PipelineError {
        PipelineError::ModelFailure { model: MODEL_NAME.to_string(), cause: cause.to_string() }
    }
}

impl Classifier for NeuralNetClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[Diagnosis]) -> Result<(), PipelineError> {
        check_fit_shapes(MODEL_NAME, x, y)?;
        if self.params.input_dim == 0 {
            return Err(self.model_failure("input_dim must be positive"));
        }
        if x.ncols() != self.params.input_dim {
            return Err(self.model_failure(format!(
                "expected {} feature columns, found {}",
                self.params.input_dim,
                x.ncols()
            )));
        }
        self.train(x, y).map_err(|e| self.model_failure(e))
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>, PipelineError> {
        let network = self.network.as_ref().ok_or_else(|| not_fitted(MODEL_NAME))?;
        if x.ncols() != self.params.input_dim {
            return Err(self.model_failure(format!(
                "expected {} feature columns, found {}",
                self.params.input_dim,
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let probs = tensor_from_matrix(x, &self.device)
            .and_then(|x_t| network.forward(&x_t)?.squeeze(1))
            .and_then(|logits| candle_nn::ops::sigmoid(&logits)?.to_vec1::<f32>())
            .map_err(|e| self.model_failure(e))?;
        Ok(probs)
    }

    fn name(&self) -> &'static str {
        MODEL_NAME
    }
}

fn tensor_from_matrix(x: &Array2<f32>, device: &Device) -> candle_core::Result<Tensor> {
    // ndarray iteration follows logical row-major order for any layout
    let values: Vec<f32> = x.iter().copied().collect();
    Tensor::from_vec(values, (x.nrows(), x.ncols()), device)
}

fn linear_from_varbuilder(
    vb: &VarBuilder,
    in_dim: usize,
    out_dim: usize,
    prefix: &str,
) -> candle_core::Result<Linear> {
    let weight = vb.get((out_dim, in_dim), &format!("{}.weight", prefix))?;
    let bias = vb.get((out_dim,), &format!("{}.bias", prefix))?;
    Ok(Linear::new(weight, Some(bias)))
}
