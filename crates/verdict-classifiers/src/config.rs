use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::io::loader::ColumnSchema;
use crate::preprocessing::LabelMapping;

/// Hyperparameters for the feed-forward network trainer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NeuralNetParams {
    /// Expected feature count; fitting fails if the data disagrees.
    pub input_dim: usize,
    /// Hidden layer widths, applied in order with ReLU between them.
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    /// Upper bound on training epochs, so runtime stays bounded even when
    /// the loss never levels off.
    pub max_epochs: usize,
    /// Stop once the epoch-to-epoch loss reduction falls below this.
    pub convergence_threshold: f64,
    pub seed: u64,
}

impl Default for NeuralNetParams {
    fn default() -> Self {
        NeuralNetParams {
            input_dim: 30,
            hidden_layers: vec![16, 8],
            learning_rate: 0.05,
            max_epochs: 500,
            convergence_threshold: 1e-5,
            seed: 42,
        }
    }
}

/// Hyperparameters for the bagged decision-tree ensemble.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RandomForestParams {
    pub n_trees: usize,
    /// `None` grows each tree until its leaves are pure.
    pub max_depth: Option<usize>,
    /// Features drawn per tree; `None` means ceil(sqrt(feature count)).
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        RandomForestParams { n_trees: 500, max_depth: None, max_features: None, seed: 42 }
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelConfig {
    NeuralNet(NeuralNetParams),
    RandomForest(RandomForestParams),
}

impl ModelConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ModelConfig::NeuralNet(_) => "neural-net",
            ModelConfig::RandomForest(_) => "random-forest",
        }
    }

    /// Point the model's RNG at a shared pipeline seed.
    pub fn set_seed(&mut self, seed: u64) {
        match self {
            ModelConfig::NeuralNet(params) => params.seed = seed,
            ModelConfig::RandomForest(params) => params.seed = seed,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::NeuralNet(NeuralNetParams::default())
    }
}

impl FromStr for ModelConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "neural-net" | "neuralnet" | "nn" => {
                Ok(ModelConfig::NeuralNet(NeuralNetParams::default()))
            }
            "random-forest" | "randomforest" | "forest" | "rf" => {
                Ok(ModelConfig::RandomForest(RandomForestParams::default()))
            }
            _ => Err(format!("Unknown model type: {}. Expected neural-net or random-forest", s)),
        }
    }
}

/// Central configuration for a full pipeline run.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Dataset locator: a local path or an http(s) URL.
    pub source: String,
    pub schema: ColumnSchema,
    pub labels: LabelMapping,
    pub train_fraction: f64,
    /// Seed for the stratified split. Model seeds live in their params.
    pub seed: u64,
    /// Decision threshold: probability above it means malignant.
    pub threshold: f64,
    /// Models to train and compare, in report order.
    pub models: Vec<ModelConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            source: String::new(),
            schema: ColumnSchema::wdbc(),
            labels: LabelMapping::default(),
            train_fraction: 0.7,
            seed: 42,
            threshold: 0.5,
            models: vec![
                ModelConfig::NeuralNet(NeuralNetParams::default()),
                ModelConfig::RandomForest(RandomForestParams::default()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_analysis() {
        let config = PipelineConfig::default();
        assert_eq!(config.train_fraction, 0.7);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.models.len(), 2);

        match &config.models[0] {
            ModelConfig::NeuralNet(nn) => {
                assert_eq!(nn.input_dim, 30);
                assert_eq!(nn.hidden_layers, vec![16, 8]);
                assert_eq!(nn.max_epochs, 500);
            }
            other => panic!("expected the network first, got {:?}", other),
        }
        match &config.models[1] {
            ModelConfig::RandomForest(rf) => {
                assert_eq!(rf.n_trees, 500);
                assert_eq!(rf.max_depth, None);
            }
            other => panic!("expected the forest second, got {:?}", other),
        }
    }

    #[test]
    fn model_type_parses_from_short_names() {
        assert_eq!(
            "nn".parse::<ModelConfig>().map(|m| m.name().to_string()),
            Ok("neural-net".to_string())
        );
        assert_eq!(
            "RANDOM_FOREST".parse::<ModelConfig>().map(|m| m.name().to_string()),
            Ok("random-forest".to_string())
        );
        assert!("svm".parse::<ModelConfig>().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "source": "wdbc.data", "seed": 7 }"#).unwrap();
        assert_eq!(config.source, "wdbc.data");
        assert_eq!(config.seed, 7);
        assert_eq!(config.train_fraction, 0.7);
        assert_eq!(config.models.len(), 2);
    }

    #[test]
    fn set_seed_reaches_both_variants() {
        let mut nn = ModelConfig::NeuralNet(NeuralNetParams::default());
        let mut rf = ModelConfig::RandomForest(RandomForestParams::default());
        nn.set_seed(9);
        rf.set_seed(9);
        match nn {
            ModelConfig::NeuralNet(p) => assert_eq!(p.seed, 9),
            _ => unreachable!(),
        }
        match rf {
            ModelConfig::RandomForest(p) => assert_eq!(p.seed, 9),
            _ => unreachable!(),
        }
    }
}
