use crate::config::ModelConfig;
use crate::models::classifier_trait::Classifier;
use crate::models::neural_net::NeuralNetClassifier;
use crate::models::random_forest::RandomForestClassifier;

/// Build a boxed classifier from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(config: &ModelConfig) -> Box<dyn Classifier> {
    match config {
        ModelConfig::NeuralNet(params) => Box::new(NeuralNetClassifier::new(params.clone())),
        ModelConfig::RandomForest(params) => {
            Box::new(RandomForestClassifier::new(params.clone()))
        }
    }
}
