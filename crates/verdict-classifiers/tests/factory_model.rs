//! Factory smoke tests: both configured backends build, fit and predict.

use ndarray::Array2;
use verdict_classifiers::config::{ModelConfig, NeuralNetParams, RandomForestParams};
use verdict_classifiers::data_handling::Diagnosis;
use verdict_classifiers::models::factory;

fn tiny_dataset() -> (Array2<f32>, Vec<Diagnosis>) {
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            0.9, 0.0, // malignant
            0.0, 0.8, // benign
            1.0, 0.1, // malignant
            0.0, 0.9, // benign
            1.1, 0.0, // malignant
            0.1, 1.2, // benign
        ],
    )
    .expect("failed to create feature matrix");

    let y = vec![
        Diagnosis::Malignant,
        Diagnosis::Benign,
        Diagnosis::Malignant,
        Diagnosis::Benign,
        Diagnosis::Malignant,
        Diagnosis::Benign,
    ];
    (x, y)
}

#[test]
fn factory_builds_a_working_network() {
    let (x, y) = tiny_dataset();
    let config = ModelConfig::NeuralNet(NeuralNetParams {
        input_dim: 2,
        hidden_layers: vec![4],
        learning_rate: 0.1,
        max_epochs: 200,
        convergence_threshold: 0.0,
        seed: 3,
    });

    let mut model = factory::build_model(&config);
    assert_eq!(model.name(), "neural-net");
    model.fit(&x, &y).expect("network failed to fit");
    let probs = model.predict_proba(&x).expect("network failed to predict");
    assert_eq!(probs.len(), x.nrows());
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn factory_builds_a_working_forest() {
    let (x, y) = tiny_dataset();
    let config = ModelConfig::RandomForest(RandomForestParams {
        n_trees: 15,
        max_depth: Some(4),
        max_features: None,
        seed: 3,
    });

    let mut model = factory::build_model(&config);
    assert_eq!(model.name(), "random-forest");
    model.fit(&x, &y).expect("forest failed to fit");
    let probs = model.predict_proba(&x).expect("forest failed to predict");
    assert_eq!(probs.len(), x.nrows());
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
}
