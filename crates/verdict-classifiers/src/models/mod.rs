pub mod neural_net;
pub mod random_forest;

pub mod classifier_trait;
pub mod factory;
