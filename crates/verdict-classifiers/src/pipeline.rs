//! End-to-end pipeline driver: load, prepare, split, scale, train, evaluate.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::evaluation;
use crate::io::loader::{self, DataSource};
use crate::models::factory;
use crate::preprocessing::{self, MinMaxScaler};
use crate::report::ComparisonReport;
use crate::splitter;

/// Run the whole pipeline described by the config and return the model
/// comparison. Stages fail fast with their documented `PipelineError`;
/// undefined metrics are carried inside the report instead of failing.
pub fn run(config: &PipelineConfig) -> Result<ComparisonReport, PipelineError> {
    if !(0.0..=1.0).contains(&config.threshold) {
        log::warn!("decision threshold {} lies outside [0, 1]", config.threshold);
    }
    if config.models.is_empty() {
        log::warn!("no models configured, the report will be empty");
    }

    let source = DataSource::parse(&config.source);
    let raw = loader::load(&source, &config.schema)?;
    let dataset = preprocessing::prepare(raw, &config.labels)?;
    let partition = splitter::stratified_split(&dataset, config.train_fraction, config.seed)?;

    let observed = partition.train.distinct_classes();
    if observed < 2 {
        return Err(PipelineError::InsufficientClasses { observed, stage: "split" });
    }

    // Normalization statistics come from the training rows only; the test
    // partition reuses them verbatim.
    let scaler = MinMaxScaler::fit(&partition.train.x);
    let mut train = partition.train;
    let mut test = partition.test;
    train.x = scaler.transform(&train.x);
    test.x = scaler.transform(&test.x);

    train.log_summary("train partition");
    test.log_summary("test partition");

    let mut report = ComparisonReport::new();
    for model_config in &config.models {
        let mut model = factory::build_model(model_config);
        model.fit(&train.x, &train.y)?;
        report.push(evaluation::evaluate(model.as_ref(), &test, config.threshold)?);
    }

    Ok(report)
}
