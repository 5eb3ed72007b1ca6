//! Seeded stratified train/test splitting.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::PipelineError;

/// Disjoint, exhaustive train/test pair produced by `stratified_split`.
#[derive(Debug, Clone)]
pub struct Partition {
    pub train: Dataset,
    pub test: Dataset,
}

/// Split a dataset into stratified train/test partitions.
///
/// Rows are shuffled per class with `StdRng::seed_from_u64(seed)` and the
/// first `round(p * n_c)` of each class go to the training side, so the
/// label ratio of both partitions matches the source within rounding. The
/// same seed and input always produce the same partition.
///
/// Fails with `InvalidFraction` unless `0 < p < 1` and with
/// `InsufficientClasses` when fewer than two labels are present.
pub fn stratified_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<Partition, PipelineError> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(PipelineError::InvalidFraction { value: train_fraction });
    }

    let observed = dataset.distinct_classes();
    if observed < 2 {
        return Err(PipelineError::InsufficientClasses { observed, stage: "split" });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [Diagnosis::Benign, Diagnosis::Malignant] {
        let mut indices = dataset.class_indices(class);
        indices.shuffle(&mut rng);

        let n_train = (train_fraction * indices.len() as f64).round() as usize;
        train_indices.extend_from_slice(&indices[..n_train]);
        test_indices.extend_from_slice(&indices[n_train..]);
    }

    // Restore source order inside each partition so equal seeds yield
    // byte-identical datasets regardless of class layout.
    train_indices.sort_unstable();
    test_indices.sort_unstable();

    log::info!(
        "split {} records into {} train / {} test (fraction {}, seed {})",
        dataset.len(),
        train_indices.len(),
        test_indices.len(),
        train_fraction,
        seed
    );

    Ok(Partition { train: dataset.select(&train_indices), test: dataset.select(&test_indices) })
}
