//! Core dataset types for the diagnosis pipeline.
//!
//! `Diagnosis` is the two-valued label and `Dataset` couples the numeric
//! feature matrix with per-record labels. The splitter and the models work
//! on row index lists produced here.

use std::fmt;

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Outcome label for a single record. `Malignant` is the positive class
/// throughout the crate: sensitivity, PPV and the probability emitted by
/// `Classifier::predict_proba` all refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub const COUNT: usize = 2;

    /// Class index used for matrix axes and integer-label model backends.
    pub fn index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn from_index(index: usize) -> Diagnosis {
        if index == 0 {
            Diagnosis::Benign
        } else {
            Diagnosis::Malignant
        }
    }

    /// Threshold a positive-class probability into a label. Strictly greater
    /// than the threshold counts as malignant, so `threshold = 1.0` never
    /// yields a positive call.
    pub fn from_probability(prob: f32, threshold: f64) -> Diagnosis {
        if (prob as f64) > threshold {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Diagnosis::Benign => "benign",
            Diagnosis::Malignant => "malignant",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labeled feature matrix. Rows of `x` align one-to-one with `y`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f32>,
    pub y: Vec<Diagnosis>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(x: Array2<f32>, y: Vec<Diagnosis>, feature_names: Vec<String>) -> Self {
        debug_assert_eq!(x.nrows(), y.len(), "feature rows must align with labels");
        debug_assert_eq!(x.ncols(), feature_names.len(), "feature columns must be named");
        Dataset { x, y, feature_names }
    }

    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn record(&self, row: usize) -> ArrayView1<'_, f32> {
        self.x.row(row)
    }

    /// Records per class, indexed by `Diagnosis::index`.
    pub fn class_counts(&self) -> [usize; Diagnosis::COUNT] {
        let mut counts = [0usize; Diagnosis::COUNT];
        for label in &self.y {
            counts[label.index()] += 1;
        }
        counts
    }

    /// Number of classes with at least one record.
    pub fn distinct_classes(&self) -> usize {
        self.class_counts().iter().filter(|&&n| n > 0).count()
    }

    /// Row indices carrying the given label, in source order.
    pub fn class_indices(&self, class: Diagnosis) -> Vec<usize> {
        self.y
            .iter()
            .enumerate()
            .filter_map(|(i, &label)| if label == class { Some(i) } else { None })
            .collect()
    }

    /// New dataset holding only the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    pub fn log_summary(&self, stage: &str) {
        let counts = self.class_counts();
        log::info!(
            "{}: {} records ({} benign, {} malignant), {} feature columns",
            stage,
            self.len(),
            counts[Diagnosis::Benign.index()],
            counts[Diagnosis::Malignant.index()],
            self.n_features()
        );
    }
}
