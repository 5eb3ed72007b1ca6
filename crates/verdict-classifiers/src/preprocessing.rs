//! Record preparation and feature scaling.
//!
//! `prepare` turns a loaded `RawTable` into a labeled `Dataset`; the
//! `MinMaxScaler` rescales every feature column into [0, 1]. Fitting and
//! transforming are separate steps so the pipeline can fit on the training
//! partition only and reuse the same statistics on the test partition.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::PipelineError;
use crate::io::loader::RawTable;

/// Label tokens as they appear in the source file. Matching ignores ASCII
/// case, so the WDBC "B"/"M" defaults also accept "b"/"m".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    pub benign_token: String,
    pub malignant_token: String,
}

impl Default for LabelMapping {
    fn default() -> Self {
        LabelMapping { benign_token: "B".to_string(), malignant_token: "M".to_string() }
    }
}

impl LabelMapping {
    fn resolve(&self, token: &str) -> Option<Diagnosis> {
        if token.eq_ignore_ascii_case(&self.benign_token) {
            Some(Diagnosis::Benign)
        } else if token.eq_ignore_ascii_case(&self.malignant_token) {
            Some(Diagnosis::Malignant)
        } else {
            None
        }
    }
}

/// Map raw label tokens to `Diagnosis` and assemble the dataset.
///
/// Identifier strings are dropped here; they play no further role in the
/// pipeline. Unknown label tokens are a `SchemaMismatch` with the 1-based
/// row number; fewer than two observed classes is `InsufficientClasses`.
pub fn prepare(raw: RawTable, labels: &LabelMapping) -> Result<Dataset, PipelineError> {
    let mut y = Vec::with_capacity(raw.labels.len());
    for (row_idx, token) in raw.labels.iter().enumerate() {
        let label = labels.resolve(token).ok_or_else(|| PipelineError::SchemaMismatch {
            row: row_idx + 1,
            detail: format!(
                "unknown label '{}', expected '{}' or '{}'",
                token, labels.benign_token, labels.malignant_token
            ),
        })?;
        y.push(label);
    }

    let dataset = Dataset::new(raw.x, y, raw.feature_names);
    let observed = dataset.distinct_classes();
    if observed < 2 {
        return Err(PipelineError::InsufficientClasses { observed, stage: "prepare" });
    }

    dataset.log_summary("prepared dataset");
    Ok(dataset)
}

/// Per-column min/max statistics for rescaling into [0, 1].
#[derive(Clone, Debug)]
pub struct MinMaxScaler {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
}

impl MinMaxScaler {
    /// Fit per-column minima and maxima. Rows are samples, columns are
    /// features; the matrix must be non-empty.
    pub fn fit(x: &Array2<f32>) -> MinMaxScaler {
        let (nrows, ncols) = (x.nrows(), x.ncols());
        assert!(nrows > 0 && ncols > 0, "MinMaxScaler::fit requires a non-empty matrix");

        let mut min = vec![f32::INFINITY; ncols];
        let mut max = vec![f32::NEG_INFINITY; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                let v = x[(r, c)];
                if v < min[c] {
                    min[c] = v;
                }
                if v > max[c] {
                    max[c] = v;
                }
            }
        }

        MinMaxScaler { min, max }
    }

    /// Rescale every value to `(v - min) / (max - min)`, clamped to [0, 1].
    ///
    /// A constant column (max == min at fit time) maps to all zeros rather
    /// than dividing by zero. Values outside the fit range clamp, so test
    /// data never leaves the unit interval the models were trained on.
    pub fn transform(&self, x: &Array2<f32>) -> Array2<f32> {
        let (nrows, ncols) = (x.nrows(), x.ncols());
        debug_assert_eq!(ncols, self.min.len(), "column count must match the fit matrix");

        let mut out = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                let range = self.max[c] - self.min[c];
                let v = if range > 0.0 {
                    ((x[(r, c)] - self.min[c]) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                out.push(v);
            }
        }

        Array2::from_shape_vec((nrows, ncols), out).expect("transform: shape mismatch")
    }

    /// Fit and transform the same matrix in one call.
    pub fn fit_transform(x: &Array2<f32>) -> Array2<f32> {
        let scaler = MinMaxScaler::fit(x);
        scaler.transform(x)
    }
}
