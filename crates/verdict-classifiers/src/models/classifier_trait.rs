use ndarray::{Array2, ArrayView1, Axis};

use crate::data_handling::Diagnosis;
use crate::error::PipelineError;

/// Contract shared by every trainer variant so the evaluator and report can
/// treat them uniformly. Implementations wrap an external backend; fitting
/// and prediction surface backend failures as `PipelineError::ModelFailure`.
pub trait Classifier {
    /// Fit the model on a feature matrix (rows are records) and its labels.
    fn fit(&mut self, x: &Array2<f32>, y: &[Diagnosis]) -> Result<(), PipelineError>;

    /// Probability of `Malignant` per row, each in [0, 1]. Fails when called
    /// before a successful `fit`.
    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>, PipelineError>;

    /// Human readable name for logs and the comparison report.
    fn name(&self) -> &'static str {
        "classifier"
    }

    /// Thresholded labels with their probabilities. A probability strictly
    /// greater than `threshold` reads as malignant.
    fn predict(
        &self,
        x: &Array2<f32>,
        threshold: f64,
    ) -> Result<Vec<(Diagnosis, f32)>, PipelineError> {
        let probs = self.predict_proba(x)?;
        Ok(probs.into_iter().map(|p| (Diagnosis::from_probability(p, threshold), p)).collect())
    }

    /// Single-record prediction.
    fn predict_one(
        &self,
        record: ArrayView1<'_, f32>,
        threshold: f64,
    ) -> Result<(Diagnosis, f32), PipelineError> {
        let row = record.insert_axis(Axis(0)).to_owned();
        let mut labeled = self.predict(&row, threshold)?;
        labeled.pop().ok_or_else(|| PipelineError::ModelFailure {
            model: self.name().to_string(),
            cause: "no prediction produced for record".to_string(),
        })
    }
}

/// Shared guard for the fit-before-predict contract.
pub(crate) fn not_fitted(model: &'static str) -> PipelineError {
    PipelineError::ModelFailure { model: model.to_string(), cause: "model not fitted".to_string() }
}

/// Shared guard for label/matrix alignment at fit time.
pub(crate) fn check_fit_shapes(
    model: &'static str,
    x: &Array2<f32>,
    y: &[Diagnosis],
) -> Result<(), PipelineError> {
    if x.nrows() == 0 {
        return Err(PipelineError::ModelFailure {
            model: model.to_string(),
            cause: "training matrix has no rows".to_string(),
        });
    }
    if x.ncols() == 0 {
        return Err(PipelineError::ModelFailure {
            model: model.to_string(),
            cause: "training matrix has no feature columns".to_string(),
        });
    }
    if x.nrows() != y.len() {
        return Err(PipelineError::ModelFailure {
            model: model.to_string(),
            cause: format!("{} rows but {} labels", x.nrows(), y.len()),
        });
    }
    Ok(())
}
