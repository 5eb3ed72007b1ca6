//! Confusion-matrix evaluation of fitted classifiers.
//!
//! The matrix convention is fixed here once: the first index is the actual
//! diagnosis, the second the predicted one, and malignant is the positive
//! class. Every derived metric is a pure function of the matrix; zero
//! denominators surface as `Metric::Undefined` instead of an error, since a
//! small test partition can legitimately produce empty rows or columns.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::PipelineError;
use crate::models::classifier_trait::Classifier;
use crate::report::ModelEvaluation;

/// 2×2 contingency table over actual × predicted diagnoses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    counts: [[u64; Diagnosis::COUNT]; Diagnosis::COUNT],
}

impl ConfusionMatrix {
    pub fn new() -> ConfusionMatrix {
        ConfusionMatrix::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Diagnosis, Diagnosis)>) -> ConfusionMatrix {
        let mut matrix = ConfusionMatrix::new();
        for (actual, predicted) in pairs {
            matrix.record(actual, predicted);
        }
        matrix
    }

    pub fn record(&mut self, actual: Diagnosis, predicted: Diagnosis) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    pub fn count(&self, actual: Diagnosis, predicted: Diagnosis) -> u64 {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self) -> u64 {
        self.count(Diagnosis::Malignant, Diagnosis::Malignant)
    }

    pub fn true_negatives(&self) -> u64 {
        self.count(Diagnosis::Benign, Diagnosis::Benign)
    }

    pub fn false_positives(&self) -> u64 {
        self.count(Diagnosis::Benign, Diagnosis::Malignant)
    }

    pub fn false_negatives(&self) -> u64 {
        self.count(Diagnosis::Malignant, Diagnosis::Benign)
    }

    /// Row sum: how many records truly carry this diagnosis.
    pub fn actual_count(&self, diagnosis: Diagnosis) -> u64 {
        self.counts[diagnosis.index()].iter().sum()
    }

    /// Column sum: how many records the model assigned this diagnosis.
    pub fn predicted_count(&self, diagnosis: Diagnosis) -> u64 {
        self.counts.iter().map(|row| row[diagnosis.index()]).sum()
    }
}

impl Serialize for ConfusionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("ConfusionMatrix", 4)?;
        st.serialize_field("true_positives", &self.true_positives())?;
        st.serialize_field("false_negatives", &self.false_negatives())?;
        st.serialize_field("false_positives", &self.false_positives())?;
        st.serialize_field("true_negatives", &self.true_negatives())?;
        st.end()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:<18} {:>18} {:>20}", "", "predicted benign", "predicted malignant")?;
        for actual in [Diagnosis::Benign, Diagnosis::Malignant] {
            writeln!(
                f,
                "{:<18} {:>18} {:>20}",
                format!("actual {}", actual),
                self.count(actual, Diagnosis::Benign),
                self.count(actual, Diagnosis::Malignant)
            )?;
        }
        Ok(())
    }
}

/// A metric value, or the explicit zero-denominator marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Undefined,
}

impl Metric {
    fn ratio(numerator: u64, denominator: u64) -> Metric {
        if denominator == 0 {
            Metric::Undefined
        } else {
            Metric::Value(numerator as f64 / denominator as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{:.4}", v),
            Metric::Undefined => f.write_str("undefined"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::Undefined => serializer.serialize_none(),
        }
    }
}

/// All reported metrics, each a pure function of the confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub accuracy: Metric,
    pub sensitivity: Metric,
    pub specificity: Metric,
    pub ppv: Metric,
    pub npv: Metric,
    pub kappa: Metric,
    pub balanced_accuracy: Metric,
}

impl MetricsSummary {
    pub fn from_matrix(matrix: &ConfusionMatrix) -> MetricsSummary {
        let tp = matrix.true_positives();
        let tn = matrix.true_negatives();
        let fp = matrix.false_positives();
        let false_neg = matrix.false_negatives();

        let sensitivity = Metric::ratio(tp, tp + false_neg);
        let specificity = Metric::ratio(tn, tn + fp);
        let balanced_accuracy = match (sensitivity, specificity) {
            (Metric::Value(se), Metric::Value(sp)) => Metric::Value((se + sp) / 2.0),
            _ => Metric::Undefined,
        };

        MetricsSummary {
            accuracy: Metric::ratio(tp + tn, matrix.total()),
            sensitivity,
            specificity,
            ppv: Metric::ratio(tp, tp + fp),
            npv: Metric::ratio(tn, tn + false_neg),
            kappa: cohens_kappa(matrix),
            balanced_accuracy,
        }
    }
}

/// Cohen's kappa from the matrix marginals:
/// (observed agreement - chance agreement) / (1 - chance agreement).
fn cohens_kappa(matrix: &ConfusionMatrix) -> Metric {
    let total = matrix.total();
    if total == 0 {
        return Metric::Undefined;
    }
    let total_f = total as f64;

    let observed = (matrix.true_positives() + matrix.true_negatives()) as f64 / total_f;
    let mut expected = 0.0;
    for class in [Diagnosis::Benign, Diagnosis::Malignant] {
        let actual = matrix.actual_count(class) as f64;
        let predicted = matrix.predicted_count(class) as f64;
        expected += (actual * predicted) / (total_f * total_f);
    }

    let denominator = 1.0 - expected;
    if denominator.abs() < f64::EPSILON {
        return Metric::Undefined;
    }
    Metric::Value((observed - expected) / denominator)
}

/// Run a fitted model over the test set and derive matrix and metrics.
///
/// The matrix total always equals the test-set size; a model that returns
/// a different number of predictions than test rows is a `ModelFailure`.
pub fn evaluate(
    model: &dyn Classifier,
    test: &Dataset,
    threshold: f64,
) -> Result<ModelEvaluation, PipelineError> {
    let predictions = model.predict(&test.x, threshold)?;
    if predictions.len() != test.y.len() {
        return Err(PipelineError::ModelFailure {
            model: model.name().to_string(),
            cause: format!(
                "{} predictions for {} test records",
                predictions.len(),
                test.y.len()
            ),
        });
    }
    let matrix = ConfusionMatrix::from_pairs(
        test.y.iter().copied().zip(predictions.into_iter().map(|(label, _)| label)),
    );
    let metrics = MetricsSummary::from_matrix(&matrix);

    log::info!(
        "{}: accuracy {} over {} test records (threshold {})",
        model.name(),
        metrics.accuracy,
        matrix.total(),
        threshold
    );

    Ok(ModelEvaluation { model: model.name().to_string(), confusion_matrix: matrix, metrics })
}
