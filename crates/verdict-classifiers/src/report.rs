//! Side-by-side comparison of evaluated models.
//!
//! Pure data assembly: the report carries each model's confusion matrix and
//! metrics untouched. `Display` renders a text table, `Serialize` feeds the
//! JSON output format.

use std::fmt;

use serde::Serialize;

use crate::evaluation::{ConfusionMatrix, MetricsSummary};

/// One model's evaluation results.
#[derive(Debug, Clone, Serialize)]
pub struct ModelEvaluation {
    pub model: String,
    pub confusion_matrix: ConfusionMatrix,
    pub metrics: MetricsSummary,
}

/// All evaluated models, in training order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonReport {
    pub models: Vec<ModelEvaluation>,
}

impl ComparisonReport {
    pub fn new() -> ComparisonReport {
        ComparisonReport::default()
    }

    pub fn push(&mut self, evaluation: ModelEvaluation) {
        self.models.push(evaluation);
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>10} {:>12} {:>12} {:>10} {:>10} {:>10} {:>10}",
            "model", "accuracy", "sensitivity", "specificity", "ppv", "npv", "kappa", "balanced"
        )?;
        for eval in &self.models {
            let m = &eval.metrics;
            writeln!(
                f,
                "{:<16} {:>10} {:>12} {:>12} {:>10} {:>10} {:>10} {:>10}",
                eval.model,
                m.accuracy.to_string(),
                m.sensitivity.to_string(),
                m.specificity.to_string(),
                m.ppv.to_string(),
                m.npv.to_string(),
                m.kappa.to_string(),
                m.balanced_accuracy.to_string()
            )?;
        }

        for eval in &self.models {
            writeln!(f)?;
            writeln!(f, "{}", eval.model)?;
            write!(f, "{}", eval.confusion_matrix)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Diagnosis;

    fn sample_report() -> ComparisonReport {
        let mut matrix = ConfusionMatrix::new();
        for _ in 0..53 {
            matrix.record(Diagnosis::Benign, Diagnosis::Benign);
        }
        matrix.record(Diagnosis::Benign, Diagnosis::Malignant);
        for _ in 0..2 {
            matrix.record(Diagnosis::Malignant, Diagnosis::Benign);
        }
        for _ in 0..44 {
            matrix.record(Diagnosis::Malignant, Diagnosis::Malignant);
        }

        let mut report = ComparisonReport::new();
        report.push(ModelEvaluation {
            model: "neural-net".to_string(),
            confusion_matrix: matrix,
            metrics: MetricsSummary::from_matrix(&matrix),
        });
        report.push(ModelEvaluation {
            model: "random-forest".to_string(),
            confusion_matrix: matrix,
            metrics: MetricsSummary::from_matrix(&matrix),
        });
        report
    }

    #[test]
    fn display_lists_every_model_with_headers() {
        let text = sample_report().to_string();
        assert!(text.contains("model"), "missing table header:\n{}", text);
        assert!(text.contains("neural-net"), "missing first model:\n{}", text);
        assert!(text.contains("random-forest"), "missing second model:\n{}", text);
        assert!(text.contains("predicted malignant"), "missing matrix block:\n{}", text);
        assert!(text.contains("0.97"), "expected accuracy value in:\n{}", text);
    }

    #[test]
    fn json_shape_carries_matrix_cells_and_metrics() {
        let value = serde_json::to_value(sample_report()).unwrap();
        let first = &value["models"][0];
        assert_eq!(first["model"], "neural-net");
        assert_eq!(first["confusion_matrix"]["true_positives"], 44);
        assert_eq!(first["confusion_matrix"]["false_negatives"], 2);
        assert!(first["metrics"]["accuracy"].is_number());
        assert!(first["metrics"]["kappa"].is_number());
    }
}
