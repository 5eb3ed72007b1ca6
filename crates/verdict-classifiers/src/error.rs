use std::error::Error;
use std::fmt;

/// Errors raised by the diagnosis pipeline, one variant per failure class.
#[derive(Debug)]
pub enum PipelineError {
    /// The dataset locator could not be opened or fetched.
    SourceUnavailable { source: String, cause: String },
    /// A row did not match the declared column schema.
    SchemaMismatch { row: usize, detail: String },
    /// Fewer than two diagnosis classes were observed. Raised at prepare
    /// time for the whole dataset and at split time for a partition, so the
    /// variant carries its raise site.
    InsufficientClasses { observed: usize, stage: &'static str },
    /// The requested train fraction is outside the open interval (0, 1).
    InvalidFraction { value: f64 },
    /// A model backend failed during fitting or prediction.
    ModelFailure { model: String, cause: String },
}

impl PipelineError {
    /// Pipeline stage the error originates from, for log and report context.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::SourceUnavailable { .. } => "load",
            PipelineError::SchemaMismatch { .. } => "load",
            PipelineError::InsufficientClasses { stage, .. } => *stage,
            PipelineError::InvalidFraction { .. } => "split",
            PipelineError::ModelFailure { .. } => "train",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::SourceUnavailable { source, cause } => {
                write!(f, "[{}] dataset source {} is unavailable: {}", self.stage(), source, cause)
            }
            PipelineError::SchemaMismatch { row, detail } => {
                write!(f, "[{}] row {} does not match the column schema: {}", self.stage(), row, detail)
            }
            PipelineError::InsufficientClasses { observed, .. } => {
                write!(
                    f,
                    "[{}] need both diagnosis classes, observed {}",
                    self.stage(),
                    observed
                )
            }
            PipelineError::InvalidFraction { value } => {
                write!(f, "[{}] train fraction must lie in (0, 1), got {}", self.stage(), value)
            }
            PipelineError::ModelFailure { model, cause } => {
                write!(f, "[{}] {} failed: {}", self.stage(), model, cause)
            }
        }
    }
}

impl Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_stage_and_detail() {
        let err = PipelineError::InvalidFraction { value: 1.5 };
        let text = err.to_string();
        assert!(text.contains("[split]"), "stage missing from: {}", text);
        assert!(text.contains("1.5"), "offending value missing from: {}", text);
    }

    #[test]
    fn stages_cover_every_variant() {
        let samples = [
            PipelineError::SourceUnavailable {
                source: "wdbc.data".into(),
                cause: "no such file".into(),
            },
            PipelineError::SchemaMismatch { row: 3, detail: "expected 32 columns, found 31".into() },
            PipelineError::InsufficientClasses { observed: 1, stage: "prepare" },
            PipelineError::InvalidFraction { value: 0.0 },
            PipelineError::ModelFailure { model: "neural-net".into(), cause: "shape".into() },
        ];
        let stages: Vec<&str> = samples.iter().map(|e| e.stage()).collect();
        assert_eq!(stages, ["load", "load", "prepare", "split", "train"]);
    }

    #[test]
    fn insufficient_classes_carries_its_raise_site() {
        let at_prepare = PipelineError::InsufficientClasses { observed: 1, stage: "prepare" };
        assert_eq!(at_prepare.stage(), "prepare");
        assert!(at_prepare.to_string().contains("[prepare]"), "got: {}", at_prepare);

        let at_split = PipelineError::InsufficientClasses { observed: 1, stage: "split" };
        assert_eq!(at_split.stage(), "split");
        assert!(at_split.to_string().contains("[split]"), "got: {}", at_split);
    }
}
