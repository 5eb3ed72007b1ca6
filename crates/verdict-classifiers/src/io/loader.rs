//! Headerless diagnosis CSV reader.
//!
//! The WDBC distribution ships without a header row, so the column layout is
//! supplied externally through `ColumnSchema`. Every row must carry exactly
//! one identifier, one label token and one value per feature column.
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Where the dataset lives. `parse` treats anything starting with
/// `http://` or `https://` as a URL and everything else as a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    LocalPath(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(locator: &str) -> DataSource {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            DataSource::Url(locator.to_string())
        } else {
            DataSource::LocalPath(PathBuf::from(locator))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSource::LocalPath(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Externally supplied header for the headerless file: identifier column,
/// label column, then the feature columns in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub id_column: String,
    pub label_column: String,
    pub feature_columns: Vec<String>,
}

impl ColumnSchema {
    /// Canonical Wisconsin Diagnostic Breast Cancer layout: a record id, the
    /// B/M diagnosis, then 30 measurements (10 cell-nucleus features, each
    /// as mean, standard error and worst value).
    pub fn wdbc() -> ColumnSchema {
        const BASES: [&str; 10] = [
            "radius",
            "texture",
            "perimeter",
            "area",
            "smoothness",
            "compactness",
            "concavity",
            "concave_points",
            "symmetry",
            "fractal_dimension",
        ];
        let mut feature_columns = Vec::with_capacity(30);
        for suffix in ["mean", "se", "worst"] {
            for base in BASES {
                feature_columns.push(format!("{}_{}", base, suffix));
            }
        }
        ColumnSchema {
            id_column: "id".to_string(),
            label_column: "diagnosis".to_string(),
            feature_columns,
        }
    }

    pub fn n_features(&self) -> usize {
        self.feature_columns.len()
    }

    /// Total columns a row must carry: id + label + features.
    pub fn width(&self) -> usize {
        2 + self.feature_columns.len()
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        ColumnSchema::wdbc()
    }
}

/// Parsed rows ready for preprocessing: identifiers and label tokens kept
/// verbatim, features as an n × d matrix in schema column order.
#[derive(Debug)]
pub struct RawTable {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub x: Array2<f32>,
    pub feature_names: Vec<String>,
}

impl RawTable {
    pub fn n_records(&self) -> usize {
        self.labels.len()
    }
}

/// Read a dataset with the canonical WDBC schema.
pub fn load_wdbc(source: &DataSource) -> Result<RawTable, PipelineError> {
    load(source, &ColumnSchema::wdbc())
}

/// Read a dataset from a local path or URL against the given schema.
///
/// Unreachable sources map to `SourceUnavailable`; rows with the wrong
/// width or non-numeric feature cells map to `SchemaMismatch` carrying the
/// 1-based row number.
pub fn load(source: &DataSource, schema: &ColumnSchema) -> Result<RawTable, PipelineError> {
    log::debug!("loading dataset from {}", source);
    match source {
        DataSource::LocalPath(path) => read_local(path, schema, source),
        DataSource::Url(url) => read_url(url, schema, source),
    }
}

fn read_local(
    path: &Path,
    schema: &ColumnSchema,
    source: &DataSource,
) -> Result<RawTable, PipelineError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::SourceUnavailable {
            source: source.to_string(),
            cause: e.to_string(),
        })?;
    read_table(reader, schema, source)
}

fn read_url(
    url: &str,
    schema: &ColumnSchema,
    source: &DataSource,
) -> Result<RawTable, PipelineError> {
    let body = fetch_url(url).map_err(|e| PipelineError::SourceUnavailable {
        source: source.to_string(),
        cause: e.to_string(),
    })?;
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    read_table(reader, schema, source)
}

fn fetch_url(url: &str) -> Result<String, reqwest::Error> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    response.text()
}

fn read_table<R: Read>(
    mut reader: csv::Reader<R>,
    schema: &ColumnSchema,
    source: &DataSource,
) -> Result<RawTable, PipelineError> {
    let n_features = schema.n_features();
    let mut ids = Vec::new();
    let mut labels = Vec::new();
    let mut features: Vec<f32> = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.map_err(|e| PipelineError::SourceUnavailable {
            source: source.to_string(),
            cause: format!("read failed at row {}: {}", row, e),
        })?;

        if record.len() != schema.width() {
            return Err(PipelineError::SchemaMismatch {
                row,
                detail: format!("expected {} columns, found {}", schema.width(), record.len()),
            });
        }

        ids.push(record[0].trim().to_string());
        labels.push(record[1].trim().to_string());

        for (offset, value) in record.iter().skip(2).enumerate() {
            let parsed: f32 = value.trim().parse().map_err(|_| PipelineError::SchemaMismatch {
                row,
                detail: format!(
                    "feature '{}' is not numeric: '{}'",
                    schema.feature_columns[offset], value
                ),
            })?;
            features.push(parsed);
        }
    }

    let n_records = labels.len();
    let x = Array2::from_shape_vec((n_records, n_features), features).map_err(|e| {
        PipelineError::SchemaMismatch { row: n_records, detail: e.to_string() }
    })?;

    log::info!("loaded {} records with {} feature columns from {}", n_records, n_features, source);

    Ok(RawTable { ids, labels, x, feature_names: schema.feature_columns.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wdbc_schema_lists_thirty_features() {
        let schema = ColumnSchema::wdbc();
        assert_eq!(schema.n_features(), 30);
        assert_eq!(schema.width(), 32);
        assert_eq!(schema.feature_columns[0], "radius_mean");
        assert_eq!(schema.feature_columns[10], "radius_se");
        assert_eq!(schema.feature_columns[29], "fractal_dimension_worst");
    }

    #[test]
    fn source_parse_detects_urls() {
        assert_eq!(
            DataSource::parse("https://example.org/wdbc.data"),
            DataSource::Url("https://example.org/wdbc.data".to_string())
        );
        assert_eq!(
            DataSource::parse("data/wdbc.data"),
            DataSource::LocalPath(PathBuf::from("data/wdbc.data"))
        );
    }
}
