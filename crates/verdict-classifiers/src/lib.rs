//! verdict-classifiers: a tabular binary-diagnosis pipeline.
//!
//! This crate loads the Wisconsin Diagnostic Breast Cancer table (or any
//! dataset matching its schema), rescales features, splits records into
//! stratified train/test partitions and compares two classifier backends, a
//! feed-forward network and a bagged decision-tree ensemble, on the same
//! test data. Each stage is an independently testable module; `pipeline`
//! chains them.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod splitter;
