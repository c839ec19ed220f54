//! Jobs, per-job results and batch aggregates

use crate::operations::OperationSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One request to transform one input into one output
///
/// Layering jobs carry their extra sources in `additional_inputs`; the
/// primary `input_path` is always input 0 of the filter graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub input_path: PathBuf,
    pub additional_inputs: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub operations: OperationSet,
    pub overwrite: bool,
}

impl Job {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        operations: OperationSet,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            additional_inputs: Vec::new(),
            output_path: output_path.into(),
            operations,
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_additional_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.additional_inputs = inputs;
        self
    }

    /// All inputs in filter-graph order
    pub fn inputs(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.input_path).chain(self.additional_inputs.iter())
    }

    pub fn input_count(&self) -> usize {
        1 + self.additional_inputs.len()
    }
}

/// Outcome of exactly one job, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub success: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub processing_time_ms: u64,
    pub operations: OperationSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    pub fn succeeded(job: &Job, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            input_path: job.input_path.clone(),
            output_path: job.output_path.clone(),
            processing_time_ms,
            operations: job.operations.clone(),
            error: None,
        }
    }

    pub fn failed(job: &Job, processing_time_ms: u64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            input_path: job.input_path.clone(),
            output_path: job.output_path.clone(),
            processing_time_ms,
            operations: job.operations.clone(),
            error: Some(error.into()),
        }
    }
}

/// Aggregate over every job dispatched by one batch call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    /// In discovery order, not completion order
    pub results: Vec<ProcessingResult>,
    /// Wall-clock span of the whole batch
    pub total_processing_time_ms: u64,
}

impl BatchResult {
    pub fn from_results(results: Vec<ProcessingResult>, total_processing_time_ms: u64) -> Self {
        let successful_files = results.iter().filter(|r| r.success).count();
        Self {
            total_files: results.len(),
            successful_files,
            failed_files: results.len() - successful_files,
            results,
            total_processing_time_ms,
        }
    }
}

/// Live queue introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    /// Jobs waiting for a worker slot
    pub pending: usize,
    /// Jobs currently executing
    pub active: usize,
    pub paused: bool,
    pub concurrency: usize,
}
