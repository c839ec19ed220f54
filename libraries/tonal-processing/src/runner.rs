//! Single-job runner
//!
//! Drives one [`Job`] through
//! `Created → InputValidated → OutputPrepared → Compiled → Executed` and
//! always ends in exactly one [`ProcessingResult`].

use crate::discovery::is_audio_file;
use crate::engine::{AudioEngine, RenderRequest};
use crate::{ProcessingError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tonal_core::{Job, ProcessingResult};
use tonal_filters::{CommandPlan, OperationCompiler};

/// Job lifecycle; a failure at any step ends the job without running later steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    InputValidated,
    OutputPrepared,
    Compiled,
    Executed,
    Succeeded,
    Failed,
}

/// Runs jobs with an injected compiler and engine
#[derive(Clone)]
pub struct AudioProcessor {
    compiler: Arc<dyn OperationCompiler>,
    engine: Arc<dyn AudioEngine>,
}

impl AudioProcessor {
    pub fn new(compiler: Arc<dyn OperationCompiler>, engine: Arc<dyn AudioEngine>) -> Self {
        Self { compiler, engine }
    }

    pub fn compiler(&self) -> &dyn OperationCompiler {
        self.compiler.as_ref()
    }

    /// Run one job to a terminal state
    ///
    /// Never returns an error: every failure becomes a failed result.
    pub async fn process(&self, job: &Job) -> ProcessingResult {
        let started = Instant::now();
        tracing::info!(
            input = %job.input_path.display(),
            output = %job.output_path.display(),
            compiler = self.compiler.name(),
            "Processing job"
        );

        let mut state = JobState::Created;
        let outcome = self.run(job, &mut state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                advance(&mut state, JobState::Succeeded);
                tracing::info!(
                    output = %job.output_path.display(),
                    elapsed_ms,
                    "Job succeeded"
                );
                ProcessingResult::succeeded(job, elapsed_ms)
            }
            Err(e) => {
                let failed_after = state;
                advance(&mut state, JobState::Failed);
                tracing::warn!(
                    input = %job.input_path.display(),
                    ?failed_after,
                    error = %e,
                    "Job failed"
                );
                ProcessingResult::failed(job, elapsed_ms, e.to_string())
            }
        }
    }

    async fn run(&self, job: &Job, state: &mut JobState) -> Result<()> {
        for input in job.inputs() {
            validate_input(input).await?;
        }
        advance(state, JobState::InputValidated);

        prepare_output(&job.output_path, job.overwrite).await?;
        advance(state, JobState::OutputPrepared);

        let plan = self.compile(job);
        advance(state, JobState::Compiled);

        let request = RenderRequest {
            inputs: job.inputs().cloned().collect(),
            output: job.output_path.clone(),
            plan,
        };
        self.engine.render(&request).await?;
        advance(state, JobState::Executed);

        Ok(())
    }

    fn compile(&self, job: &Job) -> CommandPlan {
        let plan = self
            .compiler
            .compile_for_inputs(&job.operations, job.input_count());
        tracing::debug!(
            filters = ?plan.filters,
            graph = ?plan.filter_complex(),
            "Compiled command plan"
        );
        plan
    }
}

fn advance(state: &mut JobState, next: JobState) {
    tracing::trace!(from = ?*state, to = ?next, "Job state");
    *state = next;
}

/// Existing, regular, readable, supported-format file
async fn validate_input(path: &Path) -> Result<()> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProcessingError::InputNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(ProcessingError::Io(e)),
    };

    if !metadata.is_file() {
        return Err(ProcessingError::NotAFile(path.to_path_buf()));
    }

    tokio::fs::File::open(path)
        .await
        .map_err(|source| ProcessingError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    if !is_audio_file(path) {
        return Err(ProcessingError::UnsupportedFormat(format!(
            "{} (expected one of: {})",
            path.display(),
            crate::discovery::SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    Ok(())
}

/// Create the destination directory, check it is writable, apply the overwrite policy
async fn prepare_output(path: &Path, overwrite: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ProcessingError::OutputNotWritable {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

    check_writable(&dir).await?;

    if !overwrite && tokio::fs::try_exists(path).await? {
        return Err(ProcessingError::OutputExists(path.to_path_buf()));
    }

    Ok(())
}

/// Create and remove a scratch file in `dir`
async fn check_writable(dir: &Path) -> Result<()> {
    let target = dir.to_path_buf();
    let created = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(".tonal-")
            .tempfile_in(&target)
            .map(drop)
    })
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    created.map_err(|e| ProcessingError::OutputNotWritable {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}
