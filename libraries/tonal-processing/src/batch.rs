//! Batch scheduler
//!
//! Fans jobs out over the shared [`JobQueue`] and gathers their results in
//! submission order, whatever order they finish in.

use crate::discovery::SourceSpec;
use crate::naming::OutputSpec;
use crate::queue::JobQueue;
use crate::runner::AudioProcessor;
use crate::Result;
use std::time::Instant;
use tokio::sync::oneshot;
use tonal_core::{BatchResult, Job, OperationSet, ProcessingResult, QueueStatus};

/// Error recorded for a job dropped from the queue before it started
pub const CLEARED_MESSAGE: &str = "Job was cleared from the queue before starting";

/// One operation set applied to every discovered source file
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source: SourceSpec,
    pub destination: OutputSpec,
    pub operations: OperationSet,
    pub overwrite: bool,
}

#[derive(Clone)]
pub struct BatchScheduler {
    processor: AudioProcessor,
    queue: JobQueue,
}

impl BatchScheduler {
    pub fn new(processor: AudioProcessor, concurrency: usize) -> Self {
        Self {
            processor,
            queue: JobQueue::new(concurrency),
        }
    }

    pub fn processor(&self) -> &AudioProcessor {
        &self.processor
    }

    /// Run one job through the queue
    pub async fn process_one(&self, job: Job) -> ProcessingResult {
        let rx = self.enqueue(&job).await;
        resolve(&job, rx).await
    }

    /// Run every job through the queue; results are in `jobs` order
    pub async fn process_all(&self, jobs: Vec<Job>) -> Vec<ProcessingResult> {
        let mut waiting = Vec::with_capacity(jobs.len());
        for job in jobs {
            let rx = self.enqueue(&job).await;
            waiting.push((job, rx));
        }

        let mut results = Vec::with_capacity(waiting.len());
        for (job, rx) in waiting {
            results.push(resolve(&job, rx).await);
        }
        results
    }

    async fn enqueue(&self, job: &Job) -> oneshot::Receiver<Result<ProcessingResult>> {
        let processor = self.processor.clone();
        let job = job.clone();
        self.queue
            .submit(async move { processor.process(&job).await })
            .await
    }

    /// Discover sources, derive outputs and run one job per file
    ///
    /// Fails only when discovery finds nothing or the pattern is invalid;
    /// per-file failures are reported inside the result.
    pub async fn process_batch(&self, request: BatchRequest) -> Result<BatchResult> {
        let started = Instant::now();
        let files = request.source.discover()?;
        let root = request.source.root();

        tracing::info!(files = files.len(), "Starting batch");

        let jobs: Vec<Job> = files
            .iter()
            .map(|input| {
                let output = request.destination.derive(input, root);
                Job::new(input.clone(), output, request.operations.clone())
                    .with_overwrite(request.overwrite)
            })
            .collect();

        let results = self.process_all(jobs).await;
        let batch = BatchResult::from_results(results, started.elapsed().as_millis() as u64);

        tracing::info!(
            total = batch.total_files,
            successful = batch.successful_files,
            failed = batch.failed_files,
            elapsed_ms = batch.total_processing_time_ms,
            "Batch complete"
        );
        Ok(batch)
    }

    pub async fn status(&self) -> QueueStatus {
        self.queue.status().await
    }

    pub async fn pause(&self) {
        self.queue.pause().await;
    }

    pub async fn resume(&self) {
        self.queue.resume().await;
    }

    pub async fn clear(&self) -> usize {
        self.queue.clear().await
    }
}

/// A dropped sender means the job never started; a panic is reported as such
async fn resolve(job: &Job, rx: oneshot::Receiver<Result<ProcessingResult>>) -> ProcessingResult {
    match rx.await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => ProcessingResult::failed(job, 0, e.to_string()),
        Err(_) => ProcessingResult::failed(job, 0, CLEARED_MESSAGE),
    }
}
