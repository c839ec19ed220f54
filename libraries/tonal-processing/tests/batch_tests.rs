//! Batch scheduler tests against a scripted engine
mod common;

use common::{create_inputs, FakeEngine};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use tonal_core::{Job, OperationSet, VolumeOperation};
use tonal_filters::AdvancedCompiler;
use tonal_processing::{
    AudioProcessor, BatchRequest, BatchScheduler, OutputSpec, ProcessingError, SourceSpec,
    CLEARED_MESSAGE,
};

fn scheduler(engine: Arc<FakeEngine>, concurrency: usize) -> BatchScheduler {
    let processor = AudioProcessor::new(Arc::new(AdvancedCompiler::new()), engine);
    BatchScheduler::new(processor, concurrency)
}

fn louder() -> OperationSet {
    OperationSet {
        volume: Some(VolumeOperation {
            adjust_db: Some(3.0),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn batch_request(input: &TempDir, output: &TempDir) -> BatchRequest {
    BatchRequest {
        source: SourceSpec::directory(input.path(), None),
        destination: OutputSpec::directory(output.path()),
        operations: louder(),
        overwrite: false,
    }
}

/// Poll until `check` holds or a generous deadline passes
async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_concurrency_one_runs_jobs_serially() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav", "c.wav"]);

    let engine = Arc::new(FakeEngine::new());
    let batch = scheduler(Arc::clone(&engine), 1)
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap();

    assert_eq!(engine.max_in_flight(), 1);
    assert_eq!(batch.results.len(), 3);
    assert_eq!(batch.total_files, 3);
    assert_eq!(
        batch.total_files,
        batch.successful_files + batch.failed_files
    );
    assert_eq!(batch.successful_files, 3);
}

#[tokio::test]
async fn test_concurrency_limit_allows_parallel_jobs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["1.wav", "2.wav", "3.wav", "4.wav", "5.wav"]);

    let engine = Arc::new(FakeEngine::new());
    scheduler(Arc::clone(&engine), 2)
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap();

    assert!(engine.max_in_flight() <= 2);
    assert_eq!(engine.call_count(), 5);
}

#[tokio::test]
async fn test_results_follow_discovery_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let inputs = create_inputs(input.path(), &["a.wav", "b.mp3", "sub/c.flac"]);

    let engine = Arc::new(FakeEngine::new());
    let batch = scheduler(engine, 3)
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap();

    let reported: Vec<_> = batch.results.iter().map(|r| r.input_path.clone()).collect();
    assert_eq!(reported, inputs);
    assert_eq!(
        batch.results[2].output_path,
        output.path().join("sub").join("c_processed.flac")
    );
    assert!(batch.results.iter().all(|r| r.operations == louder()));
}

#[tokio::test]
async fn test_one_failure_does_not_abort_others() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav", "c.wav"]);

    let engine = Arc::new(FakeEngine::new().failing_on("b_"));
    let batch = scheduler(engine, 2)
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap();

    assert_eq!(batch.successful_files, 2);
    assert_eq!(batch.failed_files, 1);
    let failed = &batch.results[1];
    assert!(!failed.success);
    assert!(failed.error.as_deref().unwrap().contains("scripted failure"));
}

#[tokio::test]
async fn test_no_files_found_fails_the_call() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("readme.txt"), b"not audio").unwrap();

    let err = scheduler(Arc::new(FakeEngine::new()), 3)
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessingError::NoFilesFound { .. }));
}

#[tokio::test]
async fn test_output_format_changes_extension() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["voice.wav"]);

    let mut request = batch_request(&input, &output);
    request.destination =
        OutputSpec::directory(output.path()).with_extension(Some("mp3".to_string()));

    let engine = Arc::new(FakeEngine::new());
    let batch = scheduler(Arc::clone(&engine), 1)
        .process_batch(request)
        .await
        .unwrap();

    assert_eq!(
        batch.results[0].output_path,
        output.path().join("voice_processed.mp3")
    );
    assert_eq!(engine.calls()[0].output, batch.results[0].output_path);
}

#[tokio::test]
async fn test_pause_holds_jobs_until_resume() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav", "c.wav"]);

    let engine = Arc::new(FakeEngine::new());
    let scheduler = scheduler(Arc::clone(&engine), 2);
    scheduler.pause().await;

    let running = {
        let scheduler = scheduler.clone();
        let request = batch_request(&input, &output);
        tokio::spawn(async move { scheduler.process_batch(request).await })
    };

    wait_until(|| {
        let scheduler = scheduler.clone();
        async move { scheduler.status().await.pending == 3 }
    })
    .await;

    tokio::time::sleep(Duration::from_millis(30)).await;
    let status = scheduler.status().await;
    assert!(status.paused);
    assert_eq!(status.active, 0);
    assert_eq!(engine.call_count(), 0);

    scheduler.resume().await;
    let batch = running.await.unwrap().unwrap();
    assert_eq!(batch.successful_files, 3);
    assert!(!scheduler.status().await.paused);
}

#[tokio::test]
async fn test_pause_lets_running_job_finish() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav", "c.wav"]);

    let gate = Arc::new(Notify::new());
    let engine = Arc::new(FakeEngine::new().gated(Arc::clone(&gate)));
    let scheduler = scheduler(Arc::clone(&engine), 1);

    let running = {
        let scheduler = scheduler.clone();
        let request = batch_request(&input, &output);
        tokio::spawn(async move { scheduler.process_batch(request).await })
    };

    wait_until(|| {
        let scheduler = scheduler.clone();
        let engine = Arc::clone(&engine);
        async move {
            let status = scheduler.status().await;
            status.active == 1 && status.pending == 2 && engine.call_count() == 1
        }
    })
    .await;

    // Pause while the first job is still rendering, then let it complete
    scheduler.pause().await;
    gate.notify_one();

    wait_until(|| {
        let scheduler = scheduler.clone();
        async move { scheduler.status().await.active == 0 }
    })
    .await;
    assert!(output.path().join("a_processed.wav").exists());

    tokio::time::sleep(Duration::from_millis(30)).await;
    let status = scheduler.status().await;
    assert!(status.paused);
    assert_eq!(status.active, 0);
    assert_eq!(status.pending, 2);
    assert_eq!(engine.call_count(), 1);

    scheduler.resume().await;
    for started in 2..=3 {
        wait_until(|| {
            let engine = Arc::clone(&engine);
            async move { engine.call_count() == started }
        })
        .await;
        gate.notify_one();
    }

    let batch = running.await.unwrap().unwrap();
    assert_eq!(batch.successful_files, 3);
    assert!(batch.results[0].success);
    let order: Vec<_> = engine
        .calls()
        .iter()
        .map(|call| call.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(order, ["a_processed.wav", "b_processed.wav", "c_processed.wav"]);
}

#[tokio::test]
async fn test_clear_fails_queued_jobs_only() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav", "c.wav"]);

    let gate = Arc::new(Notify::new());
    let engine = Arc::new(FakeEngine::new().gated(Arc::clone(&gate)));
    let scheduler = scheduler(Arc::clone(&engine), 1);

    let running = {
        let scheduler = scheduler.clone();
        let request = batch_request(&input, &output);
        tokio::spawn(async move { scheduler.process_batch(request).await })
    };

    wait_until(|| {
        let scheduler = scheduler.clone();
        async move {
            let status = scheduler.status().await;
            status.active == 1 && status.pending == 2
        }
    })
    .await;

    assert_eq!(scheduler.clear().await, 2);
    gate.notify_one();

    let batch = running.await.unwrap().unwrap();
    assert_eq!(batch.total_files, 3);
    assert_eq!(batch.successful_files, 1);
    assert!(batch.results[0].success);
    for cleared in &batch.results[1..] {
        assert_eq!(cleared.error.as_deref(), Some(CLEARED_MESSAGE));
    }
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn test_panicking_job_is_reported_as_aborted() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    create_inputs(input.path(), &["a.wav", "b.wav"]);

    let engine = Arc::new(FakeEngine::new().panicking_on("a_"));
    let scheduler = scheduler(engine, 1);
    let batch = scheduler
        .process_batch(batch_request(&input, &output))
        .await
        .unwrap();

    let aborted = batch.results[0].error.as_deref().unwrap();
    assert!(aborted.contains("aborted"), "{}", aborted);
    assert_ne!(aborted, CLEARED_MESSAGE);
    assert!(batch.results[1].success);
    assert_eq!(scheduler.status().await.pending, 0);
}

#[tokio::test]
async fn test_overwrite_policy() {
    let temp = TempDir::new().unwrap();
    let inputs = create_inputs(temp.path(), &["in.wav"]);
    let existing = temp.path().join("out.wav");
    std::fs::write(&existing, b"previous").unwrap();

    let engine = Arc::new(FakeEngine::new());
    let scheduler = scheduler(Arc::clone(&engine), 1);

    let refused = scheduler
        .process_one(Job::new(&inputs[0], &existing, louder()))
        .await;
    assert!(!refused.success);
    assert!(refused.error.as_deref().unwrap().contains("already exists"));
    assert_eq!(engine.call_count(), 0);
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous");

    let replaced = scheduler
        .process_one(Job::new(&inputs[0], &existing, louder()).with_overwrite(true))
        .await;
    assert!(replaced.success, "{:?}", replaced.error);
    assert_eq!(std::fs::read(&existing).unwrap(), b"rendered");
}

#[tokio::test]
async fn test_missing_input_never_reaches_engine() {
    let temp = TempDir::new().unwrap();
    let engine = Arc::new(FakeEngine::new());

    let result = scheduler(Arc::clone(&engine), 1)
        .process_one(Job::new(
            temp.path().join("missing.wav"),
            temp.path().join("out.wav"),
            louder(),
        ))
        .await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("not found"));
    assert_eq!(engine.call_count(), 0);
}
