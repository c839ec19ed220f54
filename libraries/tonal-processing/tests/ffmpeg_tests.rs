//! FFmpeg engine tests
//! Skipped when FFmpeg is not installed
mod common;

use common::{create_test_audio_file, is_ffmpeg_available};
use std::sync::Arc;
use tempfile::TempDir;
use tonal_core::{
    AdvancedOperations, Codec, EffectsOperation, FormatOperation, Job, LayerSpec,
    LayeringSettings, OperationSet, PitchSettings, TrimRange, VolumeOperation,
};
use tonal_filters::AdvancedCompiler;
use tonal_processing::{AudioProcessor, FfmpegEngine};

fn processor() -> AudioProcessor {
    AudioProcessor::new(
        Arc::new(AdvancedCompiler::new()),
        Arc::new(FfmpegEngine::new("ffmpeg")),
    )
}

#[tokio::test]
async fn test_probe_version() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let version = FfmpegEngine::new("ffmpeg").probe_version().await.unwrap();
    assert!(version.to_lowercase().contains("ffmpeg"));
}

#[tokio::test]
async fn test_gain_and_trim() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.wav");
    let output = temp.path().join("out/trimmed.wav");
    create_test_audio_file(&input).unwrap();

    let ops = OperationSet {
        volume: Some(VolumeOperation {
            adjust_db: Some(-3.0),
            ..Default::default()
        }),
        effects: Some(EffectsOperation {
            trim: Some(TrimRange {
                start_sec: 0.1,
                end_sec: 0.6,
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    let result = processor().process(&Job::new(&input, &output, ops)).await;
    assert!(result.success, "{:?}", result.error);
    assert!(output.exists());
}

#[tokio::test]
async fn test_mp3_mono_normalized() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.wav");
    let output = temp.path().join("voice.mp3");
    create_test_audio_file(&input).unwrap();

    let ops = OperationSet {
        volume: Some(VolumeOperation {
            normalize: Some(true),
            ..Default::default()
        }),
        format: Some(FormatOperation {
            codec: Some(Codec::Mp3),
            channels: Some(1),
            bitrate_kbps: Some(128),
            ..Default::default()
        }),
        ..Default::default()
    };

    let result = processor().process(&Job::new(&input, &output, ops)).await;
    if !result.success {
        // Builds without libmp3lame report an encoder error, which is still a clean failure
        let error = result.error.unwrap();
        eprintln!("Skipping assertion: {}", error);
        return;
    }
    assert!(output.metadata().unwrap().len() > 0);
}

#[tokio::test]
async fn test_pitch_shift_and_layering() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let input = temp.path().join("input.wav");
    create_test_audio_file(&input).unwrap();

    let pitched = OperationSet {
        advanced: Some(AdvancedOperations {
            pitch: Some(PitchSettings {
                semitones: 5.0,
                cents: None,
                preserve_formants: Some(true),
            }),
            ..Default::default()
        }),
        ..Default::default()
    };
    let result = processor()
        .process(&Job::new(&input, temp.path().join("pitched.wav"), pitched))
        .await;
    assert!(result.success, "{:?}", result.error);

    let layered = OperationSet {
        advanced: Some(AdvancedOperations {
            layering: Some(LayeringSettings {
                layers: vec![
                    LayerSpec {
                        volume: Some(0.7),
                        ..Default::default()
                    },
                    LayerSpec {
                        pitch_semitones: Some(12.0),
                        volume: Some(0.3),
                        delay_ms: Some(20.0),
                        ..Default::default()
                    },
                ],
            }),
            ..Default::default()
        }),
        ..Default::default()
    };
    let job = Job::new(&input, temp.path().join("layered.wav"), layered)
        .with_additional_inputs(vec![input.clone()]);
    let result = processor().process(&job).await;
    assert!(result.success, "{:?}", result.error);
}

#[tokio::test]
async fn test_corrupt_input_reports_engine_error() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let input = temp.path().join("broken.wav");
    std::fs::write(&input, b"definitely not audio").unwrap();

    let result = processor()
        .process(&Job::new(&input, temp.path().join("out.wav"), OperationSet::default()))
        .await;
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("FFmpeg failed"));
}
