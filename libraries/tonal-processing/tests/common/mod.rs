//! Common test utilities: a scripted engine and WAV fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tonal_processing::{AudioEngine, ProcessingError, RenderRequest, Result};

/// Engine double that records every render and never touches FFmpeg
#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<RenderRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    /// Fail any render whose output file name contains this text
    fail_when: Option<String>,
    /// Panic in any render whose output file name contains this text
    panic_when: Option<String>,
    /// Block every render until notified
    gate: Option<Arc<Notify>>,
    delay: Duration,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(10),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_when = Some(needle.to_string());
        self
    }

    pub fn panicking_on(mut self, needle: &str) -> Self {
        self.panic_when = Some(needle.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RenderRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn run(&self, request: &RenderRequest) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        tokio::time::sleep(self.delay).await;

        let name = request
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(needle) = &self.panic_when {
            assert!(!name.contains(needle.as_str()), "scripted panic for {}", name);
        }
        if let Some(needle) = &self.fail_when {
            if name.contains(needle.as_str()) {
                return Err(ProcessingError::engine(format!("scripted failure for {}", name)));
            }
        }

        tokio::fs::write(&request.output, b"rendered").await?;
        Ok(())
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn render(&self, request: &RenderRequest) -> Result<()> {
        self.calls.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.run(request).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Check if FFmpeg is available
pub async fn is_ffmpeg_available() -> bool {
    tokio::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Write a 1-second silent 16-bit mono WAV file
pub fn create_test_audio_file(path: &Path) -> std::io::Result<()> {
    let sample_rate: u32 = 44100;
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let data_size = sample_rate * u32::from(bits_per_sample / 8) * u32::from(num_channels);

    let mut wav = Vec::new();

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * u32::from(num_channels) * u32::from(bits_per_sample / 8);
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    let block_align = num_channels * (bits_per_sample / 8);
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk (silence)
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(wav.len() + data_size as usize, 0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, wav)
}

/// Create `names` as silent WAV files under `dir`
pub fn create_inputs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            create_test_audio_file(&path).unwrap();
            path
        })
        .collect()
}
