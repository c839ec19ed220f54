//! Common test utilities: a recording engine, app state and WAV fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tonal_processing::{AudioEngine, RenderRequest, Result};
use tonal_server::AppState;

/// Engine double that records every render and writes a placeholder output
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<RenderRequest>>,
    /// Block every render until notified
    gate: Option<Arc<Notify>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RenderRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioEngine for RecordingEngine {
    async fn render(&self, request: &RenderRequest) -> Result<()> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        tokio::fs::write(&request.output, b"rendered").await?;
        Ok(())
    }
}

/// App state over `engine` with concurrency 2
pub fn test_state(engine: Arc<RecordingEngine>) -> AppState {
    AppState::with_engine(engine, 2, "_processed")
}

/// Write a short silent 16-bit mono WAV file
pub fn create_test_audio_file(path: &Path) {
    let sample_rate: u32 = 8000;
    let data_size: u32 = sample_rate * 2;

    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(wav.len() + data_size as usize, 0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, wav).unwrap();
}
