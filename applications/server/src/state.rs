/// Shared application state
use crate::config::ServerConfig;
use std::sync::Arc;
use tonal_filters::AdvancedCompiler;
use tonal_processing::{AudioEngine, AudioProcessor, BatchScheduler, FfmpegEngine};

/// Application state shared by every transport and tool call
#[derive(Clone)]
pub struct AppState {
    pub scheduler: BatchScheduler,
    pub output_suffix: String,
}

impl AppState {
    /// Wire the FFmpeg engine and the advanced compiler from configuration
    pub fn new(config: &ServerConfig) -> Self {
        let engine = FfmpegEngine::new(config.engine.ffmpeg_path.clone())
            .with_timeout(config.engine.timeout());

        Self::with_engine(
            Arc::new(engine),
            config.processing.concurrency,
            config.processing.default_output_suffix.clone(),
        )
    }

    pub fn with_engine(
        engine: Arc<dyn AudioEngine>,
        concurrency: usize,
        output_suffix: impl Into<String>,
    ) -> Self {
        let processor = AudioProcessor::new(Arc::new(AdvancedCompiler::new()), engine);
        Self {
            scheduler: BatchScheduler::new(processor, concurrency),
            output_suffix: output_suffix.into(),
        }
    }
}
