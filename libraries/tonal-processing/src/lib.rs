//! Tonal audio processing
//!
//! Runs compiled operation sets through an external audio engine.
//!
//! # Architecture
//!
//! - `engine`: the [`AudioEngine`] port and its FFmpeg implementation
//! - `runner`: single-job state machine ([`AudioProcessor`])
//! - `queue`: bounded-concurrency FIFO with pause/resume/clear
//! - `batch`: discovery, fan-out and ordered aggregation ([`BatchScheduler`])
//! - `discovery` / `naming`: source resolution and output path derivation

mod error;

pub mod batch;
pub mod discovery;
pub mod engine;
pub mod naming;
pub mod queue;
pub mod runner;

pub use batch::{BatchRequest, BatchScheduler, CLEARED_MESSAGE};
pub use discovery::{is_audio_file, SourceSpec, DEFAULT_PATTERN, SUPPORTED_EXTENSIONS};
pub use engine::{AudioEngine, FfmpegEngine, RenderRequest};
pub use error::ProcessingError;
pub use naming::{OutputSpec, DEFAULT_OUTPUT_SUFFIX};
pub use queue::{JobQueue, DEFAULT_CONCURRENCY};
pub use runner::{AudioProcessor, JobState};

pub type Result<T> = std::result::Result<T, ProcessingError>;
