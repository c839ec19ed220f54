//! Tonal Core
//!
//! Platform-agnostic types shared by every Tonal crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Operation Model**: [`OperationSet`] and its volume, format, effects and
//!   advanced sub-operations
//! - **Jobs and Results**: [`Job`], [`ProcessingResult`], [`BatchResult`],
//!   [`QueueStatus`]
//! - **Validation**: range checks applied at the request boundary before an
//!   `OperationSet` reaches the filter compiler
//! - **Error Handling**: unified [`CoreError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use tonal_core::{OperationSet, VolumeOperation};
//!
//! let ops = OperationSet {
//!     volume: Some(VolumeOperation {
//!         adjust_db: Some(-3.0),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! assert!(ops.validate().is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod job;
pub mod operations;
pub mod validation;

pub use error::{CoreError, Result, ValidationError};
pub use job::{BatchResult, Job, ProcessingResult, QueueStatus};
pub use operations::{
    AdvancedOperations, BlendMode, ChorusSettings, Codec, CompressorSettings, DynamicsSettings,
    EffectsOperation, FormatOperation, GateSettings, HarmonicsSettings, LayerSpec,
    LayeringSettings, LimiterSettings, LoopSettings, ModulationSettings, OperationSet,
    PeriodicModulation, PitchSettings, SpatialSettings, SpectralSettings, TempoSettings,
    TrimRange, VariationSettings, VolumeOperation,
};

/// Default loudness normalization target (EBU R128 broadcast level)
pub const DEFAULT_TARGET_LUFS: f64 = -23.0;

/// Sample rates accepted by `format.sampleRateHz`
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[8000, 16000, 22050, 44100, 48000, 96000, 192000];

/// Channel counts accepted by `format.channels`
pub const SUPPORTED_CHANNEL_COUNTS: &[u8] = &[1, 2, 6, 8];

/// Maximum number of layers (and input files) a layering request may carry
pub const MAX_LAYERS: usize = 8;

/// Maximum number of variations generated per request
pub const MAX_VARIATIONS: u32 = 20;
