//! Tonal filter compiler
//!
//! Turns a validated [`OperationSet`](tonal_core::OperationSet) into a
//! [`CommandPlan`]: an ordered list of FFmpeg filter directives plus the
//! command-level settings (sample rate, channels, codec, bitrate, seek,
//! duration) for one engine invocation.
//!
//! # Directive order
//!
//! ```text
//! volume gain ─► loudnorm ─► fade in ─► fade out ─► loop
//!      ─► pitch ─► tempo ─► spectral ─► dynamics ─► spatial ─► modulation
//! ```
//!
//! Layering requests additionally produce a multi-input [`FilterGraph`]; the
//! filter list above then runs after the mix-down.
//!
//! The crate also hosts the sub-compilers that expand one request into many
//! operation sets: the seeded [`variations`] generator and the [`harmonics`]
//! interval expander.
//!
//! # Example
//!
//! ```rust
//! use tonal_core::{EffectsOperation, OperationSet, TrimRange};
//! use tonal_filters::{BaseCompiler, OperationCompiler};
//!
//! let ops = OperationSet {
//!     effects: Some(EffectsOperation {
//!         trim: Some(TrimRange { start_sec: 5.0, end_sec: 15.0 }),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let plan = BaseCompiler::new().compile(&ops);
//! assert_eq!(plan.seek_sec, Some(5.0));
//! assert_eq!(plan.duration_sec, Some(10.0));
//! ```

#![forbid(unsafe_code)]

pub mod advanced;
pub mod base;
pub mod compiler;
pub mod filter;
pub mod harmonics;
pub mod layering;
pub mod plan;
pub mod variations;

pub use compiler::{AdvancedCompiler, BaseCompiler, OperationCompiler};
pub use filter::Filter;
pub use harmonics::{expand_harmonics, HarmonicInterval, HarmonicLayer, HARMONIC_INPUT_COUNT};
pub use layering::compile_layers;
pub use plan::{CommandPlan, FilterGraph, GRAPH_OUTPUT_LABEL};
pub use variations::{generate_variations, SeededRng, VariationSet};
