//! Harmonic interval expansion
//!
//! Each interval with a positive mix level becomes one layering request: the
//! untouched original at `1 - mix` against a pitch-shifted copy at `mix`.

use crate::filter::round_to;
use serde::Serialize;
use tonal_core::{
    AdvancedOperations, BlendMode, HarmonicsSettings, LayerSpec, LayeringSettings, OperationSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HarmonicInterval {
    OctaveUp,
    OctaveDown,
    FifthUp,
    ThirdUp,
}

impl HarmonicInterval {
    pub const ALL: [HarmonicInterval; 4] = [
        HarmonicInterval::OctaveUp,
        HarmonicInterval::OctaveDown,
        HarmonicInterval::FifthUp,
        HarmonicInterval::ThirdUp,
    ];

    pub fn semitones(&self) -> f64 {
        match self {
            HarmonicInterval::OctaveUp => 12.0,
            HarmonicInterval::OctaveDown => -12.0,
            HarmonicInterval::FifthUp => 7.0,
            HarmonicInterval::ThirdUp => 4.0,
        }
    }

    /// File-name friendly identifier
    pub fn slug(&self) -> &'static str {
        match self {
            HarmonicInterval::OctaveUp => "octave_up",
            HarmonicInterval::OctaveDown => "octave_down",
            HarmonicInterval::FifthUp => "fifth_up",
            HarmonicInterval::ThirdUp => "third_up",
        }
    }

    fn mix_level(&self, settings: &HarmonicsSettings) -> Option<f64> {
        match self {
            HarmonicInterval::OctaveUp => settings.octave_up,
            HarmonicInterval::OctaveDown => settings.octave_down,
            HarmonicInterval::FifthUp => settings.fifth_up,
            HarmonicInterval::ThirdUp => settings.third_up,
        }
    }
}

/// One harmonic output to render
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicLayer {
    pub interval: HarmonicInterval,
    pub mix: f64,
    /// Layering request over two copies of the same input
    pub operations: OperationSet,
}

/// Engine inputs each harmonic layering request reads (the same file twice)
pub const HARMONIC_INPUT_COUNT: usize = 2;

/// Expand every interval whose mix level is above zero, in fixed interval order
pub fn expand_harmonics(settings: &HarmonicsSettings) -> Vec<HarmonicLayer> {
    HarmonicInterval::ALL
        .iter()
        .filter_map(|interval| {
            let mix = interval.mix_level(settings).filter(|m| *m > 0.0)?;
            Some(HarmonicLayer {
                interval: *interval,
                mix,
                operations: harmonic_operations(interval.semitones(), mix),
            })
        })
        .collect()
}

fn harmonic_operations(semitones: f64, mix: f64) -> OperationSet {
    let original = LayerSpec {
        blend: BlendMode::Mix,
        volume: Some(round_to(1.0 - mix, 4)),
        ..Default::default()
    };
    let shifted = LayerSpec {
        blend: BlendMode::Mix,
        pitch_semitones: Some(semitones),
        volume: Some(mix),
        ..Default::default()
    };

    OperationSet {
        advanced: Some(AdvancedOperations {
            layering: Some(LayeringSettings {
                layers: vec![original, shifted],
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
