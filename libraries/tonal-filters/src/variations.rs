//! Seeded variation generator
//!
//! The same seed and settings always produce the same variations, so a
//! caller can regenerate an identical set later from the reported seed.

use crate::filter::round_to;
use serde::Serialize;
use tonal_core::{
    AdvancedOperations, OperationSet, PitchSettings, SpectralSettings, TempoSettings,
    VariationSettings, VolumeOperation,
};

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Maximum tempo deviation when timing variation is requested
pub const TEMPO_SPREAD: f64 = 0.1;

/// Linear-congruential generator; the whole stream is a function of the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance and return a value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = ((self.state % LCG_MODULUS) * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Uniform value in `[-range, range)`
    pub fn spread(&mut self, range: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * range
    }
}

/// A generated set of variations and the seed that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSet {
    pub seed: u64,
    pub variations: Vec<OperationSet>,
}

/// Pick a seed for requests that did not supply one
pub fn random_seed() -> u64 {
    u64::from(rand::random::<u32>())
}

/// Generate `settings.count` perturbed operation sets
///
/// Every variation draws pitch, volume, bass, treble and tempo in that order,
/// whether or not the matching range is enabled, so enabling one range never
/// shifts the values drawn for another.
pub fn generate_variations(settings: &VariationSettings) -> VariationSet {
    let seed = settings.seed.unwrap_or_else(random_seed);
    let mut rng = SeededRng::new(seed);

    let variations = (0..settings.count)
        .map(|_| {
            let pitch = round_to(rng.spread(settings.pitch_range), 2);
            let volume = round_to(rng.spread(settings.volume_range), 2);
            let bass = round_to(rng.spread(settings.spectral_range), 2);
            let treble = round_to(rng.spread(settings.spectral_range), 2);
            let tempo = round_to(1.0 + rng.spread(TEMPO_SPREAD), 3);
            build_variation(settings, pitch, volume, bass, treble, tempo)
        })
        .collect();

    tracing::debug!(seed, count = settings.count, "Generated variations");
    VariationSet { seed, variations }
}

fn build_variation(
    settings: &VariationSettings,
    pitch: f64,
    volume: f64,
    bass: f64,
    treble: f64,
    tempo: f64,
) -> OperationSet {
    let mut advanced = AdvancedOperations::default();

    if settings.pitch_range > 0.0 {
        advanced.pitch = Some(PitchSettings {
            semitones: pitch,
            cents: None,
            preserve_formants: Some(true),
        });
    }
    if settings.spectral_range > 0.0 {
        advanced.spectral = Some(SpectralSettings {
            bass_boost: Some(bass),
            treble_boost: Some(treble),
            ..Default::default()
        });
    }
    if settings.timing_range > 0.0 {
        advanced.tempo = Some(TempoSettings {
            factor: tempo,
            preserve_pitch: Some(true),
        });
    }

    let volume = (settings.volume_range > 0.0).then(|| VolumeOperation {
        adjust_db: Some(volume),
        ..Default::default()
    });

    OperationSet {
        volume,
        advanced: (advanced != AdvancedOperations::default()).then_some(advanced),
        ..Default::default()
    }
}
