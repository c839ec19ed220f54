//! Advanced operations: pitch, tempo, spectral, dynamics, spatial, modulation
//!
//! Emitted in that component order, after every base-operation filter.

use crate::filter::{chain, round_to, Filter};
use tonal_core::{
    AdvancedOperations, DynamicsSettings, ModulationSettings, PitchSettings, SpatialSettings,
    SpectralSettings, TempoSettings,
};

/// Rate assumed by the rate-resample trick when no output rate is requested
pub const DEFAULT_NOMINAL_RATE: u32 = 44100;

/// Per-directive tempo window accepted by the engine
pub const TEMPO_MIN: f64 = 0.5;
pub const TEMPO_MAX: f64 = 2.0;

// Fixed bands for the derived spectral controls
const MID_CUT_FREQ_HZ: f64 = 1000.0;
const MID_CUT_WIDTH_HZ: f64 = 500.0;
const WARMTH_FREQ_HZ: f64 = 200.0;
const WARMTH_WIDTH_HZ: f64 = 100.0;
const WARMTH_SCALE_DB: f64 = 3.0;
const BRIGHTNESS_FREQ_HZ: f64 = 8000.0;
const BRIGHTNESS_WIDTH_HZ: f64 = 2000.0;
const BRIGHTNESS_SCALE_DB: f64 = 4.0;

const ECHO_IN_GAIN: f64 = 0.8;
const ECHO_OUT_GAIN: f64 = 0.9;
const REVERB_OUT_GAIN: f64 = 0.88;

const CHORUS_IN_GAIN: f64 = 0.5;
const CHORUS_OUT_GAIN: f64 = 0.9;
const CHORUS_DECAY: f64 = 0.4;

/// Frequency ratio for a shift of `semitones` plus `cents`
pub fn pitch_ratio(semitones: f64, cents: f64) -> f64 {
    let total_cents = semitones * 100.0 + cents;
    2f64.powf(total_cents / 1200.0)
}

/// Resample-at-a-new-rate then resample back: shifts pitch and speed together
pub fn rate_shift(ratio: f64, nominal_rate: u32) -> [Filter; 2] {
    [
        Filter::new("asetrate").value(format!("{}*{}", nominal_rate, ratio)),
        Filter::new("aresample").value(nominal_rate),
    ]
}

/// Tempo directives whose factors multiply to `factor`
///
/// A single directive when `factor` is inside the engine's window, otherwise
/// a chain of in-window steps.
pub fn tempo_chain(factor: f64) -> Vec<Filter> {
    let mut remaining = factor;
    let mut filters = Vec::new();

    while remaining > TEMPO_MAX {
        filters.push(Filter::new("atempo").value(TEMPO_MAX));
        remaining /= TEMPO_MAX;
    }
    while remaining < TEMPO_MIN {
        filters.push(Filter::new("atempo").value(TEMPO_MIN));
        remaining /= TEMPO_MIN;
    }
    filters.push(Filter::new("atempo").value(round_to(remaining, 6)));
    filters
}

/// Per-channel gains for a signed pan position
///
/// Negative positions keep the left channel at unity and attenuate the
/// right; non-negative positions do the opposite.
pub fn pan_gains(position: f64) -> (f64, f64) {
    let left = (1.0 - position).min(1.0);
    let right = (1.0 + position).min(1.0);
    (round_to(left, 4), round_to(right, 4))
}

/// Stereo pan directive for a signed pan position
pub fn pan_filter(position: f64) -> Filter {
    let (left, right) = pan_gains(position);
    Filter::new("pan").value(format!("stereo|c0={}*c0|c1={}*c1", left, right))
}

pub(crate) fn compile_advanced(
    advanced: &AdvancedOperations,
    nominal_rate: u32,
    filters: &mut Vec<String>,
) {
    if let Some(pitch) = &advanced.pitch {
        compile_pitch(pitch, nominal_rate, filters);
    }
    if let Some(tempo) = &advanced.tempo {
        compile_tempo(tempo, nominal_rate, filters);
    }
    if let Some(spectral) = &advanced.spectral {
        if let Some(expr) = spectral_expression(spectral) {
            filters.push(expr);
        }
    }
    if let Some(dynamics) = &advanced.dynamics {
        compile_dynamics(dynamics, filters);
    }
    if let Some(spatial) = &advanced.spatial {
        compile_spatial(spatial, filters);
    }
    if let Some(modulation) = &advanced.modulation {
        compile_modulation(modulation, filters);
    }
}

fn compile_pitch(pitch: &PitchSettings, nominal_rate: u32, filters: &mut Vec<String>) {
    let ratio = pitch_ratio(pitch.semitones, pitch.cents.unwrap_or(0.0));
    filters.extend(rate_shift(ratio, nominal_rate).map(String::from));

    if pitch.preserve_formants == Some(true) {
        filters.extend(tempo_chain(1.0 / ratio).into_iter().map(String::from));
    }
}

fn compile_tempo(tempo: &TempoSettings, nominal_rate: u32, filters: &mut Vec<String>) {
    if tempo.preserve_pitch == Some(true) {
        filters.extend(tempo_chain(tempo.factor).into_iter().map(String::from));
    } else {
        filters.extend(rate_shift(tempo.factor, nominal_rate).map(String::from));
    }
}

/// One combined expression for every present band, or `None` if none are
fn spectral_expression(spectral: &SpectralSettings) -> Option<String> {
    let mut bands = Vec::new();

    if let Some(gain) = spectral.bass_boost {
        bands.push(Filter::new("bass").option("g", gain));
    }
    if let Some(gain) = spectral.treble_boost {
        bands.push(Filter::new("treble").option("g", gain));
    }
    if let Some(cut) = spectral.mid_cut {
        bands.push(equalizer(MID_CUT_FREQ_HZ, MID_CUT_WIDTH_HZ, -cut));
    }
    if let Some(warmth) = spectral.warmth {
        bands.push(equalizer(
            WARMTH_FREQ_HZ,
            WARMTH_WIDTH_HZ,
            round_to(warmth * WARMTH_SCALE_DB, 4),
        ));
    }
    if let Some(brightness) = spectral.brightness {
        bands.push(equalizer(
            BRIGHTNESS_FREQ_HZ,
            BRIGHTNESS_WIDTH_HZ,
            round_to(brightness * BRIGHTNESS_SCALE_DB, 4),
        ));
    }

    if bands.is_empty() {
        None
    } else {
        Some(chain(bands))
    }
}

fn equalizer(freq: f64, width_hz: f64, gain: f64) -> Filter {
    Filter::new("equalizer")
        .option("f", freq)
        .option("width_type", "h")
        .option("width", width_hz)
        .option("g", gain)
}

fn compile_dynamics(dynamics: &DynamicsSettings, filters: &mut Vec<String>) {
    if let Some(c) = &dynamics.compressor {
        let mut f = Filter::new("acompressor")
            .option("threshold", format!("{}dB", c.threshold))
            .option("ratio", c.ratio)
            .option("attack", c.attack)
            .option("release", c.release);
        if let Some(knee) = c.knee {
            f = f.option("knee", knee);
        }
        filters.push(f.into());
    }

    if let Some(g) = &dynamics.gate {
        let mut f = Filter::new("agate")
            .option("threshold", format!("{}dB", g.threshold))
            .option("ratio", g.ratio);
        if let Some(attack) = g.attack {
            f = f.option("attack", attack);
        }
        if let Some(release) = g.release {
            f = f.option("release", release);
        }
        filters.push(f.into());
    }

    if let Some(l) = &dynamics.limiter {
        let mut f = Filter::new("alimiter").option("limit", format!("{}dB", l.threshold));
        if let Some(release) = l.release {
            f = f.option("release", release);
        }
        filters.push(f.into());
    }
}

fn compile_spatial(spatial: &SpatialSettings, filters: &mut Vec<String>) {
    if let Some(width) = spatial.stereo_width {
        filters.push(Filter::new("extrastereo").option("m", width).into());
    }

    if let Some(position) = spatial.pan_position {
        filters.push(pan_filter(position).into());
    }

    if let Some(delay_ms) = spatial.delay_time_ms {
        filters.push(
            Filter::new("adelay")
                .value(format!("{}|{}", delay_ms, delay_ms))
                .into(),
        );
        let feedback = spatial.delay_feedback.unwrap_or(0.0);
        if feedback > 0.0 {
            filters.push(
                Filter::new("aecho")
                    .value(ECHO_IN_GAIN)
                    .value(ECHO_OUT_GAIN)
                    .value(delay_ms)
                    .value(feedback)
                    .into(),
            );
        }
    }

    if let Some(send) = spatial.reverb_send {
        let (delay_ms, decay) = reverb_echo(send);
        filters.push(
            Filter::new("aecho")
                .value(ECHO_IN_GAIN)
                .value(REVERB_OUT_GAIN)
                .value(delay_ms)
                .value(decay)
                .into(),
        );
    }
}

/// Echo delay (ms) and decay approximating a reverb send level
pub fn reverb_echo(send: f64) -> (f64, f64) {
    let delay_ms = round_to(20.0 + 80.0 * send, 1);
    let decay = round_to(0.1 + 0.5 * send, 3);
    (delay_ms, decay)
}

fn compile_modulation(modulation: &ModulationSettings, filters: &mut Vec<String>) {
    if let Some(t) = &modulation.tremolo {
        filters.push(
            Filter::new("tremolo")
                .option("f", t.rate)
                .option("d", t.depth)
                .into(),
        );
    }

    if let Some(v) = &modulation.vibrato {
        filters.push(
            Filter::new("vibrato")
                .option("f", v.rate)
                .option("d", v.depth)
                .into(),
        );
    }

    if let Some(c) = &modulation.chorus {
        filters.push(
            Filter::new("chorus")
                .value(CHORUS_IN_GAIN)
                .value(CHORUS_OUT_GAIN)
                .value(c.delay_ms)
                .value(CHORUS_DECAY)
                .value(c.rate)
                .value(c.depth)
                .into(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_ratio_octave_is_exact() {
        assert_eq!(pitch_ratio(12.0, 0.0), 2.0);
        assert_eq!(pitch_ratio(-12.0, 0.0), 0.5);
        assert_eq!(pitch_ratio(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_pitch_ratio_combines_cents() {
        let a = pitch_ratio(1.0, 0.0);
        let b = pitch_ratio(0.0, 100.0);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_rate_shift_pair() {
        let [set, back] = rate_shift(2.0, 44100);
        assert_eq!(set.to_string(), "asetrate=44100*2");
        assert_eq!(back.to_string(), "aresample=44100");
    }

    #[test]
    fn test_tempo_chain_in_window_is_single() {
        let filters = tempo_chain(1.5);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].to_string(), "atempo=1.5");
    }

    #[test]
    fn test_tempo_chain_splits_out_of_window() {
        let filters: Vec<String> = tempo_chain(0.3).into_iter().map(String::from).collect();
        assert_eq!(filters, vec!["atempo=0.5", "atempo=0.6"]);

        let filters: Vec<String> = tempo_chain(5.0).into_iter().map(String::from).collect();
        assert_eq!(filters, vec!["atempo=2", "atempo=2", "atempo=1.25"]);
    }

    #[test]
    fn test_pan_gains() {
        assert_eq!(pan_gains(0.0), (1.0, 1.0));
        assert_eq!(pan_gains(-1.0), (1.0, 0.0));
        assert_eq!(pan_gains(1.0), (0.0, 1.0));
        assert_eq!(pan_gains(-0.25), (1.0, 0.75));
        assert_eq!(pan_gains(0.5), (0.5, 1.0));
    }

    #[test]
    fn test_spectral_expression_order() {
        let spectral = SpectralSettings {
            bass_boost: Some(3.0),
            treble_boost: Some(-2.0),
            mid_cut: Some(4.0),
            warmth: Some(0.5),
            brightness: Some(0.25),
        };
        assert_eq!(
            spectral_expression(&spectral).unwrap(),
            "bass=g=3,treble=g=-2,\
             equalizer=f=1000:width_type=h:width=500:g=-4,\
             equalizer=f=200:width_type=h:width=100:g=1.5,\
             equalizer=f=8000:width_type=h:width=2000:g=1"
        );
    }

    #[test]
    fn test_spectral_expression_skips_absent_bands() {
        let spectral = SpectralSettings {
            treble_boost: Some(2.0),
            ..Default::default()
        };
        assert_eq!(spectral_expression(&spectral).unwrap(), "treble=g=2");
        assert_eq!(spectral_expression(&SpectralSettings::default()), None);
    }

    #[test]
    fn test_reverb_echo_derivation() {
        assert_eq!(reverb_echo(0.5), (60.0, 0.35));
        assert_eq!(reverb_echo(1.0), (100.0, 0.6));
        assert_eq!(reverb_echo(0.0), (20.0, 0.1));
    }
}
