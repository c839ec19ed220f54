//! Range validation for operation sets
//!
//! This is the request boundary: the filter compiler trusts its input, so
//! every documented bound is enforced here, before compilation.

use crate::error::ValidationError;
use crate::operations::*;
use crate::{MAX_LAYERS, MAX_VARIATIONS, SUPPORTED_CHANNEL_COUNTS, SUPPORTED_SAMPLE_RATES};

type Check = std::result::Result<(), ValidationError>;

fn range(field: &str, value: f64, min: f64, max: f64) -> Check {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}

fn optional(field: &str, value: Option<f64>, min: f64, max: f64) -> Check {
    match value {
        Some(v) => range(field, v, min, max),
        None => Ok(()),
    }
}

fn non_negative(field: &str, value: f64) -> Check {
    range(field, value, 0.0, f64::MAX)
}

impl OperationSet {
    /// Check every present field against its documented bounds
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Check {
        if let Some(volume) = &self.volume {
            volume.validate()?;
        }
        if let Some(format) = &self.format {
            format.validate()?;
        }
        if let Some(effects) = &self.effects {
            effects.validate()?;
        }
        if let Some(advanced) = &self.advanced {
            advanced.validate()?;
        }
        Ok(())
    }
}

impl VolumeOperation {
    pub fn validate(&self) -> Check {
        optional("volume.adjustDb", self.adjust_db, -60.0, 20.0)?;
        optional("volume.targetLUFS", self.target_lufs, -70.0, 0.0)
    }
}

impl FormatOperation {
    pub fn validate(&self) -> Check {
        if let Some(rate) = self.sample_rate_hz {
            if !SUPPORTED_SAMPLE_RATES.contains(&rate) {
                return Err(ValidationError::new(
                    "format.sampleRateHz",
                    format!("{} Hz is not one of {:?}", rate, SUPPORTED_SAMPLE_RATES),
                ));
            }
        }
        if let Some(bitrate) = self.bitrate_kbps {
            if !(64..=320).contains(&bitrate) {
                return Err(ValidationError::new(
                    "format.bitrateKbps",
                    format!("{} is outside [64, 320]", bitrate),
                ));
            }
        }
        if let Some(channels) = self.channels {
            if !SUPPORTED_CHANNEL_COUNTS.contains(&channels) {
                return Err(ValidationError::new(
                    "format.channels",
                    format!("{} is not one of {:?}", channels, SUPPORTED_CHANNEL_COUNTS),
                ));
            }
        }
        Ok(())
    }
}

impl EffectsOperation {
    pub fn validate(&self) -> Check {
        if let Some(fade_in) = self.fade_in_sec {
            non_negative("effects.fadeInSec", fade_in)?;
        }
        if let Some(fade_out) = self.fade_out_sec {
            non_negative("effects.fadeOutSec", fade_out)?;
        }
        if let Some(trim) = &self.trim {
            non_negative("effects.trim.startSec", trim.start_sec)?;
            non_negative("effects.trim.endSec", trim.end_sec)?;
        }
        if let Some(looping) = &self.looping {
            if looping.count < 1 {
                return Err(ValidationError::new(
                    "effects.loop.count",
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }
}

impl AdvancedOperations {
    pub fn validate(&self) -> Check {
        if let Some(pitch) = &self.pitch {
            range("advanced.pitch.semitones", pitch.semitones, -12.0, 12.0)?;
            optional("advanced.pitch.cents", pitch.cents, -100.0, 100.0)?;
        }
        if let Some(tempo) = &self.tempo {
            range("advanced.tempo.factor", tempo.factor, 0.5, 2.0)?;
        }
        if let Some(harmonics) = &self.harmonics {
            optional("advanced.harmonics.octaveUp", harmonics.octave_up, 0.0, 1.0)?;
            optional("advanced.harmonics.octaveDown", harmonics.octave_down, 0.0, 1.0)?;
            optional("advanced.harmonics.fifthUp", harmonics.fifth_up, 0.0, 1.0)?;
            optional("advanced.harmonics.thirdUp", harmonics.third_up, 0.0, 1.0)?;
        }
        if let Some(spectral) = &self.spectral {
            optional("advanced.spectral.bassBoost", spectral.bass_boost, -20.0, 20.0)?;
            optional("advanced.spectral.trebleBoost", spectral.treble_boost, -20.0, 20.0)?;
            optional("advanced.spectral.midCut", spectral.mid_cut, 0.0, 20.0)?;
            optional("advanced.spectral.warmth", spectral.warmth, 0.0, 1.0)?;
            optional("advanced.spectral.brightness", spectral.brightness, 0.0, 1.0)?;
        }
        if let Some(dynamics) = &self.dynamics {
            dynamics.validate()?;
        }
        if let Some(spatial) = &self.spatial {
            optional("advanced.spatial.stereoWidth", spatial.stereo_width, 0.0, 2.0)?;
            optional("advanced.spatial.panPosition", spatial.pan_position, -1.0, 1.0)?;
            optional("advanced.spatial.reverbSend", spatial.reverb_send, 0.0, 1.0)?;
            optional("advanced.spatial.delayTimeMs", spatial.delay_time_ms, 0.0, 5000.0)?;
            optional("advanced.spatial.delayFeedback", spatial.delay_feedback, 0.0, 0.95)?;
        }
        if let Some(modulation) = &self.modulation {
            if let Some(tremolo) = &modulation.tremolo {
                range("advanced.modulation.tremolo.rate", tremolo.rate, 0.1, 20000.0)?;
                range("advanced.modulation.tremolo.depth", tremolo.depth, 0.0, 1.0)?;
            }
            if let Some(vibrato) = &modulation.vibrato {
                range("advanced.modulation.vibrato.rate", vibrato.rate, 0.1, 20000.0)?;
                range("advanced.modulation.vibrato.depth", vibrato.depth, 0.0, 1.0)?;
            }
            if let Some(chorus) = &modulation.chorus {
                range("advanced.modulation.chorus.delayMs", chorus.delay_ms, 0.0, 100.0)?;
                range("advanced.modulation.chorus.rate", chorus.rate, 0.1, 10.0)?;
                range("advanced.modulation.chorus.depth", chorus.depth, 0.0, 10.0)?;
            }
        }
        if let Some(variations) = &self.variations {
            variations.validate()?;
        }
        if let Some(layering) = &self.layering {
            layering.validate()?;
        }
        Ok(())
    }
}

impl DynamicsSettings {
    pub fn validate(&self) -> Check {
        if let Some(c) = &self.compressor {
            range("advanced.dynamics.compressor.threshold", c.threshold, -60.0, 0.0)?;
            range("advanced.dynamics.compressor.ratio", c.ratio, 1.0, 20.0)?;
            range("advanced.dynamics.compressor.attack", c.attack, 0.01, 2000.0)?;
            range("advanced.dynamics.compressor.release", c.release, 0.01, 9000.0)?;
            optional("advanced.dynamics.compressor.knee", c.knee, 1.0, 8.0)?;
        }
        if let Some(g) = &self.gate {
            range("advanced.dynamics.gate.threshold", g.threshold, -60.0, 0.0)?;
            range("advanced.dynamics.gate.ratio", g.ratio, 1.0, 20.0)?;
            optional("advanced.dynamics.gate.attack", g.attack, 0.01, 9000.0)?;
            optional("advanced.dynamics.gate.release", g.release, 0.01, 9000.0)?;
        }
        if let Some(l) = &self.limiter {
            range("advanced.dynamics.limiter.threshold", l.threshold, -24.0, 0.0)?;
            optional("advanced.dynamics.limiter.release", l.release, 1.0, 8000.0)?;
        }
        Ok(())
    }
}

impl VariationSettings {
    pub fn validate(&self) -> Check {
        if self.count < 1 || self.count > MAX_VARIATIONS {
            return Err(ValidationError::new(
                "variations.count",
                format!("{} is outside [1, {}]", self.count, MAX_VARIATIONS),
            ));
        }
        range("variations.pitchRange", self.pitch_range, 0.0, 12.0)?;
        range("variations.volumeRange", self.volume_range, 0.0, 10.0)?;
        range("variations.spectralRange", self.spectral_range, 0.0, 6.0)?;
        range("variations.timingRange", self.timing_range, 0.0, 1.0)
    }
}

impl LayeringSettings {
    pub fn validate(&self) -> Check {
        if self.layers.is_empty() || self.layers.len() > MAX_LAYERS {
            return Err(ValidationError::new(
                "layering.layers",
                format!("expected 1 to {} layers, got {}", MAX_LAYERS, self.layers.len()),
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(delay) = layer.delay_ms {
                non_negative(&format!("layering.layers[{}].delayMs", i), delay)?;
            }
            optional(
                &format!("layering.layers[{}].pitchSemitones", i),
                layer.pitch_semitones,
                -24.0,
                24.0,
            )?;
            optional(&format!("layering.layers[{}].volume", i), layer.volume, 0.0, 2.0)?;
            optional(&format!("layering.layers[{}].pan", i), layer.pan, -1.0, 1.0)?;
        }
        Ok(())
    }
}
