//! Operation model
//!
//! Every field is optional. An absent field means "leave this aspect of the
//! stream alone"; the filter compiler never emits a directive for it.
//! Serialized field names are camelCase so an `OperationSet` round-trips
//! unchanged through the tool layer and is echoed back verbatim in results.

use serde::{Deserialize, Serialize};

/// The complete description of what to do to one audio stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeOperation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatOperation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsOperation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedOperations>,
}

impl OperationSet {
    /// True when no operation at all is requested
    pub fn is_empty(&self) -> bool {
        self.volume.is_none()
            && self.format.is_none()
            && self.effects.is_none()
            && self.advanced.is_none()
    }

    /// Layering request carried in the advanced block, if any
    pub fn layering(&self) -> Option<&LayeringSettings> {
        self.advanced.as_ref().and_then(|a| a.layering.as_ref())
    }
}

/// Gain and loudness normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeOperation {
    /// Gain in dB (-60 to 20)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_db: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,

    /// Normalization target, defaults to -23 LUFS
    #[serde(
        default,
        rename = "targetLUFS",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_lufs: Option<f64>,
}

/// Output stream format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,

    /// Bitrate in kbps (64 to 320)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<Codec>,
}

/// Output codec as requested by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    Pcm,
    Mp3,
    Aac,
    Vorbis,
    Flac,
}

impl Codec {
    /// Conventional container extension for this codec
    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Pcm => "wav",
            Codec::Mp3 => "mp3",
            Codec::Aac => "m4a",
            Codec::Vorbis => "ogg",
            Codec::Flac => "flac",
        }
    }
}

/// Fades, trimming and looping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in_sec: Option<f64>,

    /// Start offset of the fade-out (not "seconds before the end")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out_sec: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<TrimRange>,

    #[serde(
        default,
        rename = "loop",
        skip_serializing_if = "Option::is_none"
    )]
    pub looping: Option<LoopSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimRange {
    pub start_sec: f64,
    pub end_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSettings {
    pub enabled: bool,
    /// Total number of plays, including the first
    pub count: u32,
}

/// Optional superset of operations handled by the advanced compiler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOperations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<PitchSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<TempoSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmonics: Option<HarmonicsSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral: Option<SpectralSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<DynamicsSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulation: Option<ModulationSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<VariationSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layering: Option<LayeringSettings>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchSettings {
    /// -12 to 12
    pub semitones: f64,

    /// -100 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cents: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_formants: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoSettings {
    /// 0.5 to 2.0
    pub factor: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_pitch: Option<bool>,
}

/// Harmonic layer mix levels, each 0 to 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonicsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octave_up: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octave_down: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifth_up: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_up: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralSettings {
    /// Low shelf gain in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass_boost: Option<f64>,

    /// High shelf gain in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treble_boost: Option<f64>,

    /// Attenuation at 1 kHz in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_cut: Option<f64>,

    /// 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f64>,

    /// 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor: Option<CompressorSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limiter: Option<LimiterSettings>,
}

/// Compressor parameters; threshold in dB, attack/release in ms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressorSettings {
    pub threshold: f64,
    pub ratio: f64,
    pub attack: f64,
    pub release: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knee: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateSettings {
    pub threshold: f64,
    pub ratio: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimiterSettings {
    pub threshold: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialSettings {
    /// 0 (mono) to 2 (extra wide), 1 leaves the image unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo_width: Option<f64>,

    /// -1 (hard left) to 1 (hard right)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_position: Option<f64>,

    /// 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverb_send: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_time_ms: Option<f64>,

    /// 0 to 0.95
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_feedback: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tremolo: Option<PeriodicModulation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrato: Option<PeriodicModulation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chorus: Option<ChorusSettings>,
}

/// Rate in Hz, depth 0 to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicModulation {
    pub rate: f64,
    pub depth: f64,
}

/// Delay in ms, rate in Hz, depth in ms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChorusSettings {
    pub delay_ms: f64,
    pub rate: f64,
    pub depth: f64,
}

/// Randomized variation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSettings {
    /// 1 to 20
    pub count: u32,

    /// ± semitones
    #[serde(default)]
    pub pitch_range: f64,

    /// ± dB
    #[serde(default)]
    pub volume_range: f64,

    /// ± dB applied to bass and treble independently
    #[serde(default)]
    pub spectral_range: f64,

    /// Any positive value enables ±10% tempo variation
    #[serde(default)]
    pub timing_range: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for VariationSettings {
    fn default() -> Self {
        Self {
            count: 5,
            pitch_range: 2.0,
            volume_range: 3.0,
            spectral_range: 2.0,
            timing_range: 0.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeringSettings {
    /// Applied in order: layer `i` processes input `i`
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    #[serde(default)]
    pub blend: BlendMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_semitones: Option<f64>,

    /// 0 to 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    /// -1 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Mix,
    Multiply,
    Add,
    Subtract,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case_fields() {
        let ops: OperationSet = serde_json::from_value(json!({
            "volume": { "adjustDb": -3.5, "normalize": true, "targetLUFS": -16.0 },
            "format": { "sampleRateHz": 48000, "codec": "mp3", "channels": 1 },
            "effects": { "trim": { "startSec": 1.0, "endSec": 4.0 }, "loop": { "enabled": true, "count": 3 } }
        }))
        .unwrap();

        let volume = ops.volume.unwrap();
        assert_eq!(volume.adjust_db, Some(-3.5));
        assert_eq!(volume.target_lufs, Some(-16.0));

        let format = ops.format.unwrap();
        assert_eq!(format.codec, Some(Codec::Mp3));
        assert_eq!(format.sample_rate_hz, Some(48000));

        let effects = ops.effects.unwrap();
        assert_eq!(effects.looping.unwrap().count, 3);
        assert_eq!(effects.trim.unwrap().end_sec, 4.0);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let ops = OperationSet {
            volume: Some(VolumeOperation {
                normalize: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&ops).unwrap();
        assert_eq!(value, json!({ "volume": { "normalize": true } }));
    }

    #[test]
    fn test_empty_operation_set() {
        assert!(OperationSet::default().is_empty());
        let ops: OperationSet = serde_json::from_value(json!({})).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_layer_blend_defaults_to_mix() {
        let layer: LayerSpec = serde_json::from_value(json!({ "volume": 0.5 })).unwrap();
        assert_eq!(layer.blend, BlendMode::Mix);
        assert_eq!(layer.volume, Some(0.5));
    }

    #[test]
    fn test_unknown_codec_rejected() {
        let result: std::result::Result<FormatOperation, _> =
            serde_json::from_value(json!({ "codec": "opus" }));
        assert!(result.is_err());
    }
}
