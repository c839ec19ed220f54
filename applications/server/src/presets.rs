/// Built-in processing presets
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tonal_core::{
    AdvancedOperations, Codec, CompressorSettings, DynamicsSettings, EffectsOperation,
    FormatOperation, GateSettings, LimiterSettings, LoopSettings, OperationSet,
    SpectralSettings, TrimRange, VolumeOperation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Voice,
    Music,
    Game,
    Web,
}

impl PresetCategory {
    pub const ALL: [PresetCategory; 4] = [
        PresetCategory::Voice,
        PresetCategory::Music,
        PresetCategory::Game,
        PresetCategory::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetCategory::Voice => "voice",
            PresetCategory::Music => "music",
            PresetCategory::Game => "game",
            PresetCategory::Web => "web",
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown preset category '{}' (expected voice, music, game or web)",
                    s
                )
            })
    }
}

/// A named, pre-built operation set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: &'static str,
    pub category: PresetCategory,
    pub description: &'static str,
    /// Output file extension
    pub output_format: &'static str,
    pub operations: OperationSet,
}

/// Every built-in preset, in listing order
pub fn all() -> &'static [Preset] {
    static PRESETS: OnceLock<Vec<Preset>> = OnceLock::new();
    PRESETS.get_or_init(builtin_presets)
}

pub fn find(name: &str) -> Option<&'static Preset> {
    all().iter().find(|p| p.name == name)
}

pub fn by_category(category: Option<PresetCategory>) -> Vec<&'static Preset> {
    all()
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

fn normalize(target_lufs: f64) -> Option<VolumeOperation> {
    Some(VolumeOperation {
        adjust_db: None,
        normalize: Some(true),
        target_lufs: Some(target_lufs),
    })
}

fn format(
    codec: Codec,
    sample_rate_hz: u32,
    channels: u8,
    bitrate_kbps: Option<u32>,
) -> Option<FormatOperation> {
    Some(FormatOperation {
        sample_rate_hz: Some(sample_rate_hz),
        bitrate_kbps,
        channels: Some(channels),
        codec: Some(codec),
    })
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        // Voice
        Preset {
            name: "podcast",
            category: PresetCategory::Voice,
            description: "Spoken word for podcast feeds: -16 LUFS, mono MP3 at 128 kbps",
            output_format: "mp3",
            operations: OperationSet {
                volume: normalize(-16.0),
                format: format(Codec::Mp3, 44100, 1, Some(128)),
                ..Default::default()
            },
        },
        Preset {
            name: "voice_clarity",
            category: PresetCategory::Voice,
            description: "Gated, compressed and brightened dialogue, mono WAV",
            output_format: "wav",
            operations: OperationSet {
                volume: normalize(-18.0),
                format: format(Codec::Pcm, 48000, 1, None),
                advanced: Some(AdvancedOperations {
                    spectral: Some(SpectralSettings {
                        bass_boost: Some(-3.0),
                        treble_boost: Some(2.0),
                        brightness: Some(0.3),
                        ..Default::default()
                    }),
                    dynamics: Some(DynamicsSettings {
                        compressor: Some(CompressorSettings {
                            threshold: -20.0,
                            ratio: 3.0,
                            attack: 10.0,
                            release: 120.0,
                            knee: Some(2.0),
                        }),
                        gate: Some(GateSettings {
                            threshold: -50.0,
                            ratio: 2.0,
                            attack: None,
                            release: None,
                        }),
                        limiter: None,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        Preset {
            name: "audiobook",
            category: PresetCategory::Voice,
            description: "Long-form narration: -18 LUFS, mono MP3 at 64 kbps",
            output_format: "mp3",
            operations: OperationSet {
                volume: normalize(-18.0),
                format: format(Codec::Mp3, 44100, 1, Some(64)),
                ..Default::default()
            },
        },
        // Music
        Preset {
            name: "music_master",
            category: PresetCategory::Music,
            description: "Streaming master: -14 LUFS with a -1 dB ceiling, stereo FLAC",
            output_format: "flac",
            operations: OperationSet {
                volume: normalize(-14.0),
                format: format(Codec::Flac, 48000, 2, None),
                advanced: Some(AdvancedOperations {
                    dynamics: Some(DynamicsSettings {
                        limiter: Some(LimiterSettings {
                            threshold: -1.0,
                            release: Some(50.0),
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        Preset {
            name: "lofi",
            category: PresetCategory::Music,
            description: "Dark, warm low-fidelity render at 22.05 kHz",
            output_format: "mp3",
            operations: OperationSet {
                format: format(Codec::Mp3, 22050, 2, Some(128)),
                advanced: Some(AdvancedOperations {
                    spectral: Some(SpectralSettings {
                        treble_boost: Some(-6.0),
                        warmth: Some(0.7),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        // Game
        Preset {
            name: "game_sfx",
            category: PresetCategory::Game,
            description: "Short effects: -16 LUFS, click-free start, mono 16-bit WAV",
            output_format: "wav",
            operations: OperationSet {
                volume: normalize(-16.0),
                format: format(Codec::Pcm, 44100, 1, None),
                effects: Some(EffectsOperation {
                    fade_in_sec: Some(0.005),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        Preset {
            name: "game_ambience_loop",
            category: PresetCategory::Game,
            description: "Background bed looped four times with a soft fade-in, stereo Ogg Vorbis",
            output_format: "ogg",
            operations: OperationSet {
                volume: normalize(-24.0),
                format: format(Codec::Vorbis, 44100, 2, Some(160)),
                effects: Some(EffectsOperation {
                    fade_in_sec: Some(1.0),
                    looping: Some(LoopSettings {
                        enabled: true,
                        count: 4,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        Preset {
            name: "retro_8bit",
            category: PresetCategory::Game,
            description: "Chiptune-style crunch: 8 kHz mono PCM",
            output_format: "wav",
            operations: OperationSet {
                format: format(Codec::Pcm, 8000, 1, None),
                advanced: Some(AdvancedOperations {
                    spectral: Some(SpectralSettings {
                        bass_boost: Some(-6.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        // Web
        Preset {
            name: "web_stream",
            category: PresetCategory::Web,
            description: "Browser playback: -16 LUFS stereo MP3 at 128 kbps",
            output_format: "mp3",
            operations: OperationSet {
                volume: normalize(-16.0),
                format: format(Codec::Mp3, 44100, 2, Some(128)),
                ..Default::default()
            },
        },
        Preset {
            name: "web_preview",
            category: PresetCategory::Web,
            description: "30-second preview clip with a fade-out, mono MP3 at 96 kbps",
            output_format: "mp3",
            operations: OperationSet {
                volume: normalize(-16.0),
                format: format(Codec::Mp3, 44100, 1, Some(96)),
                effects: Some(EffectsOperation {
                    fade_out_sec: Some(29.0),
                    trim: Some(TrimRange {
                        start_sec: 0.0,
                        end_sec: 30.0,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        },
        Preset {
            name: "web_aac",
            category: PresetCategory::Web,
            description: "Mobile-friendly stereo AAC at 160 kbps",
            output_format: "m4a",
            operations: OperationSet {
                volume: normalize(-16.0),
                format: format(Codec::Aac, 44100, 2, Some(160)),
                ..Default::default()
            },
        },
    ]
}
