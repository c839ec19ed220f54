//! Base operations: volume, format and effects

use crate::filter::Filter;
use crate::plan::CommandPlan;
use tonal_core::{Codec, EffectsOperation, FormatOperation, VolumeOperation, DEFAULT_TARGET_LUFS};

/// Loudness range passed to the single-pass normalizer (LU)
pub const NORMALIZE_LOUDNESS_RANGE: f64 = 11.0;

/// True-peak ceiling passed to the single-pass normalizer (dBTP)
pub const NORMALIZE_TRUE_PEAK: f64 = -1.5;

/// Fade-out length in seconds
///
/// Callers choose where the fade-out starts, never how long it lasts.
pub const FADE_OUT_DURATION_SEC: f64 = 1.0;

/// Loop buffer size in samples (the engine's maximum)
pub const LOOP_BUFFER_SAMPLES: i32 = i32::MAX;

/// Map a caller-facing codec to the engine's encoder identifier
pub fn engine_codec(codec: Codec) -> &'static str {
    match codec {
        Codec::Pcm => "pcm_s16le",
        Codec::Mp3 => "libmp3lame",
        Codec::Vorbis => "libvorbis",
        Codec::Aac => "aac",
        Codec::Flac => "flac",
    }
}

/// Gain first, then normalization: the gain is a pre-normalization trim
pub(crate) fn compile_volume(volume: &VolumeOperation, filters: &mut Vec<String>) {
    if let Some(db) = volume.adjust_db {
        filters.push(Filter::new("volume").value(format!("{}dB", db)).into());
    }

    if volume.normalize == Some(true) {
        let target = volume.target_lufs.unwrap_or(DEFAULT_TARGET_LUFS);
        filters.push(
            Filter::new("loudnorm")
                .option("I", target)
                .option("LRA", NORMALIZE_LOUDNESS_RANGE)
                .option("TP", NORMALIZE_TRUE_PEAK)
                .into(),
        );
    }
}

pub(crate) fn apply_format(format: &FormatOperation, plan: &mut CommandPlan) {
    plan.sample_rate_hz = format.sample_rate_hz;
    plan.channels = format.channels;
    plan.codec = format.codec.map(|c| engine_codec(c).to_string());
    plan.bitrate_kbps = format.bitrate_kbps;
}

pub(crate) fn compile_effects(effects: &EffectsOperation, plan: &mut CommandPlan) {
    if let Some(duration) = effects.fade_in_sec {
        plan.filters.push(
            Filter::new("afade")
                .option("t", "in")
                .option("st", 0)
                .option("d", duration)
                .into(),
        );
    }

    if let Some(start) = effects.fade_out_sec {
        plan.filters.push(
            Filter::new("afade")
                .option("t", "out")
                .option("st", start)
                .option("d", FADE_OUT_DURATION_SEC)
                .into(),
        );
    }

    if let Some(trim) = &effects.trim {
        plan.seek_sec = Some(trim.start_sec);
        if trim.end_sec > trim.start_sec {
            plan.duration_sec = Some(trim.end_sec - trim.start_sec);
        }
    }

    if let Some(looping) = &effects.looping {
        if looping.enabled && looping.count > 1 {
            plan.filters.push(
                Filter::new("aloop")
                    .option("loop", looping.count - 1)
                    .option("size", LOOP_BUFFER_SAMPLES)
                    .into(),
            );
        }
    }
}
