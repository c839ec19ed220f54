/// Variation and harmonic tools
use super::args::{parse, CreateHarmonicsArgs, GenerateVariationsArgs};
use super::{tagged_output, to_json};
use crate::error::{ToolError, ToolErrorCode, ToolResult};
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;
use tonal_core::{
    AdvancedOperations, HarmonicsSettings, Job, ProcessingResult, VariationSettings,
};
use tonal_filters::expand_harmonics;

const GENERATE_VARIATIONS: &str = "generate_variations";
const CREATE_HARMONICS: &str = "create_harmonics";

/// Mix levels used when a harmonics request names no interval at all
const DEFAULT_OCTAVE_UP_MIX: f64 = 0.3;
const DEFAULT_FIFTH_UP_MIX: f64 = 0.2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariationResults {
    /// Pass back as `seed` to regenerate the same set
    seed: u64,
    results: Vec<ProcessingResult>,
}

pub(super) async fn generate_variations(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: GenerateVariationsArgs = parse(GENERATE_VARIATIONS, args)?;

    let defaults = VariationSettings::default();
    let settings = VariationSettings {
        count: args.count.unwrap_or(defaults.count),
        pitch_range: args.pitch_range.unwrap_or(defaults.pitch_range),
        volume_range: args.volume_range.unwrap_or(defaults.volume_range),
        spectral_range: args.spectral_range.unwrap_or(defaults.spectral_range),
        timing_range: args.timing_range.unwrap_or(defaults.timing_range),
        seed: args.seed,
    };
    settings
        .validate()
        .map_err(|e| ToolError::validation(GENERATE_VARIATIONS, &e))?;

    let set = tonal_filters::generate_variations(&settings);
    tracing::info!(seed = set.seed, count = set.variations.len(), "Rendering variations");

    let jobs = set
        .variations
        .into_iter()
        .enumerate()
        .map(|(i, operations)| {
            let output = tagged_output(
                &args.input_path,
                &args.output_directory,
                &format!("var{:02}", i + 1),
            );
            Job::new(args.input_path.clone(), output, operations).with_overwrite(args.overwrite)
        })
        .collect();

    let results = state.scheduler.process_all(jobs).await;
    to_json(
        GENERATE_VARIATIONS,
        &VariationResults {
            seed: set.seed,
            results,
        },
    )
}

pub(super) async fn create_harmonics(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: CreateHarmonicsArgs = parse(CREATE_HARMONICS, args)?;

    let mut settings = HarmonicsSettings {
        octave_up: args.octave_up,
        octave_down: args.octave_down,
        fifth_up: args.fifth_up,
        third_up: args.third_up,
    };
    if settings == HarmonicsSettings::default() {
        settings.octave_up = Some(DEFAULT_OCTAVE_UP_MIX);
        settings.fifth_up = Some(DEFAULT_FIFTH_UP_MIX);
    }

    AdvancedOperations {
        harmonics: Some(settings),
        ..Default::default()
    }
    .validate()
    .map_err(|e| ToolError::validation(CREATE_HARMONICS, &e))?;

    let layers = expand_harmonics(&settings);
    if layers.is_empty() {
        return Err(ToolError::new(
            ToolErrorCode::NoFilesFound,
            CREATE_HARMONICS,
            "No harmonic interval has a mix level above zero",
        ));
    }

    let jobs = layers
        .into_iter()
        .map(|layer| {
            let output = tagged_output(
                &args.input_path,
                &args.output_directory,
                layer.interval.slug(),
            );
            Job::new(args.input_path.clone(), output, layer.operations)
                .with_additional_inputs(vec![args.input_path.clone()])
                .with_overwrite(args.overwrite)
        })
        .collect();

    let results = state.scheduler.process_all(jobs).await;
    to_json(CREATE_HARMONICS, &results)
}
