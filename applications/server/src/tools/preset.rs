/// Preset tools
use super::args::{parse, ApplyPresetArgs, ListPresetsArgs};
use super::to_json;
use crate::error::{ToolError, ToolErrorCode, ToolResult};
use crate::presets::{self, PresetCategory};
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;
use tonal_core::{Job, ProcessingResult};

const APPLY_PRESET: &str = "apply_preset";
const LIST_PRESETS: &str = "list_presets";

/// A processing result with the preset that produced it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetResult {
    #[serde(flatten)]
    result: ProcessingResult,
    preset_name: &'static str,
    preset_description: &'static str,
}

pub(super) async fn apply_preset(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: ApplyPresetArgs = parse(APPLY_PRESET, args)?;

    let preset = presets::find(&args.preset_name).ok_or_else(|| {
        ToolError::new(
            ToolErrorCode::PresetNotFound,
            APPLY_PRESET,
            format!("Preset not found: {}", args.preset_name),
        )
    })?;

    let mut output_path = args.output_path;
    if output_path.extension().is_none() {
        output_path.set_extension(preset.output_format);
    }

    tracing::info!(preset = preset.name, "Applying preset");
    let job = Job::new(args.input_path, output_path, preset.operations.clone())
        .with_overwrite(args.overwrite);
    let result = state.scheduler.process_one(job).await;

    to_json(
        APPLY_PRESET,
        &PresetResult {
            result,
            preset_name: preset.name,
            preset_description: preset.description,
        },
    )
}

pub(super) fn list_presets(args: Value) -> ToolResult<Value> {
    let args: ListPresetsArgs = parse(LIST_PRESETS, args)?;

    let category = args
        .category
        .as_deref()
        .map(str::parse::<PresetCategory>)
        .transpose()
        .map_err(|e| ToolError::invalid_params(LIST_PRESETS, e))?;

    to_json(LIST_PRESETS, &presets::by_category(category))
}
