/// File, batch, advanced and layering tools
use super::args::{
    parse, AdvancedProcessArgs, LayerSoundsArgs, ProcessBatchArgs, ProcessFileArgs,
};
use super::to_json;
use crate::error::{ToolError, ToolResult};
use crate::state::AppState;
use serde_json::Value;
use tonal_core::{AdvancedOperations, Job, LayeringSettings, OperationSet, MAX_LAYERS};
use tonal_processing::{BatchRequest, OutputSpec, SourceSpec};

const PROCESS_FILE: &str = "process_audio_file";
const PROCESS_BATCH: &str = "process_audio_batch";
const ADVANCED_PROCESS: &str = "advanced_process";
const LAYER_SOUNDS: &str = "layer_sounds";

pub(super) async fn process_audio_file(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: ProcessFileArgs = parse(PROCESS_FILE, args)?;
    args.operations
        .validate()
        .map_err(|e| ToolError::validation(PROCESS_FILE, &e))?;

    let job = Job::new(args.input_path, args.output_path, args.operations)
        .with_overwrite(args.overwrite);
    let result = state.scheduler.process_one(job).await;
    to_json(PROCESS_FILE, &result)
}

pub(super) async fn process_audio_batch(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: ProcessBatchArgs = parse(PROCESS_BATCH, args)?;
    args.operations
        .validate()
        .map_err(|e| ToolError::validation(PROCESS_BATCH, &e))?;

    let request = BatchRequest {
        source: SourceSpec::directory(args.input_directory, args.file_pattern),
        destination: OutputSpec::directory(args.output_directory)
            .with_suffix(state.output_suffix.clone())
            .with_extension(args.output_format),
        operations: args.operations,
        overwrite: args.overwrite,
    };

    let batch = state
        .scheduler
        .process_batch(request)
        .await
        .map_err(|e| ToolError::processing(PROCESS_BATCH, &e))?;
    to_json(PROCESS_BATCH, &batch)
}

pub(super) async fn advanced_process(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: AdvancedProcessArgs = parse(ADVANCED_PROCESS, args)?;

    let operations = OperationSet {
        advanced: Some(AdvancedOperations {
            pitch: args.pitch,
            tempo: args.tempo,
            spectral: args.spectral,
            dynamics: args.dynamics,
            spatial: args.spatial,
            modulation: args.modulation,
            ..Default::default()
        }),
        ..Default::default()
    };
    operations
        .validate()
        .map_err(|e| ToolError::validation(ADVANCED_PROCESS, &e))?;

    let job =
        Job::new(args.input_path, args.output_path, operations).with_overwrite(args.overwrite);
    let result = state.scheduler.process_one(job).await;
    to_json(ADVANCED_PROCESS, &result)
}

pub(super) async fn layer_sounds(state: &AppState, args: Value) -> ToolResult<Value> {
    let args: LayerSoundsArgs = parse(LAYER_SOUNDS, args)?;

    if args.input_paths.is_empty() || args.input_paths.len() > MAX_LAYERS {
        return Err(ToolError::invalid_params(
            LAYER_SOUNDS,
            format!(
                "inputPaths must list 1 to {} files, got {}",
                MAX_LAYERS,
                args.input_paths.len()
            ),
        ));
    }

    let layering = LayeringSettings {
        layers: args.layers,
    };
    layering
        .validate()
        .map_err(|e| ToolError::validation(LAYER_SOUNDS, &e))?;

    let mut inputs = args.input_paths.into_iter();
    let Some(primary) = inputs.next() else {
        return Err(ToolError::invalid_params(LAYER_SOUNDS, "inputPaths is empty"));
    };

    let operations = OperationSet {
        advanced: Some(AdvancedOperations {
            layering: Some(layering),
            ..Default::default()
        }),
        ..Default::default()
    };
    let job = Job::new(primary, args.output_path, operations)
        .with_additional_inputs(inputs.collect())
        .with_overwrite(args.overwrite);

    let result = state.scheduler.process_one(job).await;
    to_json(LAYER_SOUNDS, &result)
}
