//! Tool argument shapes
//!
//! Field names follow the camelCase wire format of the tool catalog.

use crate::error::{ToolError, ToolResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tonal_core::{
    DynamicsSettings, LayerSpec, ModulationSettings, OperationSet, PitchSettings,
    SpatialSettings, SpectralSettings, TempoSettings,
};

/// Deserialize `args` into `T`, reporting failures as `INVALID_PARAMS`
///
/// A missing argument object is treated as `{}` so tools without required
/// arguments can be called bare.
pub fn parse<T: DeserializeOwned>(tool_name: &str, args: Value) -> ToolResult<T> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::invalid_params(tool_name, e.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFileArgs {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub operations: OperationSet,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBatchArgs {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub operations: OperationSet,
    pub file_pattern: Option<String>,
    /// Output extension for every file, e.g. `mp3`
    pub output_format: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPresetArgs {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub preset_name: String,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPresetsArgs {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVariationsArgs {
    pub input_path: PathBuf,
    pub output_directory: PathBuf,
    pub count: Option<u32>,
    pub pitch_range: Option<f64>,
    pub volume_range: Option<f64>,
    pub spectral_range: Option<f64>,
    pub timing_range: Option<f64>,
    pub seed: Option<u64>,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHarmonicsArgs {
    pub input_path: PathBuf,
    pub output_directory: PathBuf,
    pub octave_up: Option<f64>,
    pub octave_down: Option<f64>,
    pub fifth_up: Option<f64>,
    pub third_up: Option<f64>,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedProcessArgs {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pitch: Option<PitchSettings>,
    pub tempo: Option<TempoSettings>,
    pub spectral: Option<SpectralSettings>,
    pub dynamics: Option<DynamicsSettings>,
    pub spatial: Option<SpatialSettings>,
    pub modulation: Option<ModulationSettings>,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSoundsArgs {
    pub input_paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub overwrite: bool,
}
