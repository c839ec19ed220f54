//! Tool catalog served by `tools/list`
//!
//! Schemas document the argument contract; the bounds themselves are
//! enforced by `OperationSet::validate` when a call arrives.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Every tool, in listing order
pub const TOOL_NAMES: &[&str] = &[
    "process_audio_file",
    "process_audio_batch",
    "apply_preset",
    "list_presets",
    "get_queue_status",
    "generate_variations",
    "create_harmonics",
    "advanced_process",
    "layer_sounds",
    "pause_queue",
    "resume_queue",
    "clear_queue",
];

pub fn is_known_tool(name: &str) -> bool {
    TOOL_NAMES.contains(&name)
}

pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "process_audio_file",
            description: "Apply volume, format, effect and advanced operations to one audio file",
            input_schema: object(
                json!({
                    "inputPath": path("Source audio file"),
                    "outputPath": path("Destination file"),
                    "operations": operation_set(),
                    "overwrite": overwrite(),
                }),
                &["inputPath", "outputPath", "operations"],
            ),
        },
        ToolDescriptor {
            name: "process_audio_batch",
            description: "Apply one operation set to every matching file under a directory",
            input_schema: object(
                json!({
                    "inputDirectory": path("Directory searched recursively"),
                    "outputDirectory": path("Outputs keep their relative sub-directory"),
                    "operations": operation_set(),
                    "filePattern": {
                        "type": "string",
                        "description": "Glob relative to inputDirectory",
                        "default": tonal_processing::DEFAULT_PATTERN,
                    },
                    "outputFormat": {
                        "type": "string",
                        "description": "Output extension, e.g. mp3; defaults to the input's",
                    },
                    "overwrite": overwrite(),
                }),
                &["inputDirectory", "outputDirectory", "operations"],
            ),
        },
        ToolDescriptor {
            name: "apply_preset",
            description: "Process one file with a named preset",
            input_schema: object(
                json!({
                    "inputPath": path("Source audio file"),
                    "outputPath": path("Destination file; the preset's format is appended when it has no extension"),
                    "presetName": { "type": "string" },
                    "overwrite": overwrite(),
                }),
                &["inputPath", "outputPath", "presetName"],
            ),
        },
        ToolDescriptor {
            name: "list_presets",
            description: "List the built-in presets",
            input_schema: object(
                json!({
                    "category": { "type": "string", "enum": ["voice", "music", "game", "web"] },
                }),
                &[],
            ),
        },
        ToolDescriptor {
            name: "get_queue_status",
            description: "Report pending and active jobs and whether the queue is paused",
            input_schema: object(json!({}), &[]),
        },
        ToolDescriptor {
            name: "generate_variations",
            description: "Render seeded random variations of one file",
            input_schema: object(
                json!({
                    "inputPath": path("Source audio file"),
                    "outputDirectory": path("Receives {name}_varNN files"),
                    "count": { "type": "integer", "minimum": 1, "maximum": 20, "default": 5 },
                    "pitchRange": number(0.0, 12.0, "± semitones"),
                    "volumeRange": number(0.0, 10.0, "± dB"),
                    "spectralRange": number(0.0, 6.0, "± dB of bass and treble"),
                    "timingRange": number(0.0, 1.0, "Any positive value enables ±10% tempo variation"),
                    "seed": { "type": "integer", "minimum": 0 },
                    "overwrite": overwrite(),
                }),
                &["inputPath", "outputDirectory"],
            ),
        },
        ToolDescriptor {
            name: "create_harmonics",
            description: "Render one file per harmonic interval, blending the shifted copy with the original",
            input_schema: object(
                json!({
                    "inputPath": path("Source audio file"),
                    "outputDirectory": path("Receives {name}_{interval} files"),
                    "octaveUp": number(0.0, 1.0, "Mix level"),
                    "octaveDown": number(0.0, 1.0, "Mix level"),
                    "fifthUp": number(0.0, 1.0, "Mix level"),
                    "thirdUp": number(0.0, 1.0, "Mix level"),
                    "overwrite": overwrite(),
                }),
                &["inputPath", "outputDirectory"],
            ),
        },
        ToolDescriptor {
            name: "advanced_process",
            description: "Apply pitch, tempo, spectral, dynamics, spatial and modulation processing",
            input_schema: object(
                json!({
                    "inputPath": path("Source audio file"),
                    "outputPath": path("Destination file"),
                    "pitch": pitch(),
                    "tempo": tempo(),
                    "spectral": spectral(),
                    "dynamics": dynamics(),
                    "spatial": spatial(),
                    "modulation": modulation(),
                    "overwrite": overwrite(),
                }),
                &["inputPath", "outputPath"],
            ),
        },
        ToolDescriptor {
            name: "layer_sounds",
            description: "Mix up to eight files into one, each with its own delay, pitch, volume and pan",
            input_schema: object(
                json!({
                    "inputPaths": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                        "maxItems": tonal_core::MAX_LAYERS,
                    },
                    "outputPath": path("Destination file"),
                    "layers": {
                        "type": "array",
                        "items": layer(),
                        "minItems": 1,
                        "maxItems": tonal_core::MAX_LAYERS,
                    },
                    "overwrite": overwrite(),
                }),
                &["inputPaths", "outputPath", "layers"],
            ),
        },
        ToolDescriptor {
            name: "pause_queue",
            description: "Stop starting new jobs; running jobs finish",
            input_schema: object(json!({}), &[]),
        },
        ToolDescriptor {
            name: "resume_queue",
            description: "Resume starting queued jobs in FIFO order",
            input_schema: object(json!({}), &[]),
        },
        ToolDescriptor {
            name: "clear_queue",
            description: "Drop every job that has not started yet",
            input_schema: object(json!({}), &[]),
        },
    ]
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn path(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn overwrite() -> Value {
    json!({ "type": "boolean", "default": false, "description": "Replace an existing output file" })
}

fn number(minimum: f64, maximum: f64, description: &str) -> Value {
    json!({ "type": "number", "minimum": minimum, "maximum": maximum, "description": description })
}

fn operation_set() -> Value {
    json!({
        "type": "object",
        "properties": {
            "volume": {
                "type": "object",
                "properties": {
                    "adjustDb": number(-60.0, 20.0, "Gain in dB, applied before normalization"),
                    "normalize": { "type": "boolean" },
                    "targetLUFS": { "type": "number", "default": tonal_core::DEFAULT_TARGET_LUFS },
                },
            },
            "format": {
                "type": "object",
                "properties": {
                    "sampleRateHz": { "type": "integer", "enum": tonal_core::SUPPORTED_SAMPLE_RATES },
                    "bitrateKbps": { "type": "integer", "minimum": 64, "maximum": 320 },
                    "channels": { "type": "integer", "enum": tonal_core::SUPPORTED_CHANNEL_COUNTS },
                    "codec": { "type": "string", "enum": ["pcm", "mp3", "aac", "vorbis", "flac"] },
                },
            },
            "effects": {
                "type": "object",
                "properties": {
                    "fadeInSec": { "type": "number", "minimum": 0 },
                    "fadeOutSec": { "type": "number", "minimum": 0, "description": "Fade-out start offset" },
                    "trim": {
                        "type": "object",
                        "properties": {
                            "startSec": { "type": "number", "minimum": 0 },
                            "endSec": { "type": "number", "minimum": 0 },
                        },
                        "required": ["startSec", "endSec"],
                    },
                    "loop": {
                        "type": "object",
                        "properties": {
                            "enabled": { "type": "boolean" },
                            "count": { "type": "integer", "minimum": 1 },
                        },
                        "required": ["enabled", "count"],
                    },
                },
            },
            "advanced": {
                "type": "object",
                "properties": {
                    "pitch": pitch(),
                    "tempo": tempo(),
                    "spectral": spectral(),
                    "dynamics": dynamics(),
                    "spatial": spatial(),
                    "modulation": modulation(),
                    "layering": {
                        "type": "object",
                        "properties": {
                            "layers": { "type": "array", "items": layer(), "maxItems": tonal_core::MAX_LAYERS },
                        },
                    },
                },
            },
        },
    })
}

fn pitch() -> Value {
    json!({
        "type": "object",
        "properties": {
            "semitones": number(-12.0, 12.0, "Shift in semitones"),
            "cents": number(-100.0, 100.0, "Fine shift in cents"),
            "preserveFormants": { "type": "boolean", "description": "Keep the original duration" },
        },
        "required": ["semitones"],
    })
}

fn tempo() -> Value {
    json!({
        "type": "object",
        "properties": {
            "factor": number(0.5, 2.0, "Playback speed factor"),
            "preservePitch": { "type": "boolean", "default": true },
        },
        "required": ["factor"],
    })
}

fn spectral() -> Value {
    json!({
        "type": "object",
        "properties": {
            "bassBoost": number(-20.0, 20.0, "dB"),
            "trebleBoost": number(-20.0, 20.0, "dB"),
            "midCut": number(0.0, 20.0, "dB cut at 1 kHz"),
            "warmth": number(0.0, 1.0, "Low-mid boost amount"),
            "brightness": number(0.0, 1.0, "Presence boost amount"),
        },
    })
}

fn dynamics() -> Value {
    json!({
        "type": "object",
        "properties": {
            "compressor": {
                "type": "object",
                "properties": {
                    "threshold": number(-60.0, 0.0, "dB"),
                    "ratio": number(1.0, 20.0, "Compression ratio"),
                    "attack": { "type": "number", "description": "ms" },
                    "release": { "type": "number", "description": "ms" },
                    "knee": number(1.0, 8.0, "Soft knee"),
                },
                "required": ["threshold", "ratio", "attack", "release"],
            },
            "gate": {
                "type": "object",
                "properties": {
                    "threshold": number(-60.0, 0.0, "dB"),
                    "ratio": number(1.0, 20.0, "Expansion ratio"),
                    "attack": { "type": "number", "description": "ms" },
                    "release": { "type": "number", "description": "ms" },
                },
                "required": ["threshold", "ratio"],
            },
            "limiter": {
                "type": "object",
                "properties": {
                    "threshold": number(-24.0, 0.0, "Ceiling in dB"),
                    "release": { "type": "number", "description": "ms" },
                },
                "required": ["threshold"],
            },
        },
    })
}

fn spatial() -> Value {
    json!({
        "type": "object",
        "properties": {
            "stereoWidth": number(0.0, 2.0, "1 leaves the image unchanged"),
            "panPosition": number(-1.0, 1.0, "-1 is hard left"),
            "reverbSend": number(0.0, 1.0, "Echo-based reverb amount"),
            "delayTimeMs": number(0.0, 5000.0, "Delay on both channels"),
            "delayFeedback": number(0.0, 0.95, "Delay feedback"),
        },
    })
}

fn modulation() -> Value {
    let periodic = json!({
        "type": "object",
        "properties": {
            "rate": { "type": "number", "description": "Hz" },
            "depth": number(0.0, 1.0, "Modulation depth"),
        },
        "required": ["rate", "depth"],
    });
    json!({
        "type": "object",
        "properties": {
            "tremolo": periodic.clone(),
            "vibrato": periodic,
            "chorus": {
                "type": "object",
                "properties": {
                    "delayMs": number(0.0, 100.0, "Base delay"),
                    "rate": number(0.1, 10.0, "Hz"),
                    "depth": number(0.0, 10.0, "Delay sweep in ms"),
                },
                "required": ["delayMs", "rate", "depth"],
            },
        },
    })
}

fn layer() -> Value {
    json!({
        "type": "object",
        "properties": {
            "blend": { "type": "string", "enum": ["mix", "multiply", "add", "subtract"], "default": "mix" },
            "delayMs": { "type": "number", "minimum": 0 },
            "pitchSemitones": number(-24.0, 24.0, "Shift in semitones"),
            "volume": number(0.0, 2.0, "Linear gain"),
            "pan": number(-1.0, 1.0, "-1 is hard left"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_matches_tool_names() {
        let listed: Vec<_> = catalog().iter().map(|t| t.name).collect();
        assert_eq!(listed, TOOL_NAMES);
    }

    #[test]
    fn test_every_schema_is_an_object_with_known_required_fields() {
        for tool in catalog() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{}", tool.name);

            let properties: HashSet<_> = schema["properties"]
                .as_object()
                .unwrap()
                .keys()
                .cloned()
                .collect();
            for required in schema["required"].as_array().unwrap() {
                assert!(
                    properties.contains(required.as_str().unwrap()),
                    "{} requires undeclared {}",
                    tool.name,
                    required
                );
            }
        }
    }

    #[test]
    fn test_descriptor_serializes_input_schema_in_camel_case() {
        let value = serde_json::to_value(&catalog()[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert_eq!(value["name"], "process_audio_file");
    }
}
