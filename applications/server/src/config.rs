/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "tonal.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_processing")]
    pub processing: ProcessingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Per-job watchdog in seconds; 0 disables it
    #[serde(default)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingSettings {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_output_suffix")]
    pub default_output_suffix: String,
}

impl EngineSettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `tonal.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. TONAL_ENGINE__FFMPEG_PATH
        settings = settings.add_source(
            config::Environment::with_prefix("TONAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.processing.concurrency == 0 {
            return Err(ServerError::Config(
                "processing.concurrency must be at least 1".to_string(),
            ));
        }

        if self.engine.ffmpeg_path.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "engine.ffmpeg_path must not be empty (set TONAL_ENGINE__FFMPEG_PATH)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8931
}

fn default_engine() -> EngineSettings {
    EngineSettings {
        ffmpeg_path: default_ffmpeg_path(),
        timeout_secs: 0,
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_processing() -> ProcessingSettings {
    ProcessingSettings {
        concurrency: default_concurrency(),
        default_output_suffix: default_output_suffix(),
    }
}

fn default_concurrency() -> usize {
    tonal_processing::DEFAULT_CONCURRENCY
}

fn default_output_suffix() -> String {
    tonal_processing::DEFAULT_OUTPUT_SUFFIX.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            engine: default_engine(),
            processing: default_processing(),
        }
    }
}
