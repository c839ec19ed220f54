//! Audio engine port and the FFmpeg implementation

use crate::{ProcessingError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tonal_filters::{CommandPlan, GRAPH_OUTPUT_LABEL};

/// One engine invocation: inputs in filter-graph order, one output, one plan
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub plan: CommandPlan,
}

/// Opaque capability: given a plan and an output target, produce a file or fail
#[async_trait]
pub trait AudioEngine: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<()>;
}

/// FFmpeg wrapper
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout: None,
        }
    }

    /// Kill the engine and fail the job if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ffmpeg_path(&self) -> &PathBuf {
        &self.ffmpeg_path
    }

    /// Command-line arguments for one render
    ///
    /// Seek is applied per input so every layer starts at the same offset.
    /// A multi-input graph takes precedence over the plain filter chain; the
    /// chain is then folded into the graph after the mix-down.
    pub fn build_args(request: &RenderRequest) -> Vec<OsString> {
        let plan = &request.plan;
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-nostdin".into(), "-y".into()];

        for input in &request.inputs {
            if let Some(seek) = plan.seek_sec {
                args.push("-ss".into());
                args.push(seek.to_string().into());
            }
            args.push("-i".into());
            args.push(input.clone().into_os_string());
        }

        if let Some(duration) = plan.duration_sec {
            args.push("-t".into());
            args.push(duration.to_string().into());
        }

        if let Some(graph) = plan.filter_complex() {
            args.push("-filter_complex".into());
            args.push(graph.into());
            args.push("-map".into());
            args.push(format!("[{}]", GRAPH_OUTPUT_LABEL).into());
        } else if let Some(chain) = plan.filter_chain() {
            args.push("-af".into());
            args.push(chain.into());
        }

        if let Some(rate) = plan.sample_rate_hz {
            args.push("-ar".into());
            args.push(rate.to_string().into());
        }
        if let Some(channels) = plan.channels {
            args.push("-ac".into());
            args.push(channels.to_string().into());
        }
        if let Some(codec) = &plan.codec {
            args.push("-c:a".into());
            args.push(codec.into());
        }
        if let Some(bitrate) = plan.bitrate_kbps {
            args.push("-b:a".into());
            args.push(format!("{}k", bitrate).into());
        }

        args.push(request.output.clone().into_os_string());
        args
    }

    /// First line of `ffmpeg -version`
    pub async fn probe_version(&self) -> Result<String> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessingError::EngineUnavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(ProcessingError::EngineUnavailable(format!(
                "{} -version exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl AudioEngine for FfmpegEngine {
    async fn render(&self, request: &RenderRequest) -> Result<()> {
        let args = Self::build_args(request);
        tracing::debug!(ffmpeg = %self.ffmpeg_path.display(), ?args, "Starting FFmpeg");

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = cmd.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(output = %request.output.display(), "FFmpeg timed out");
                    return Err(ProcessingError::engine(format!(
                        "timed out after {}s",
                        limit.as_secs_f64()
                    )));
                }
            },
            None => run.await,
        };

        let output = output.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProcessingError::EngineUnavailable(format!(
                "{} not found",
                self.ffmpeg_path.display()
            )),
            _ => ProcessingError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, "FFmpeg failed");
            return Err(ProcessingError::engine(stderr.trim()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_filters::FilterGraph;

    fn args_of(request: &RenderRequest) -> Vec<String> {
        FfmpegEngine::build_args(request)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_engine_creation() {
        let engine = FfmpegEngine::new("/usr/bin/ffmpeg");
        assert_eq!(engine.ffmpeg_path(), &PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(engine.timeout, None);
    }

    #[test]
    fn test_args_for_plain_copy() {
        let request = RenderRequest {
            inputs: vec!["in.wav".into()],
            output: "out.wav".into(),
            plan: CommandPlan::default(),
        };
        assert_eq!(
            args_of(&request),
            vec!["-hide_banner", "-nostdin", "-y", "-i", "in.wav", "out.wav"]
        );
    }

    #[test]
    fn test_args_for_filter_chain_and_format() {
        let request = RenderRequest {
            inputs: vec!["in.wav".into()],
            output: "out.mp3".into(),
            plan: CommandPlan {
                filters: vec!["volume=3dB".into(), "afade=t=in:st=0:d=1".into()],
                sample_rate_hz: Some(48000),
                channels: Some(1),
                codec: Some("libmp3lame".into()),
                bitrate_kbps: Some(192),
                seek_sec: Some(5.0),
                duration_sec: Some(10.0),
                ..Default::default()
            },
        };
        assert_eq!(
            args_of(&request),
            vec![
                "-hide_banner",
                "-nostdin",
                "-y",
                "-ss",
                "5",
                "-i",
                "in.wav",
                "-t",
                "10",
                "-af",
                "volume=3dB,afade=t=in:st=0:d=1",
                "-ar",
                "48000",
                "-ac",
                "1",
                "-c:a",
                "libmp3lame",
                "-b:a",
                "192k",
                "out.mp3",
            ]
        );
    }

    #[test]
    fn test_args_for_graph_use_filter_complex() {
        let request = RenderRequest {
            inputs: vec!["a.wav".into(), "b.wav".into()],
            output: "mix.wav".into(),
            plan: CommandPlan {
                filters: vec!["volume=2dB".into()],
                graph: Some(FilterGraph {
                    chains: vec!["[0:a]anull[l0]".into(), "[1:a]anull[l1]".into()],
                    mix: "[l0][l1]amix=inputs=2".into(),
                    input_count: 2,
                }),
                ..Default::default()
            },
        };
        let args = args_of(&request);

        assert!(!args.contains(&"-af".to_string()));
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(
            args[fc + 1],
            "[0:a]anull[l0];[1:a]anull[l1];[l0][l1]amix=inputs=2[mixed];[mixed]volume=2dB[out]"
        );
        assert_eq!(args[fc + 2], "-map");
        assert_eq!(args[fc + 3], "[out]");
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = FfmpegEngine::new("/nonexistent/ffmpeg-binary");
        let request = RenderRequest {
            inputs: vec!["in.wav".into()],
            output: "out.wav".into(),
            plan: CommandPlan::default(),
        };

        let err = engine.render(&request).await.unwrap_err();
        assert!(matches!(err, ProcessingError::EngineUnavailable(_)));

        let err = engine.probe_version().await.unwrap_err();
        assert!(matches!(err, ProcessingError::EngineUnavailable(_)));
    }
}
