/// Tonal Server - audio-processing tools over JSON-RPC
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tonal_processing::FfmpegEngine;
use tonal_server::{
    config::ServerConfig,
    presets::{self, PresetCategory},
    state::AppState,
    transport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "tonal_server=info,tonal_processing=info";

#[derive(Parser)]
#[command(name = "tonal-server")]
#[command(about = "Audio-processing tools over JSON-RPC", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tonal.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `tonal_processing=trace`
    #[arg(long, global = true, env = "TONAL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve line-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// Serve JSON-RPC over HTTP at POST /rpc
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the preset table as JSON
    Presets {
        /// voice, music, game or web
        #[arg(long)]
        category: Option<PresetCategory>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Stdio => {
            let state = startup(cli.config.as_deref()).await?;
            transport::serve_stdio(state).await?;
        }
        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let addr = SocketAddr::from((
                config.server.host.parse::<std::net::IpAddr>()?,
                config.server.port,
            ));
            let state = build_state(&config).await;
            transport::serve_http(state, addr).await?;
        }
        Commands::Presets { category } => {
            let listing = presets::by_category(category);
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the stdio transport
fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

async fn startup(path: Option<&std::path::Path>) -> anyhow::Result<AppState> {
    let config = load_config(path)?;
    Ok(build_state(&config).await)
}

async fn build_state(config: &ServerConfig) -> AppState {
    tracing::info!("Starting Tonal Server");
    tracing::info!("FFmpeg: {}", config.engine.ffmpeg_path.display());
    tracing::info!("Concurrency: {}", config.processing.concurrency);

    // Startup continues without FFmpeg; every job then fails with the engine error
    match FfmpegEngine::new(config.engine.ffmpeg_path.clone())
        .probe_version()
        .await
    {
        Ok(version) => tracing::info!("Engine: {}", version),
        Err(e) => tracing::warn!("FFmpeg probe failed: {}", e),
    }

    AppState::new(config)
}
