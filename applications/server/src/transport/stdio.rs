//! Line-delimited JSON-RPC over stdin/stdout
//!
//! Each request line is handled on its own task so a long batch does not
//! block queue-status calls. Responses go through a single writer task and
//! may therefore arrive out of request order; callers match them by `id`.

use crate::error::{Result, ServerError};
use crate::rpc;
use crate::state::AppState;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub async fn serve_stdio(state: AppState) -> Result<()> {
    tracing::info!("Serving JSON-RPC on stdio");
    serve_lines(state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve requests from `reader` until EOF or a read failure, then wait for
/// in-flight calls and flush their responses
pub async fn serve_lines<R, W>(state: AppState, mut reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut in_flight = JoinSet::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read request: {}", e);
                break;
            }
        }

        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                if let Some(response) = rpc::parse_error(e) {
                    let _ = tx.send(response);
                }
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let state = state.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = rpc::handle_line(&state, &line).await {
                // Only fails once the writer has stopped
                let _ = tx.send(response);
            }
        });
    }

    tracing::debug!(pending = in_flight.len(), "Input closed, draining requests");
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Request task failed: {}", e);
        }
    }

    drop(tx);
    writer_task
        .await
        .map_err(|e| ServerError::Io(std::io::Error::other(e)))??;
    Ok(())
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await?;
    Ok(())
}
