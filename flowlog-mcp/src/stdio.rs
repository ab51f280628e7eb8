//! Line-delimited JSON-RPC transport
//!
//! Every line read is one message. Requests run concurrently on their own
//! tasks; a single writer task serializes the responses so lines never
//! interleave. Responses go out in completion order.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::protocol::{INVALID_REQUEST, PARSE_ERROR, Request, Response};
use crate::server::Server;

/// Handle one input line, returning the serialized response if any
pub async fn handle_line(line: &str, server: &Server) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(err) => {
            let response = Response::error(Value::Null, PARSE_ERROR, format!("Parse error: {err}"));
            return serde_json::to_string(&response).ok();
        }
    };

    let request: Request = match Request::deserialize(&value) {
        Ok(request) => request,
        Err(err) => {
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            let response =
                Response::error(id, INVALID_REQUEST, format!("Invalid request: {err}"));
            return serde_json::to_string(&response).ok();
        }
    };

    server
        .handle_request(request)
        .await
        .and_then(|response| serde_json::to_string(&response).ok())
}

/// Serve requests from `reader` until end of input
///
/// Returns the writer once every in-flight request has been answered.
pub async fn serve<R, W>(server: Arc<Server>, reader: R, writer: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<W, std::io::Error>(writer)
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read from input")? {
        let server = Arc::clone(&server);
        let tx = tx.clone();

        tokio::spawn(async move {
            if let Some(response) = handle_line(&line, &server).await {
                // The writer only stops early on an I/O error, reported below
                let _ = tx.send(response);
            }
        });
    }

    tracing::info!("Input closed, waiting for in-flight requests");
    drop(tx);

    writer_task
        .await
        .context("Writer task panicked")?
        .context("Failed to write response")
}
