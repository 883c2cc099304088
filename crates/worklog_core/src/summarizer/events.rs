//! Session idle listener over the backend event stream.
//!
//! # Invariants
//! - At most one idle notification is delivered per listener.
//! - Delivery never blocks: a full slot drops the notification.
//! - The listener task ends on cancellation, on delivery or when the
//!   stream closes, whichever comes first.

use super::types::StreamEvent;
use futures_util::StreamExt;
use log::debug;
use reqwest::header::ACCEPT;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const DATA_PREFIX: &str = "data: ";

/// Splits an incoming byte stream into lines.
///
/// Bytes are buffered until `\n`, so multi-byte characters and lines split
/// across chunks are reassembled before decoding.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Appends one chunk and returns every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|byte| *byte == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&raw[..raw.len() - 1]));
        }
        lines
    }

    /// Returns the unterminated tail, if any.
    pub fn finish(self) -> Option<String> {
        (!self.pending.is_empty()).then(|| decode_line(&self.pending))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Parses one `data: <json>` line. Other lines and invalid JSON yield `None`.
pub fn parse_event_line(line: &str) -> Option<StreamEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    serde_json::from_str(payload).ok()
}

fn is_idle_for(line: &str, session_id: &str) -> bool {
    parse_event_line(line)
        .as_ref()
        .and_then(StreamEvent::idle_session_id)
        .is_some_and(|id| id == session_id)
}

/// Spawns a listener for `session.idle` of `session_id` on `event_url`.
///
/// The returned receiver yields `()` once when the session goes idle, and
/// closes without a value when the listener ends for any other reason.
pub fn spawn_idle_listener(
    http: reqwest::Client,
    event_url: String,
    session_id: String,
    cancel: CancellationToken,
) -> mpsc::Receiver<()> {
    let (idle_tx, idle_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("event=idle_listener module=summarizer status=cancelled session_id={session_id}");
            }
            outcome = watch_for_idle(&http, &event_url, &session_id) => match outcome {
                Ok(true) => {
                    debug!("event=idle_listener module=summarizer status=idle session_id={session_id}");
                    let _ = idle_tx.try_send(());
                }
                Ok(false) => {
                    debug!("event=idle_listener module=summarizer status=closed session_id={session_id}");
                }
                Err(err) => {
                    debug!(
                        "event=idle_listener module=summarizer status=error session_id={session_id} error={err}"
                    );
                }
            }
        }
    });

    idle_rx
}

async fn watch_for_idle(
    http: &reqwest::Client,
    event_url: &str,
    session_id: &str,
) -> Result<bool, reqwest::Error> {
    let response = http
        .get(event_url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    if !response.status().is_success() {
        debug!(
            "event=idle_listener module=summarizer status=rejected http_status={}",
            response.status().as_u16()
        );
        return Ok(false);
    }

    let mut stream = response.bytes_stream();
    let mut lines = LineBuffer::default();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if lines.push(&chunk).iter().any(|line| is_idle_for(line, session_id)) {
            return Ok(true);
        }
    }
    Ok(lines
        .finish()
        .is_some_and(|line| is_idle_for(&line, session_id)))
}
