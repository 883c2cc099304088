//! HTTP client for the chat-session summary backend.
//!
//! # Responsibility
//! - Implement [`Summarizer`] against `/session`, `/session/{id}/message`,
//!   `/event` and `/global/health`.
//! - Run the two-tier wait: idle event with a bounded wait, then polling.
//!
//! # Invariants
//! - The idle listener is attached before the prompt is sent.
//! - The listener is cancelled when `summarize` returns by any path.
//! - Poll failures are skipped; only the overall poll budget ends polling.

use super::error::{SummarizerError, SummaryResult};
use super::events::spawn_idle_listener;
use super::types::{
    extract_assistant_text, ModelSpec, PromptRequest, Session, SessionMessage, TextPart,
};
use super::Summarizer;
use crate::model::work_item::WorkItem;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Returned for an empty item list without contacting the backend.
pub const EMPTY_SUMMARY_PLACEHOLDER: &str = "No work items to summarize.";

const PROMPT_PREAMBLE: &str = "Summarize the following completed work items in 1-2 concise sentences. \
Focus on the key accomplishments and outcomes. Keep it brief and professional. \
Do not use any tools, just respond with plain text:\n\n";

/// Timing knobs of the summary protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryClientOptions {
    /// Per-request timeout for regular (non-stream) calls.
    pub request_timeout: Duration,
    /// Upper bound for waiting on the idle event after sending the prompt.
    pub idle_timeout: Duration,
    /// Delay between spawning the listener and sending the prompt.
    pub listener_grace: Duration,
    /// Delay between message polls in the fallback phase.
    pub poll_interval: Duration,
    /// Upper bound for the fallback polling phase.
    pub poll_timeout: Duration,
}

impl Default for SummaryClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            idle_timeout: Duration::from_secs(60),
            listener_grace: Duration::from_millis(100),
            poll_interval: Duration::from_millis(500),
            poll_timeout: Duration::from_secs(30),
        }
    }
}

/// Summary backend client bound to one provider/model pair.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: Client,
    stream_http: Client,
    base_url: String,
    provider_id: String,
    model_id: String,
    options: SummaryClientOptions,
}

impl SummaryClient {
    /// Creates a client with default timing.
    pub fn new(base_url: &str, provider_id: &str, model_id: &str) -> SummaryResult<Self> {
        Self::with_options(base_url, provider_id, model_id, SummaryClientOptions::default())
    }

    /// Creates a client with explicit timing.
    pub fn with_options(
        base_url: &str,
        provider_id: &str,
        model_id: &str,
        options: SummaryClientOptions,
    ) -> SummaryResult<Self> {
        let http = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|source| SummarizerError::Connection {
                stage: "build_client",
                source,
            })?;
        // The event stream is long-lived; its lifetime is bounded by cancellation.
        let stream_http =
            Client::builder()
                .build()
                .map_err(|source| SummarizerError::Connection {
                    stage: "build_client",
                    source,
                })?;

        Ok(Self {
            http,
            stream_http,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider_id: provider_id.to_string(),
            model_id: model_id.to_string(),
            options,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn create_session(&self) -> SummaryResult<Session> {
        let stage = "create_session";
        let response = self
            .http
            .post(self.url("/session"))
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|source| SummarizerError::Connection { stage, source })?;
        let response = ensure_ok(stage, response).await?;
        response
            .json::<Session>()
            .await
            .map_err(|source| SummarizerError::Decode { stage, source })
    }

    async fn send_message(&self, session_id: &str, prompt: &str) -> SummaryResult<()> {
        let stage = "send_message";
        let request = PromptRequest {
            model: ModelSpec {
                provider_id: self.provider_id.clone(),
                model_id: self.model_id.clone(),
            },
            parts: vec![TextPart::text(prompt)],
        };
        let response = self
            .http
            .post(self.url(&format!("/session/{session_id}/message")))
            .json(&request)
            .send()
            .await
            .map_err(|source| SummarizerError::Connection { stage, source })?;
        ensure_ok(stage, response).await?;
        Ok(())
    }

    async fn get_messages(&self, session_id: &str) -> SummaryResult<Vec<SessionMessage>> {
        let stage = "get_messages";
        let response = self
            .http
            .get(self.url(&format!("/session/{session_id}/message")))
            .send()
            .await
            .map_err(|source| SummarizerError::Connection { stage, source })?;
        let response = ensure_ok(stage, response).await?;
        response
            .json::<Vec<SessionMessage>>()
            .await
            .map_err(|source| SummarizerError::Decode { stage, source })
    }

    /// Polls messages until assistant text appears or the poll budget runs out.
    async fn poll_for_response(&self, session_id: &str) -> SummaryResult<String> {
        let deadline = Instant::now() + self.options.poll_timeout;
        let mut ticker = tokio::time::interval_at(
            Instant::now() + self.options.poll_interval,
            self.options.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return Err(SummarizerError::NoResponse),
                _ = ticker.tick() => {
                    match self.get_messages(session_id).await {
                        Ok(messages) => {
                            let text = extract_assistant_text(&messages);
                            if !text.is_empty() {
                                return Ok(text);
                            }
                        }
                        Err(err) => {
                            debug!(
                                "event=summary_poll module=summarizer status=retry session_id={session_id} error={err}"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn test_connection(&self) -> SummaryResult<()> {
        let stage = "health_check";
        let response = self
            .http
            .get(self.url("/global/health"))
            .send()
            .await
            .map_err(|source| SummarizerError::Connection { stage, source })?;
        ensure_ok(stage, response).await?;
        Ok(())
    }

    async fn summarize(&self, items: &[WorkItem]) -> SummaryResult<String> {
        if items.is_empty() {
            return Ok(EMPTY_SUMMARY_PLACEHOLDER.to_string());
        }

        let started_at = std::time::Instant::now();
        let prompt = build_prompt(items);
        let session = self.create_session().await?;
        info!(
            "event=summary_session module=summarizer status=start session_id={} items={}",
            session.id,
            items.len()
        );

        let idle_deadline = Instant::now() + self.options.idle_timeout;
        let listener_token = CancellationToken::new();
        let _listener_guard = listener_token.clone().drop_guard();
        let mut idle_rx = spawn_idle_listener(
            self.stream_http.clone(),
            self.url("/event"),
            session.id.clone(),
            listener_token.child_token(),
        );
        sleep(self.options.listener_grace).await;

        self.send_message(&session.id, &prompt).await?;

        let went_idle = tokio::select! {
            notified = idle_rx.recv() => notified.is_some(),
            _ = sleep_until(idle_deadline) => false,
        };
        listener_token.cancel();

        let messages = self.get_messages(&session.id).await?;
        let mut text = extract_assistant_text(&messages);
        if text.is_empty() {
            warn!(
                "event=summary_session module=summarizer status=fallback_poll session_id={} idle_seen={}",
                session.id, went_idle
            );
            text = self.poll_for_response(&session.id).await?;
        }

        info!(
            "event=summary_session module=summarizer status=ok session_id={} idle_seen={} duration_ms={}",
            session.id,
            went_idle,
            started_at.elapsed().as_millis()
        );
        Ok(text)
    }
}

/// Builds the summary prompt: fixed preamble plus one bullet per item.
pub fn build_prompt(items: &[WorkItem]) -> String {
    let mut prompt = String::from(PROMPT_PREAMBLE);
    for item in items {
        prompt.push_str("- ");
        prompt.push_str(&item.text);
        prompt.push('\n');
    }
    prompt
}

async fn ensure_ok(stage: &'static str, response: Response) -> SummaryResult<Response> {
    if response.status() == StatusCode::OK {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(SummarizerError::Status {
        stage,
        status,
        body,
    })
}
