//! Drives one question/answer exchange at a time.

use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::config::ChatConfig;
use crate::error::{ChatResult, ConversationError, StreamError};
use crate::models::{ChatRequest, ExchangeId};
use crate::sse::{self, WireEvent};
use crate::state::Conversation;
use crate::traits::{ByteStream, ConversationObserver, Headers, HttpClient, HttpError};

use super::phase::{ExchangeOutcome, ExchangePhase};

/// Owns the conversation and is its only writer.
///
/// `submit` takes `&mut self`, so exchanges on one controller never overlap.
/// If a `submit` future is dropped mid-stream, its assistant message stays
/// open; the next `submit` seals it with the partial text it had received
/// before starting a new exchange.
pub struct SessionController<C> {
    client: C,
    config: ChatConfig,
    conversation: Conversation,
    phase: ExchangePhase,
    current: Option<ExchangeId>,
    next_exchange: u64,
}

impl<C: HttpClient> SessionController<C> {
    pub fn new(client: C, config: ChatConfig) -> Self {
        let conversation = match &config.greeting {
            Some(greeting) => Conversation::with_greeting(greeting.clone()),
            None => Conversation::new(),
        };
        Self {
            client,
            config,
            conversation,
            phase: ExchangePhase::Idle,
            current: None,
            next_exchange: 1,
        }
    }

    /// Read-only view of the transcript.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Register a presentation-layer observer on the conversation.
    pub fn observe(&mut self, observer: Box<dyn ConversationObserver>) {
        self.conversation.observe(observer);
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Phase of the most recent exchange.
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// Identifier of the most recent exchange.
    pub fn current_exchange(&self) -> Option<ExchangeId> {
        self.current
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Ask `input` and stream the answer into the conversation.
    ///
    /// Returns `Err` only for blank input, in which case nothing changes.
    /// Connection problems end the exchange as `Failed` with the fallback
    /// message in the transcript and are reported through the outcome.
    pub async fn submit(&mut self, input: &str) -> ChatResult<ExchangeOutcome> {
        if input.trim().is_empty() {
            return Err(ConversationError::InvalidInput.into());
        }

        let id = self.begin_exchange();
        self.conversation.append_user(input, Some(id))?;

        let body = match serde_json::to_string(&ChatRequest::new(input)) {
            Ok(body) => body,
            Err(e) => return Ok(self.fail(id, HttpError::Other(e.to_string()).into(), 0)),
        };

        let url = self.config.chat_url();
        tracing::info!("Exchange {} sending to {}", id, url);

        let timeout = self.config.read_timeout;
        let response =
            tokio::time::timeout(timeout, self.client.post_stream(&url, &body, &request_headers()))
                .await;
        let outcome = match response {
            Ok(Ok(body)) => self.stream_answer(id, body).await,
            Ok(Err(e)) => self.fail(id, e.into(), 0),
            Err(_) => {
                let error = HttpError::Timeout(format!("no response within {:?}", timeout));
                self.fail(id, error.into(), 0)
            }
        };
        Ok(outcome)
    }

    fn begin_exchange(&mut self) -> ExchangeId {
        if let Some(stale) = self.conversation.in_progress().map(|m| m.exchange) {
            tracing::warn!(
                "Sealing message left in progress by exchange {:?} with its partial text",
                stale
            );
            if let Err(e) = self.conversation.seal_assistant(None) {
                tracing::warn!("Could not seal stale message: {}", e);
            }
        }

        let id = ExchangeId(self.next_exchange);
        self.next_exchange += 1;
        self.current = Some(id);
        self.phase = ExchangePhase::Sending;
        id
    }

    async fn stream_answer(&mut self, id: ExchangeId, body: ByteStream) -> ExchangeOutcome {
        self.phase = ExchangePhase::Streaming;
        self.conversation.open_assistant(Some(id));

        let mut events = sse::wire_events(with_read_timeout(body, self.config.read_timeout));
        let mut chunks = 0;
        loop {
            match events.next().await {
                Some(Ok(WireEvent::Chunk(text))) => {
                    chunks += 1;
                    self.conversation.append_to_assistant(&text);
                }
                Some(Ok(WireEvent::Termination)) => return self.complete(id, chunks, true),
                Some(Err(e)) => return self.fail(id, e, chunks),
                None => return self.complete(id, chunks, false),
            }
        }
    }

    fn complete(&mut self, id: ExchangeId, chunks: usize, terminated: bool) -> ExchangeOutcome {
        if let Err(e) = self.conversation.seal_assistant(None) {
            tracing::warn!("Exchange {} completed without an open message: {}", id, e);
        }
        self.phase = ExchangePhase::Completed;
        tracing::info!(
            "Exchange {} completed: {} chunks, sentinel {}",
            id,
            chunks,
            if terminated { "received" } else { "missing" }
        );
        ExchangeOutcome {
            id,
            phase: ExchangePhase::Completed,
            chunks,
            terminated,
            error: None,
        }
    }

    fn fail(&mut self, id: ExchangeId, error: StreamError, chunks: usize) -> ExchangeOutcome {
        tracing::warn!("Exchange {} failed after {} chunks: {}", id, chunks, error);
        let fallback = error.user_message();
        if self.conversation.seal_assistant(Some(fallback)).is_err() {
            self.conversation.append_assistant(fallback, Some(id));
        }
        self.phase = ExchangePhase::Failed;
        ExchangeOutcome {
            id,
            phase: ExchangePhase::Failed,
            chunks,
            terminated: false,
            error: Some(error),
        }
    }
}

fn request_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "text/event-stream".to_string());
    headers
}

/// Fail the body with `HttpError::Timeout` when no buffer arrives in time.
fn with_read_timeout(body: ByteStream, timeout: Duration) -> ByteStream {
    Box::pin(stream::unfold(Some(body), move |state| async move {
        let mut body = state?;
        match tokio::time::timeout(timeout, body.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(body))),
            Ok(Some(Err(e))) => Some((Err(e), None)),
            Ok(None) => None,
            Err(_) => Some((
                Err(HttpError::Timeout(format!(
                    "no data received for {:?}",
                    timeout
                ))),
                None,
            )),
        }
    }))
}
