use crate::error::StreamError;
use crate::models::ExchangeId;

/// Lifecycle of one question/answer exchange.
///
/// `Idle -> Sending -> Streaming -> {Completed | Failed}`; `Sending` can
/// also fail directly. `Completed` and `Failed` are terminal for the
/// exchange, and the next submit starts over at `Sending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangePhase {
    /// No exchange has been started yet
    #[default]
    Idle,
    /// Request issued, no response yet
    Sending,
    /// Response body is being read
    Streaming,
    Completed,
    Failed,
}

impl ExchangePhase {
    /// Whether a request is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, ExchangePhase::Sending | ExchangePhase::Streaming)
    }
}

/// Result of a finished exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeOutcome {
    pub id: ExchangeId,
    /// `Completed` or `Failed`
    pub phase: ExchangePhase,
    /// Number of chunk events applied to the assistant message
    pub chunks: usize,
    /// Whether the stream ended with the `STREAM_END` sentinel
    pub terminated: bool,
    /// Set when `phase` is `Failed`
    pub error: Option<StreamError>,
}

impl ExchangeOutcome {
    pub fn is_completed(&self) -> bool {
        self.phase == ExchangePhase::Completed
    }
}
