//! Reply sources and their outcomes
//!
//! A [`ReplySource`] turns one accepted chat request into exactly one
//! [`ReplyOutcome`]. Two implementations exist: [`FixedReply`] for daemon
//! mode (defined here) and the interactive terminal collector in the
//! binary crate.

use async_trait::async_trait;

use crate::chat::ChatRequest;
use crate::error::HalError;

/// The terminal result of a reply source invocation.
///
/// The declined variants are deliberate operator decisions, not failures;
/// they ride the same path as a successful reply. `Busy` is produced by
/// the gateway when the exclusion gate is already held and never by a
/// reply source itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The operator (or fixed provider) produced reply text.
    Success(String),
    /// The operator declined: the request cannot be answered.
    CannotAnswer,
    /// The operator declared an internal error.
    InternalError,
    /// The operator declared the request forbidden.
    Forbidden,
    /// The gate was held; the request was rejected without a session.
    Busy,
}

/// Source of replies for accepted requests.
///
/// Exactly one invocation runs at a time, enforced by the caller through
/// [`crate::gate::RequestGate`]. Implementations may suspend indefinitely;
/// no timeout is applied anywhere in the core.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn collect(&self, request: &ChatRequest) -> Result<ReplyOutcome, HalError>;
}

/// Daemon-mode reply source returning a configured literal for every
/// request, ignoring its content. Never suspends.
pub struct FixedReply {
    text: String,
}

impl FixedReply {
    pub fn new(text: impl Into<String>) -> Self {
        FixedReply { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[async_trait]
impl ReplySource for FixedReply {
    async fn collect(&self, _request: &ChatRequest) -> Result<ReplyOutcome, HalError> {
        Ok(ReplyOutcome::Success(self.text.clone()))
    }
}
