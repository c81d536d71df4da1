//! Structured error types for HAL
//!
//! Transport-level problems (malformed bodies, unknown routes) are handled
//! at the gateway boundary and never become a `HalError`; operator-declared
//! error outcomes travel through [`crate::reply::ReplyOutcome`] instead.

use thiserror::Error;

/// Primary error type for HAL core operations
#[derive(Error, Debug)]
pub enum HalError {
    /// Appending to the audit log failed. No retry/skip policy is defined;
    /// callers surface this as an internal error.
    #[error("audit log write failed: {0}")]
    AuditWrite(#[from] std::io::Error),

    /// The reply session ended without delivering a decision (the
    /// completion channel was dropped before a terminal action fired).
    #[error("reply session ended without a decision")]
    SessionAborted,
}
