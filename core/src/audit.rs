//! Append-only audit log of raw request/response payloads
//!
//! One newline-delimited JSON object per call:
//! `{"type": "request"|"response", "data": <payload>, "timestamp": <unix>}`.
//! The file is opened in append mode on every write and is never rewritten
//! or truncated. Writes happen only inside the gated request span, so they
//! are serialized by construction.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::HalError;

/// Kind tag for an audit record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordKind {
    Request,
    Response,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Request => "request",
            RecordKind::Response => "response",
        }
    }
}

/// Append-only ndjson recorder
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AuditLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record stamped with the current unix time.
    ///
    /// A write failure propagates; no retry or skip policy is applied here.
    pub fn append(&self, kind: RecordKind, data: &serde_json::Value) -> Result<(), HalError> {
        let record = json!({
            "type": kind.as_str(),
            "data": data,
            "timestamp": chrono::Utc::now().timestamp(),
        });

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{record}")?;
        Ok(())
    }
}
