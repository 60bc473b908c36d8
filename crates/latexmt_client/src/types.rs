use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type JobId = u64;

/// Connection token chosen by the caller when opening a log feed; echoed on
/// every event from that feed.
pub type StreamToken = u64;

/// A job as returned by `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub status: String,
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgt_lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One decoded frame of `WS /api/jobs/{id}/log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFrame {
    Line(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JobsListed(Result<Vec<JobSummary>, FetchError>),
    TranslationDone(Result<String, FetchError>),
    /// The created job, when the server's reply could be decoded.
    JobSubmitted(Result<Option<JobSummary>, FetchError>),
    LogFrame {
        job_id: JobId,
        stream: StreamToken,
        frame: LogFrame,
    },
    /// The feed ended without being asked to: remote close, transport error,
    /// or a failed handshake.
    LogClosed { job_id: JobId, stream: StreamToken },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
