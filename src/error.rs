/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise notifier error types so that every failed
    notification surfaces a typed, diagnosable cause.

  Security / Safety Notes:
    Error contexts never embed the API key; response bodies
    from the service are carried verbatim for diagnostics.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Returned by `Client::notify` and the configuration layer;
    consolidates exit codes for the `bugsnag-notify` binary.

  Revision History:
    2026-10-16 COD  Established notifier error taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for notifier operations.
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Enumerates every way a notification (or its setup) can fail.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("The payload failed syntax validation (HTTP 400)")]
    InvalidPayload,
    #[error("The given API key is invalid (HTTP 401)")]
    Unauthorized,
    #[error("The payload is too large to process (HTTP 413)")]
    PayloadTooLarge,
    #[error("The payload was not processed due to rate limiting (HTTP 429)")]
    RateLimited,
    #[error("Notify endpoint responded with HTTP {status}: {body}")]
    UnclassifiedHttp { status: u16, body: String },
    #[error("Transport: {0}")]
    Transport(String),
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("An event requires at least one error")]
    EmptyBatch,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl NotifierError {
    /// HTTP status behind this failure, when the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotifierError::InvalidPayload => Some(400),
            NotifierError::Unauthorized => Some(401),
            NotifierError::PayloadTooLarge => Some(413),
            NotifierError::RateLimited => Some(429),
            NotifierError::UnclassifiedHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NotifierError::InvalidPayload => ExitCode::from(10),
            NotifierError::Unauthorized => ExitCode::from(11),
            NotifierError::PayloadTooLarge => ExitCode::from(12),
            NotifierError::RateLimited => ExitCode::from(13),
            NotifierError::UnclassifiedHttp { .. } => ExitCode::from(14),
            NotifierError::Config(_) => ExitCode::from(20),
            NotifierError::EmptyBatch => ExitCode::from(21),
            NotifierError::Transport(_) => ExitCode::from(30),
            NotifierError::Serialization(_) => ExitCode::from(31),
            NotifierError::Filesystem(_) => ExitCode::from(40),
            NotifierError::Io(_) => ExitCode::from(41),
        }
    }
}
