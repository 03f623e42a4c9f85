/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Error-reporting client for the Bugsnag notify endpoint:
    shapes errors into the JSON envelope and POSTs them.

  Security / Safety Notes:
    Performs outbound HTTP(S) POST requests only. The API key
    travels in the request body and is never logged.

  Dependencies:
    reqwest for HTTP, serde for the wire format, thiserror
    for the error taxonomy.

  Operational Scope:
    Embedded by applications; also driven by the
    `bugsnag-notify` binary.

  Revision History:
    2026-10-16 COD  Established notifier library surface.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling
    - One event per call, one request per event
============================================================*/

//! ```no_run
//! use bugsnag_notifier::{Client, MetaData, RawError};
//!
//! let mut client = Client::new("your-api-key");
//! client.set_release_stage("production").set_app_version("1.2.0");
//! client
//!     .notify(RawError::structural("TypeError", "boom", "app.js", 42), MetaData::new())
//!     .expect("notification failed");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod exception;
pub mod frame;
pub mod logger;
pub mod payload;
pub mod transport;

pub use client::Client;
pub use config::{NotifierConfig, NotifierSettings};
pub use error::{NotifierError, Result};
pub use event::{BaseData, ErrorBatch, Event, MetaData};
pub use exception::{ExceptionRecord, RawError};
pub use frame::{RawFrame, StackFrame};
pub use logger::Logger;
pub use payload::{Payload, NOTIFIER};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
