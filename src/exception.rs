/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::exception
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Model the errors handed to the notifier and serialise each
    one into an exception record for the event payload.

  Security / Safety Notes:
    Messages are forwarded verbatim; callers are responsible
    for scrubbing secrets before reporting.

  Dependencies:
    serde for wire serialization, std::backtrace for capture.

  Operational Scope:
    Consumed by the event builder once per reported error.

  Revision History:
    2026-10-16 COD  Authored exception serializer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Tagged variants instead of field probing
    - Non-empty stack traces for every record
============================================================*/

use std::any::type_name;
use std::backtrace::Backtrace;
use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::frame::{parse_backtrace, RawFrame, StackFrame};

/// Class reported for erased errors of an unrecognised type.
pub const FALLBACK_CLASS: &str = "Error";

/// An error as supplied by an error source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawError {
    /// A native error with its own ordered trace (innermost first).
    Native {
        error_class: String,
        message: String,
        frames: Vec<RawFrame>,
    },
    /// A single-location error description, e.g. forwarded from a browser.
    Structural {
        error_type: String,
        message: String,
        file: String,
        line: u32,
    },
}

impl RawError {
    pub fn native(
        error_class: impl Into<String>,
        message: impl Into<String>,
        frames: Vec<RawFrame>,
    ) -> Self {
        RawError::Native {
            error_class: error_class.into(),
            message: message.into(),
            frames,
        }
    }

    pub fn structural(
        error_type: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        RawError::Structural {
            error_type: error_type.into(),
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Describe a typed Rust error; the class is its type name.
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        RawError::native(type_name::<E>(), err.to_string(), Vec::new())
    }

    /// Describe an error reached through `Error::source`, where the concrete
    /// type is erased. Well-known error types keep their type name; anything
    /// else is reported as `Error`.
    pub fn from_dyn_error(err: &(dyn Error + 'static)) -> Self {
        RawError::native(erased_class(err), err.to_string(), Vec::new())
    }

    /// Describe an error and attach a backtrace captured at the call site.
    pub fn capture(error_class: impl Into<String>, message: impl Into<String>) -> Self {
        let rendered = Backtrace::force_capture().to_string();
        RawError::native(error_class, message, parse_backtrace(&rendered))
    }

    /// Replace the trace of a native error; structural errors are unchanged.
    pub fn with_frames(self, new_frames: Vec<RawFrame>) -> Self {
        match self {
            RawError::Native {
                error_class,
                message,
                ..
            } => RawError::Native {
                error_class,
                message,
                frames: new_frames,
            },
            other => other,
        }
    }
}

/// Class of a type-erased error: the type name when it is one of the
/// well-known error types, `Error` otherwise.
fn erased_class(err: &(dyn Error + 'static)) -> String {
    macro_rules! known {
        ($($ty:ty),+ $(,)?) => {
            $(
                if err.downcast_ref::<$ty>().is_some() {
                    return type_name::<$ty>().to_string();
                }
            )+
        };
    }
    known!(
        std::io::Error,
        std::fmt::Error,
        std::num::ParseIntError,
        std::num::ParseFloatError,
        std::num::TryFromIntError,
        std::str::ParseBoolError,
        std::str::Utf8Error,
        std::string::FromUtf8Error,
        std::net::AddrParseError,
        std::time::SystemTimeError,
        serde_json::Error,
        toml::de::Error,
        crate::error::NotifierError,
    );
    FALLBACK_CLASS.to_string()
}

/// One serialised exception inside an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRecord {
    pub error_class: String,
    pub message: String,
    pub stacktrace: Vec<StackFrame>,
}

impl ExceptionRecord {
    /// Serialise a raw error. The resulting stacktrace is never empty.
    pub fn from_raw(raw: &RawError) -> Self {
        match raw {
            RawError::Native {
                error_class,
                message,
                frames,
            } => {
                let mut stacktrace: Vec<StackFrame> =
                    frames.iter().map(StackFrame::normalize).collect();
                if stacktrace.is_empty() {
                    stacktrace.push(StackFrame::sentinel());
                }
                Self {
                    error_class: error_class.clone(),
                    message: message.clone(),
                    stacktrace,
                }
            }
            RawError::Structural {
                error_type,
                message,
                file,
                line,
            } => Self {
                error_class: error_type.clone(),
                message: message.clone(),
                stacktrace: vec![StackFrame::normalize(&RawFrame {
                    file: Some(file.clone()),
                    line: Some(*line),
                    function: None,
                })],
            },
        }
    }
}

impl From<&RawError> for ExceptionRecord {
    fn from(raw: &RawError) -> Self {
        ExceptionRecord::from_raw(raw)
    }
}
