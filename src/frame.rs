/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::frame
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Normalise raw stack-trace entries into the uniform frame
    shape expected by the notify endpoint.

  Security / Safety Notes:
    Pure data transformation; no I/O performed in this module.

  Dependencies:
    serde for wire serialization.

  Operational Scope:
    Used by the exception serializer for every reported frame.

  Revision History:
    2026-10-16 COD  Introduced frame normaliser.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Total functions: absence is tolerated, never fatal
    - Clear data contracts between modules
============================================================*/

use serde::{Deserialize, Serialize};

/// Placeholder for a missing file or method name.
pub const MISSING: &str = "n/a";

/// Placeholder for a missing line number.
pub const MISSING_LINE: u32 = 1;

/// A trace entry as captured from an error source; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
}

impl RawFrame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            function: Some(function.into()),
        }
    }
}

/// Normalised frame; every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub file: String,
    pub line_number: u32,
    pub method: String,
}

impl StackFrame {
    /// The frame reported when a source carries no usable trace.
    pub fn sentinel() -> Self {
        Self {
            file: MISSING.to_string(),
            line_number: MISSING_LINE,
            method: MISSING.to_string(),
        }
    }

    /// Fill any gaps in `raw` with sentinel values.
    pub fn normalize(raw: &RawFrame) -> Self {
        Self {
            file: raw.file.clone().unwrap_or_else(|| MISSING.to_string()),
            // Line numbers are 1-based on the wire.
            line_number: raw.line.filter(|line| *line >= 1).unwrap_or(MISSING_LINE),
            method: raw
                .function
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Parse the rendered form of a `std::backtrace::Backtrace` into raw frames.
///
/// Each numbered symbol line opens a frame. Inlined callers are printed as
/// un-numbered symbol lines under the same index and open frames of their
/// own. An `at path:line:col` line fills in the location of the frame just
/// opened. Order is preserved (innermost first).
pub fn parse_backtrace(rendered: &str) -> Vec<RawFrame> {
    let mut frames: Vec<RawFrame> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_none() {
                    let (file, line) = split_location(location);
                    frame.file = Some(file.to_string());
                    frame.line = line;
                }
            }
            continue;
        }
        let symbol = match trimmed.split_once(": ") {
            Some((index, symbol))
                if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) =>
            {
                symbol
            }
            // Inlined symbols only count once a numbered frame has been seen.
            _ if !frames.is_empty() => trimmed,
            _ => continue,
        };
        frames.push(RawFrame {
            file: None,
            line: None,
            function: Some(symbol.trim().to_string()),
        });
    }
    frames
}

/// Split `path:line:col` (column optional) into the path and line.
fn split_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let head = parts.next();
    match (head, middle, last) {
        (Some(path), Some(line), Some(_col)) => (path, line.parse().ok()),
        (None, Some(path), Some(line)) => match line.parse() {
            Ok(line) => (path, Some(line)),
            Err(_) => (location, None),
        },
        _ => (location, None),
    }
}

impl From<&RawFrame> for StackFrame {
    fn from(raw: &RawFrame) -> Self {
        StackFrame::normalize(raw)
    }
}
