/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::payload
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Wrap an event with the notifier identity and API key and
    render the envelope to its JSON wire form.

  Security / Safety Notes:
    The envelope carries the API key; serialised bytes must
    only be handed to the transport, never logged.

  Dependencies:
    serde / serde_json for JSON serialization.

  Operational Scope:
    Pure construction step between event building and the
    HTTP transport.

  Revision History:
    2026-10-16 COD  Authored payload builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Pure functions of their inputs
    - Wire field names fixed by serde attributes
============================================================*/

use serde::{Deserialize, Serialize};

use crate::error::{NotifierError, Result};
use crate::event::Event;

/// Identifies this library to the notify endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotifierInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

pub const NOTIFIER: NotifierInfo = NotifierInfo {
    name: "Bugsnag Rust",
    version: env!("CARGO_PKG_VERSION"),
    url: "https://github.com/bugsnag/bugsnag-rust",
};

/// Owned notifier descriptor, as read back from a serialised payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierDescriptor {
    pub name: String,
    pub version: String,
    pub url: String,
}

impl From<NotifierInfo> for NotifierDescriptor {
    fn from(info: NotifierInfo) -> Self {
        Self {
            name: info.name.to_string(),
            version: info.version.to_string(),
            url: info.url.to_string(),
        }
    }
}

/// The complete request body for one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub api_key: String,
    pub notifier: NotifierDescriptor,
    pub events: Vec<Event>,
}

impl Payload {
    /// Envelope holding exactly one event.
    pub fn new(api_key: &str, event: Event) -> Self {
        Self {
            api_key: api_key.to_string(),
            notifier: NOTIFIER.into(),
            events: vec![event],
        }
    }

    /// Render the envelope as UTF-8 JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| {
            NotifierError::Serialization(format!("Failed to encode payload: {err}"))
        })
    }
}

/// Build and render the envelope in one step.
pub fn build_payload(api_key: &str, event: Event) -> Result<Vec<u8>> {
    Payload::new(api_key, event).to_json()
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::event::{build_event, BaseData, MetaData};
    use crate::exception::RawError;

    fn sample_event() -> Event {
        let base = BaseData {
            app_version: Some("1.4.0".into()),
            ..BaseData::default()
        };
        build_event(
            &base,
            &RawError::structural("TypeError", "boom", "a.js", 42).into(),
            MetaData::new(),
        )
    }

    #[test]
    fn renders_wire_shape() {
        let bytes = build_payload("key-123", sample_event()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_json_eq!(
            value,
            json!({
                "apiKey": "key-123",
                "notifier": {
                    "name": "Bugsnag Rust",
                    "version": env!("CARGO_PKG_VERSION"),
                    "url": "https://github.com/bugsnag/bugsnag-rust"
                },
                "events": [{
                    "appVersion": "1.4.0",
                    "exceptions": [{
                        "errorClass": "TypeError",
                        "message": "boom",
                        "stacktrace": [{"file": "a.js", "lineNumber": 42, "method": "n/a"}]
                    }],
                    "metaData": {}
                }]
            })
        );
    }

    #[test]
    fn parses_back_to_equal_payload() {
        let payload = Payload::new("key-123", sample_event());
        let bytes = payload.to_json().unwrap();
        let parsed: Payload = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, payload);
    }
}
