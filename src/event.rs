/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::event
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Assemble one reportable event from the session base data,
    the serialised exceptions, and per-call metadata.

  Security / Safety Notes:
    Metadata is attached verbatim; nothing is redacted here.

  Dependencies:
    serde / serde_json for the event document.

  Operational Scope:
    Called by the client once per `notify` invocation.

  Revision History:
    2026-10-16 COD  Authored event builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Input order preserved for every exception
    - Optional session fields omitted rather than nulled
============================================================*/

use std::error::Error;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NotifierError, Result};
use crate::exception::{ExceptionRecord, RawError};

/// Free-form metadata attached to a single event.
pub type MetaData = Map<String, Value>;

/// Session-level fields merged into every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// One reported occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub base: BaseData,
    pub exceptions: Vec<ExceptionRecord>,
    pub meta_data: MetaData,
}

/// A non-empty, ordered group of errors reported together in one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBatch {
    errors: Vec<RawError>,
}

impl ErrorBatch {
    pub fn new(first: RawError) -> Self {
        Self {
            errors: vec![first],
        }
    }

    /// Append another error after those already in the batch.
    pub fn push(&mut self, error: RawError) -> &mut Self {
        self.errors.push(error);
        self
    }

    /// One entry per link of the `source()` chain, outermost first.
    pub fn from_error_chain<E: Error + 'static>(err: &E) -> Self {
        let mut batch = ErrorBatch::new(RawError::from_error(err));
        let mut next = err.source();
        while let Some(source) = next {
            batch.push(RawError::from_dyn_error(source));
            next = source.source();
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawError> {
        self.errors.iter()
    }
}

impl From<RawError> for ErrorBatch {
    fn from(error: RawError) -> Self {
        ErrorBatch::new(error)
    }
}

impl TryFrom<Vec<RawError>> for ErrorBatch {
    type Error = NotifierError;

    fn try_from(errors: Vec<RawError>) -> Result<Self> {
        if errors.is_empty() {
            return Err(NotifierError::EmptyBatch);
        }
        Ok(Self { errors })
    }
}

impl<'a> IntoIterator for &'a ErrorBatch {
    type Item = &'a RawError;
    type IntoIter = std::slice::Iter<'a, RawError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Build an event from the session data, the errors, and the call metadata.
pub fn build_event(base: &BaseData, errors: &ErrorBatch, meta_data: MetaData) -> Event {
    let exceptions = errors.iter().map(ExceptionRecord::from_raw).collect();
    Event {
        base: base.clone(),
        exceptions,
        meta_data,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(value: Value) -> MetaData {
        match value {
            Value::Object(map) => map,
            _ => MetaData::new(),
        }
    }

    #[test]
    fn single_error_matches_one_element_batch() {
        let error = RawError::native("Panic", "boom", vec![]);
        let single = build_event(&BaseData::default(), &error.clone().into(), MetaData::new());
        let batch = ErrorBatch::try_from(vec![error]).unwrap();
        let wrapped = build_event(&BaseData::default(), &batch, MetaData::new());
        assert_eq!(single, wrapped);
        assert_eq!(single.exceptions.len(), 1);
    }

    #[test]
    fn exceptions_follow_input_order() {
        let batch = ErrorBatch::try_from(vec![
            RawError::native("First", "a", vec![]),
            RawError::structural("Second", "b", "b.js", 2),
        ])
        .unwrap();
        let event = build_event(&BaseData::default(), &batch, MetaData::new());
        let classes: Vec<&str> = event
            .exceptions
            .iter()
            .map(|e| e.error_class.as_str())
            .collect();
        assert_eq!(classes, vec!["First", "Second"]);
    }

    #[test]
    fn empty_vec_is_rejected() {
        assert!(matches!(
            ErrorBatch::try_from(Vec::<RawError>::new()),
            Err(NotifierError::EmptyBatch)
        ));
    }

    #[test]
    fn only_set_base_fields_are_serialized() {
        let base = BaseData {
            user_id: Some("u-1".into()),
            release_stage: Some("production".into()),
            ..BaseData::default()
        };
        let event = build_event(
            &base,
            &RawError::native("Panic", "boom", vec![]).into(),
            meta(json!({"request": {"path": "/"}})),
        );
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["userId"], "u-1");
        assert_eq!(object["releaseStage"], "production");
        assert!(!object.contains_key("appVersion"));
        assert!(!object.contains_key("context"));
        assert_eq!(object["metaData"], json!({"request": {"path": "/"}}));
    }

    #[derive(Debug)]
    struct ConfigLoad {
        inner: std::num::ParseIntError,
    }

    impl std::fmt::Display for ConfigLoad {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "failed to load config")
        }
    }

    impl Error for ConfigLoad {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    #[test]
    fn error_chain_is_walked_outermost_first() {
        let err = ConfigLoad {
            inner: "x".parse::<u8>().unwrap_err(),
        };
        let batch = ErrorBatch::from_error_chain(&err);
        assert_eq!(batch.len(), 2);
        match batch.iter().next() {
            Some(RawError::Native { message, .. }) => assert_eq!(message, "failed to load config"),
            other => panic!("unexpected entry {other:?}"),
        }
        match batch.iter().nth(1) {
            Some(RawError::Native { error_class, .. }) => {
                assert_eq!(error_class, "core::num::error::ParseIntError")
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }
}
