//! Property tests for frame normalisation and payload encoding.

use bugsnag_notifier::{
    BaseData, ErrorBatch, ExceptionRecord, MetaData, Payload, RawError, RawFrame, StackFrame,
};
use bugsnag_notifier::event::build_event;
use proptest::prelude::*;
use serde_json::Value;

fn raw_frame() -> impl Strategy<Value = RawFrame> {
    (
        proptest::option::of("[a-z/]{1,16}\\.rs"),
        proptest::option::of(0u32..10_000),
        proptest::option::of("[a-z_:]{1,24}"),
    )
        .prop_map(|(file, line, function)| RawFrame {
            file,
            line,
            function,
        })
}

proptest! {
    #[test]
    fn stacktrace_has_max_n_1_complete_frames(frames in prop::collection::vec(raw_frame(), 0..32)) {
        let expected = frames.len().max(1);
        let record = ExceptionRecord::from_raw(&RawError::native("Panic", "boom", frames.clone()));

        prop_assert_eq!(record.stacktrace.len(), expected);
        for frame in &record.stacktrace {
            prop_assert!(!frame.file.is_empty());
            prop_assert!(!frame.method.is_empty());
            prop_assert!(frame.line_number >= 1);
        }
        if frames.is_empty() {
            prop_assert_eq!(&record.stacktrace[0], &StackFrame::sentinel());
        }
    }

    #[test]
    fn payload_json_round_trips(
        message in "\\PC{0,64}",
        user_id in proptest::option::of("[a-z0-9-]{1,12}"),
        frames in prop::collection::vec(raw_frame(), 0..8),
    ) {
        let base = BaseData { user_id, ..BaseData::default() };
        let batch = ErrorBatch::new(RawError::native("Panic", message, frames));
        let payload = Payload::new("key", build_event(&base, &batch, MetaData::new()));

        let bytes = payload.to_json().unwrap();
        let tree: Value = serde_json::from_slice(&bytes).unwrap();
        let reparsed: Payload = serde_json::from_value(tree.clone()).unwrap();

        prop_assert_eq!(&reparsed, &payload);
        prop_assert_eq!(serde_json::to_value(&reparsed).unwrap(), tree);
    }
}
