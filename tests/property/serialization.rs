//! Property-based tests for the task wire types.
//!
//! Uses proptest to verify:
//! 1. Task records, patches, and queries survive JSON round-trips.
//! 2. The `{"data": ...}` and `{"task": ...}` envelopes wrap and unwrap
//!    any payload.
//! 3. Error bodies normalize predictably: arrays join with `", "`,
//!    `message` wins over `error`, and no input panics the decoders.
//! 4. Query matching respects its filter and case-insensitivity rules.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use taskdeck_proto::task::{
    self, MAX_TITLE_LENGTH, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, TaskQuery,
};
use taskdeck_proto::wire::{self, Envelope, ErrorBody, Messages, TaskPayload};

// --- Arbitrary implementations for wire types ---

/// Strategy for generating arbitrary `TaskId` values.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    any::<u64>().prop_map(TaskId::new)
}

/// Strategy for generating arbitrary `Task` records, including titles with
/// quotes, backslashes, and non-ASCII text.
fn arb_task() -> impl Strategy<Value = Task> {
    (arb_task_id(), ".{1,64}", ".{0,64}", any::<bool>()).prop_map(
        |(id, title, description, completed)| Task {
            id,
            title,
            description,
            completed,
        },
    )
}

/// Strategy for generating arbitrary `TaskDraft` values.
fn arb_draft() -> impl Strategy<Value = TaskDraft> {
    (
        ".{1,64}",
        prop::option::of(".{0,64}"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(title, description, completed)| TaskDraft {
            title,
            description,
            completed,
        })
}

/// Strategy for generating arbitrary `TaskPatch` values, including the
/// empty patch.
fn arb_patch() -> impl Strategy<Value = TaskPatch> {
    (
        prop::option::of(".{1,64}"),
        prop::option::of(".{0,64}"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(title, description, completed)| TaskPatch {
            title,
            description,
            completed,
        })
}

/// Strategy for generating arbitrary `TaskFilter` values.
fn arb_filter() -> impl Strategy<Value = TaskFilter> {
    prop_oneof![
        Just(TaskFilter::All),
        Just(TaskFilter::Pending),
        Just(TaskFilter::Completed),
    ]
}

/// Strategy for generating arbitrary `TaskQuery` values.
fn arb_query() -> impl Strategy<Value = TaskQuery> {
    (arb_filter(), "[a-zA-Z ]{0,12}").prop_map(|(filter, search)| TaskQuery { filter, search })
}

/// Strategy for generating arbitrary `Messages` values.
fn arb_messages() -> impl Strategy<Value = Messages> {
    prop_oneof![
        "[a-z ]{0,16}".prop_map(Messages::One),
        prop::collection::vec("[a-z ]{0,16}", 0..4).prop_map(Messages::Many),
    ]
}

/// Strategy for generating arbitrary `ErrorBody` values.
fn arb_error_body() -> impl Strategy<Value = ErrorBody> {
    (
        prop::option::of(arb_messages()),
        prop::option::of("[a-z ]{0,16}"),
    )
        .prop_map(|(message, error)| ErrorBody { message, error })
}

// --- Property tests ---

proptest! {
    /// Any task record survives a JSON round-trip.
    #[test]
    fn task_round_trip(task in arb_task()) {
        let json = serde_json::to_string(&task).expect("encode should succeed");
        let decoded: Task = serde_json::from_str(&json).expect("decode should succeed");
        prop_assert_eq!(task, decoded);
    }

    /// Any draft survives the `{"task": ...}` request wrapping.
    #[test]
    fn draft_payload_round_trip(draft in arb_draft()) {
        let payload = TaskPayload { task: draft };
        let json = serde_json::to_string(&payload).expect("encode should succeed");
        let decoded: TaskPayload<TaskDraft> =
            serde_json::from_str(&json).expect("decode should succeed");
        prop_assert_eq!(payload, decoded);
    }

    /// Any patch survives the `{"task": ...}` request wrapping, including
    /// the empty patch.
    #[test]
    fn patch_payload_round_trip(patch in arb_patch()) {
        let payload = TaskPayload { task: patch };
        let json = serde_json::to_string(&payload).expect("encode should succeed");
        let decoded: TaskPayload<TaskPatch> =
            serde_json::from_str(&json).expect("decode should succeed");
        prop_assert_eq!(payload, decoded);
    }

    /// Any query survives a JSON round-trip (the query-string shape).
    #[test]
    fn query_round_trip(query in arb_query()) {
        let json = serde_json::to_string(&query).expect("encode should succeed");
        let decoded: TaskQuery = serde_json::from_str(&json).expect("decode should succeed");
        prop_assert_eq!(query, decoded);
    }

    /// The `{"data": ...}` envelope unwraps whatever it wrapped.
    #[test]
    fn data_envelope_round_trip(task in arb_task()) {
        let json = serde_json::to_string(&Envelope { data: task.clone() })
            .expect("encode should succeed");
        let decoded: Task = wire::decode_data(&json).expect("decode should succeed");
        prop_assert_eq!(task, decoded);
    }

    /// Any error body survives a JSON round-trip, whichever fields it
    /// carries.
    #[test]
    fn error_body_round_trip(body in arb_error_body()) {
        let json = serde_json::to_string(&body).expect("encode should succeed");
        prop_assert_eq!(wire::decode_error(&json), body);
    }

    /// Message arrays always normalize to their comma-joined form.
    #[test]
    fn message_arrays_join_with_commas(messages in prop::collection::vec("[a-z ]{1,12}", 0..5)) {
        let body = ErrorBody::from_messages(messages.clone());
        prop_assert_eq!(body.normalized_message(), messages.join(", "));
    }

    /// `message` always wins over `error` when both are present.
    #[test]
    fn message_wins_over_error(message in "[a-z]{1,12}", error in "[a-z]{1,12}") {
        let body = ErrorBody {
            message: Some(Messages::One(message.clone())),
            error: Some(error),
        };
        prop_assert_eq!(body.normalized_message(), message);
    }

    /// The `error` field is used whenever `message` is absent.
    #[test]
    fn error_field_used_when_message_absent(error in ".{1,32}") {
        let body = ErrorBody { message: None, error: Some(error.clone()) };
        prop_assert_eq!(body.normalized_message(), error);
    }

    /// Arbitrary text never panics the success decoder — it returns Err
    /// gracefully.
    #[test]
    fn decode_data_no_panic(body in ".{0,256}") {
        // We don't care if it returns Ok or Err, just that it doesn't panic.
        let _ = wire::decode_data::<Task>(&body);
    }

    /// Arbitrary text never panics the error decoder, and always yields a
    /// normalized message.
    #[test]
    fn decode_error_no_panic(body in ".{0,256}") {
        let _ = wire::decode_error(&body).normalized_message();
    }

    /// The completed filter accepts exactly the completed tasks.
    #[test]
    fn completed_filter_accepts_only_completed(task in arb_task()) {
        let query = TaskQuery::new(TaskFilter::Completed, "");
        prop_assert_eq!(query.matches(&task), task.completed);
    }

    /// The pending filter is the exact complement of the completed filter.
    #[test]
    fn pending_filter_accepts_only_pending(task in arb_task()) {
        let query = TaskQuery::new(TaskFilter::Pending, "");
        prop_assert_eq!(query.matches(&task), !task.completed);
    }

    /// Changing the case of an ASCII needle never changes the match outcome.
    #[test]
    fn search_outcome_ignores_needle_case(task in arb_task(), needle in "[a-zA-Z]{1,8}") {
        let lower = TaskQuery::new(TaskFilter::All, needle.to_lowercase());
        let upper = TaskQuery::new(TaskFilter::All, needle.to_uppercase());
        prop_assert_eq!(lower.matches(&task), upper.matches(&task));
    }

    /// A task always matches a substring of its own title, whatever the
    /// substring's case.
    #[test]
    fn ascii_title_substring_always_matches(title in "[a-zA-Z]{3,20}", completed in any::<bool>()) {
        let task = Task {
            id: TaskId::new(1),
            title: title.clone(),
            description: String::new(),
            completed,
        };
        let query = TaskQuery::new(TaskFilter::All, title[1..3].to_uppercase());
        prop_assert!(query.matches(&task));
    }

    /// The default query (all, no search) matches every task.
    #[test]
    fn default_query_matches_everything(task in arb_task()) {
        prop_assert!(TaskQuery::default().matches(&task));
    }

    /// Drafts within the documented limits produce no violations.
    #[test]
    fn drafts_within_limits_validate_cleanly(
        title in "[a-zA-Z ]{1,255}",
        description in prop::option::of("[a-zA-Z ]{0,200}"),
    ) {
        let draft = TaskDraft { title, description, completed: None };
        prop_assert!(task::validate_draft(&draft).is_empty());
    }

    /// Oversized titles are always rejected, however far over the limit.
    #[test]
    fn oversized_titles_are_always_rejected(extra in 1_usize..64) {
        let draft = TaskDraft::new("x".repeat(MAX_TITLE_LENGTH + extra));
        let violations = task::validate_draft(&draft);
        prop_assert_eq!(violations.len(), 1);
        prop_assert!(violations[0].contains("title"));
    }
}
