//! Integration tests for the task store's optimistic mutation semantics.
//!
//! Drives [`TaskStore`] against the in-memory gateway and checks the
//! consistency properties the client relies on: flip parity for toggles,
//! prepend-on-create with fresh ids, exact rollback on failure (with the
//! delete quirk of re-appending at the end), the single error slot, and
//! the loading flag spanning only loud reloads.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use taskdeck::gateway::{GatewayError, MemoryGateway, TaskGateway};
use taskdeck::store::TaskStore;
use taskdeck_proto::task::{Task, TaskDraft, TaskFilter, TaskId, TaskPatch, TaskQuery};

/// Builds a store over a seeded gateway and runs the initial reload. The
/// returned gateway handle shares the table behind the store.
async fn loaded_store(titles: &[&str]) -> (TaskStore<MemoryGateway>, MemoryGateway) {
    let gateway = MemoryGateway::new();
    for title in titles {
        gateway.create(&TaskDraft::new(*title)).await.unwrap();
    }
    let mut store = TaskStore::new(gateway.clone(), TaskQuery::default());
    store.reload().await;
    (store, gateway)
}

// --- toggle parity ---

#[tokio::test]
async fn toggle_sequence_has_flip_parity() {
    let (mut store, _gateway) = loaded_store(&["Buy milk"]).await;
    let original = store.tasks()[0].completed;

    for flips in 1..=5_u32 {
        let task = store.tasks()[0].clone();
        store.toggle_task(&task).await;
        assert!(store.last_error().is_none());

        let expected = original ^ (flips % 2 == 1);
        assert_eq!(store.tasks()[0].completed, expected, "after {flips} flips");
    }
}

#[tokio::test]
async fn failed_toggle_keeps_parity_at_zero() {
    let (mut store, gateway) = loaded_store(&["Buy milk"]).await;

    gateway.fail_next("network unreachable").await;
    let task = store.tasks()[0].clone();
    store.toggle_task(&task).await;

    // The optimistic flip and its revert cancel out.
    assert!(!store.tasks()[0].completed);
    assert_eq!(store.last_error(), Some("network unreachable"));
    assert!(!gateway.stored().await[0].completed);
}

// --- create placement and identity ---

#[tokio::test]
async fn created_task_lands_at_the_front_with_a_fresh_id() {
    let (mut store, _gateway) = loaded_store(&["first", "second"]).await;

    store.add_task(&TaskDraft::new("third")).await;

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].title, "third");
    let new_id = tasks[0].id;
    assert_eq!(tasks.iter().filter(|t| t.id == new_id).count(), 1);
}

#[tokio::test]
async fn collection_never_holds_duplicate_ids() {
    let (mut store, gateway) = loaded_store(&["a", "b", "c"]).await;

    // A failed delete re-appends its record; a failed toggle reverts in
    // place. Neither may duplicate an id.
    let id = store.tasks()[0].id;
    gateway.fail_next("boom").await;
    store.delete_task(id).await;

    let task = store.tasks().iter().find(|t| t.id == id).unwrap().clone();
    gateway.fail_next("boom").await;
    store.toggle_task(&task).await;

    store.add_task(&TaskDraft::new("d")).await;

    let mut ids: Vec<u64> = store.tasks().iter().map(|t| t.id.as_u64()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.tasks().len());
}

// --- rollback restores the pre-mutation collection ---

#[tokio::test]
async fn failed_update_restores_the_exact_prior_collection() {
    let gateway = MemoryGateway::new();
    gateway
        .create(&TaskDraft::new("keep me").with_description("with a body"))
        .await
        .unwrap();
    gateway.create(&TaskDraft::new("bystander")).await.unwrap();
    let mut store = TaskStore::new(gateway.clone(), TaskQuery::default());
    store.reload().await;
    let before: Vec<Task> = store.tasks().to_vec();
    let id = before[1].id;

    gateway.fail_next("simulated outage").await;
    store
        .update_task(
            id,
            &TaskPatch::default()
                .title("changed")
                .description("changed too")
                .completed(true),
        )
        .await;

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.last_error(), Some("simulated outage"));
}

#[tokio::test]
async fn failed_delete_restores_content_with_the_record_at_the_end() {
    let (mut store, gateway) = loaded_store(&["a", "b", "c"]).await;
    let before: Vec<Task> = store.tasks().to_vec();
    let victim = before[0].clone();

    gateway.fail_next("simulated outage").await;
    store.delete_task(victim.id).await;

    // Same records, but the rolled-back one sits at the end instead of
    // its original position.
    let after = store.tasks();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], before[1]);
    assert_eq!(after[1], before[2]);
    assert_eq!(after[2], victim);
    assert_eq!(store.last_error(), Some("simulated outage"));
}

// --- reload scenarios ---

#[tokio::test]
async fn pending_reload_replaces_the_whole_collection() {
    let gateway = MemoryGateway::new();
    gateway
        .create(&TaskDraft::new("Buy milk").with_completed(true))
        .await
        .unwrap();
    gateway.create(&TaskDraft::new("Write report")).await.unwrap();

    let mut store = TaskStore::new(gateway.clone(), TaskQuery::default());
    store.reload().await;
    assert_eq!(store.tasks().len(), 2);

    // Plant an error so the query change is also seen clearing it.
    gateway.fail_next("transient").await;
    store.refresh().await;
    gateway.fail_next("planted").await;
    store.add_task(&TaskDraft::new("fails")).await;
    assert_eq!(store.last_error(), Some("planted"));

    store
        .set_query(TaskQuery::new(TaskFilter::Pending, ""))
        .await;

    assert!(!store.loading());
    assert!(store.last_error().is_none());
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(2));
    assert_eq!(tasks[0].title, "Write report");
    assert!(!tasks[0].completed);
}

#[tokio::test]
async fn search_reload_matches_title_or_description_case_insensitively() {
    let gateway = MemoryGateway::new();
    gateway.create(&TaskDraft::new("Buy MILK")).await.unwrap();
    gateway
        .create(&TaskDraft::new("Groceries").with_description("oat milk, bread"))
        .await
        .unwrap();
    gateway.create(&TaskDraft::new("Write report")).await.unwrap();

    let mut store = TaskStore::new(gateway, TaskQuery::new(TaskFilter::All, "milk"));
    store.reload().await;

    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Groceries", "Buy MILK"]);
}

#[tokio::test]
async fn loading_flag_spans_only_loud_reloads() {
    let gateway = MemoryGateway::new();
    let mut store = TaskStore::new(gateway.clone(), TaskQuery::default());
    assert!(store.loading(), "construction leaves the flag set");

    // A silent refresh never touches the flag.
    store.refresh().await;
    assert!(store.loading());

    store.reload().await;
    assert!(!store.loading());

    // Mutations never touch it either, success or failure.
    store.add_task(&TaskDraft::new("a")).await;
    assert!(!store.loading());
    gateway.fail_next("boom").await;
    store.add_task(&TaskDraft::new("b")).await;
    assert!(!store.loading());
}

// --- the single error slot ---

#[tokio::test]
async fn error_slot_holds_one_message_until_the_next_reload() {
    let (mut store, gateway) = loaded_store(&["anchor"]).await;

    gateway.fail_next("first failure").await;
    store.add_task(&TaskDraft::new("x")).await;
    assert_eq!(store.last_error(), Some("first failure"));

    // A later failure overwrites the slot.
    gateway.fail_next("second failure").await;
    store.add_task(&TaskDraft::new("y")).await;
    assert_eq!(store.last_error(), Some("second failure"));

    // A successful mutation leaves it alone.
    store.add_task(&TaskDraft::new("z")).await;
    assert_eq!(store.last_error(), Some("second failure"));

    // Only the next reload clears it.
    store.reload().await;
    assert!(store.last_error().is_none());
}

// --- optimistic visibility ---

/// Gateway whose mutations never answer, so tests can observe the local
/// state an operation produced before it suspended.
struct StalledMutations {
    tasks: Vec<Task>,
}

impl TaskGateway for StalledMutations {
    async fn list(&self, _query: &TaskQuery) -> Result<Vec<Task>, GatewayError> {
        Ok(self.tasks.clone())
    }

    async fn create(&self, _draft: &TaskDraft) -> Result<Task, GatewayError> {
        std::future::pending().await
    }

    async fn update(&self, _id: TaskId, _patch: &TaskPatch) -> Result<Task, GatewayError> {
        std::future::pending().await
    }

    async fn delete(&self, _id: TaskId) -> Result<bool, GatewayError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn optimistic_mutation_is_applied_before_the_call_suspends() {
    let task = Task {
        id: TaskId::new(1),
        title: "Buy milk".to_string(),
        description: String::new(),
        completed: false,
    };
    let gateway = StalledMutations {
        tasks: vec![task.clone()],
    };
    let mut store = TaskStore::new(gateway, TaskQuery::default());
    store.reload().await;

    // The gateway never answers; give up quickly and inspect what the
    // optimistic step already did.
    let toggled = tokio::time::timeout(Duration::from_millis(20), store.toggle_task(&task)).await;
    assert!(toggled.is_err(), "toggle must still be waiting on the gateway");
    assert!(store.tasks()[0].completed);

    let deleted = tokio::time::timeout(Duration::from_millis(20), store.delete_task(task.id)).await;
    assert!(deleted.is_err(), "delete must still be waiting on the gateway");
    assert!(store.tasks().is_empty());
}
