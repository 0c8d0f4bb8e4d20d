//! Task state store: optimistic mutation with rollback against a gateway.
//!
//! [`TaskStore`] keeps the in-memory task collection consistent with the
//! remote store for the current filter/search query. Every mutation applies
//! its expected effect locally before the gateway call is issued; when the
//! call fails, a snapshot captured up front is applied as compensation and
//! the failure message lands in the store's single error slot.

use taskdeck_proto::task::{Task, TaskDraft, TaskId, TaskPatch, TaskQuery};

use crate::gateway::{GatewayError, TaskGateway};

/// Compensation for one optimistic mutation, captured before the local
/// state changes and applied only when the gateway call fails.
///
/// Every variant tolerates a collection the snapshot no longer fits (for
/// example an id removed while the call was in flight): restoring a missing
/// id is a no-op, and a removed record is re-appended at the end rather
/// than at its original position.
enum Rollback {
    /// Restore the prior `completed` flag of one task.
    Completed {
        /// Task whose flag was flipped.
        id: TaskId,
        /// Value to restore.
        completed: bool,
    },
    /// Restore the full pre-update record, if the id is still present.
    Record(Task),
    /// Re-append a removed record at the end of the collection.
    Removed(Task),
}

impl Rollback {
    fn apply(self, tasks: &mut Vec<Task>) {
        match self {
            Self::Completed { id, completed } => {
                if let Some(task) = tasks.iter_mut().find(|task| task.id == id) {
                    task.completed = completed;
                }
            }
            Self::Record(snapshot) => {
                if let Some(task) = tasks.iter_mut().find(|task| task.id == snapshot.id) {
                    *task = snapshot;
                }
            }
            Self::Removed(record) => tasks.push(record),
        }
    }
}

/// Client-side view of the remote task collection for one query.
///
/// The store owns a materialized snapshot of the tasks matching its current
/// [`TaskQuery`]; changing the query discards the snapshot and fetches a
/// fresh one. Mutations are optimistic: the collection changes synchronously
/// before the gateway call suspends, so a caller rendering between
/// operations always sees the intended state. Failures never propagate out
/// of the operations — they are converted into the error slot, which holds
/// at most one message and is cleared at the start of the next reload (not
/// by later successful mutations).
///
/// Operations take `&mut self`: a store is driven from one logical flow at
/// a time and suspends only while awaiting the gateway.
///
/// # Known limitations
///
/// There is no request cancellation and no cross-operation ordering. Two
/// mutations on the same id issued back to back can race their rollbacks in
/// completion order, a reload racing a mutation may overwrite it, and a
/// superseded reload's response is still applied when it eventually
/// arrives. Callers needing stronger ordering must serialize their calls.
pub struct TaskStore<G: TaskGateway> {
    gateway: G,
    query: TaskQuery,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl<G: TaskGateway> TaskStore<G> {
    /// Creates a store over a gateway with an initial query.
    ///
    /// The collection starts empty with the loading flag set; the caller is
    /// expected to run the first [`reload`](Self::reload).
    #[must_use]
    pub const fn new(gateway: G, query: TaskQuery) -> Self {
        Self {
            gateway,
            query,
            tasks: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// The current task collection, in gateway response order except that
    /// newly created tasks sit at the front until the next reload.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether a loud reload is pending.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// The most recent failure message, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The query the current collection was materialized for.
    #[must_use]
    pub const fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// Replaces the whole collection from the gateway, showing the loading
    /// flag while the request is in flight.
    ///
    /// Clears the error slot up front. On failure the collection is left
    /// untouched and the failure message fills the slot.
    pub async fn reload(&mut self) {
        self.load(true).await;
    }

    /// Reloads without touching the loading flag, for refreshes behind an
    /// already rendered collection. Still clears the error slot.
    pub async fn refresh(&mut self) {
        self.load(false).await;
    }

    /// Replaces the query and reloads the collection under it.
    pub async fn set_query(&mut self, query: TaskQuery) {
        self.query = query;
        self.reload().await;
    }

    async fn load(&mut self, show_loading: bool) {
        if show_loading {
            self.loading = true;
        }
        self.error = None;

        match self.gateway.list(&self.query).await {
            Ok(tasks) => {
                tracing::debug!(
                    filter = %self.query.filter,
                    search = %self.query.search,
                    count = tasks.len(),
                    "collection reloaded"
                );
                self.tasks = tasks;
            }
            Err(error) => self.fail("list", error),
        }

        if show_loading {
            self.loading = false;
        }
    }

    /// Creates a task and, on success, prepends the stored record (with its
    /// assigned id) to the collection.
    ///
    /// There is no local echo before the gateway answers: nothing can be
    /// shown without an id. The draft is sent as given — trimming and
    /// rejecting empty titles is the caller's responsibility, and a draft
    /// the gateway rejects surfaces through the error slot like any other
    /// failure.
    pub async fn add_task(&mut self, draft: &TaskDraft) {
        match self.gateway.create(draft).await {
            Ok(created) => {
                tracing::debug!(id = %created.id, "task created");
                self.tasks.insert(0, created);
            }
            Err(error) => self.fail("create", error),
        }
    }

    /// Flips `completed` for the task matching `task.id`, reconciling with
    /// the gateway in the background.
    ///
    /// The flip is applied synchronously before the call suspends. On
    /// failure the flag is reverted to `task.completed`; a task that has
    /// meanwhile vanished from the collection makes the revert a no-op.
    pub async fn toggle_task(&mut self, task: &Task) {
        let rollback = Rollback::Completed {
            id: task.id,
            completed: task.completed,
        };
        if let Some(stored) = self.find_mut(task.id) {
            stored.completed = !stored.completed;
        }

        let patch = TaskPatch::default().completed(!task.completed);
        if let Err(error) = self.gateway.update(task.id, &patch).await {
            rollback.apply(&mut self.tasks);
            self.fail("toggle", error);
        }
    }

    /// Merges `patch` into the task with this id and sends it as a partial
    /// update.
    ///
    /// The full pre-update record is captured first; on failure it is
    /// restored whole (not just the patched fields) if the id still exists.
    /// When the id is not in the collection the patch is still sent — the
    /// gateway may know tasks the current snapshot does not show.
    pub async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) {
        let rollback = self.find_mut(id).map(|stored| {
            let snapshot = stored.clone();
            stored.apply_patch(patch);
            Rollback::Record(snapshot)
        });

        if let Err(error) = self.gateway.update(id, patch).await {
            if let Some(rollback) = rollback {
                rollback.apply(&mut self.tasks);
            }
            self.fail("update", error);
        }
    }

    /// Removes the task with this id and sends the delete.
    ///
    /// The removed record is captured first; on failure it is re-appended
    /// at the end of the collection (the original position is not
    /// restored). A gateway answer of `Ok(false)` — the store declined, for
    /// example because the id was already gone — keeps the record removed
    /// and surfaces no error.
    pub async fn delete_task(&mut self, id: TaskId) {
        let position = self.tasks.iter().position(|task| task.id == id);
        let rollback = position.map(|index| Rollback::Removed(self.tasks.remove(index)));

        match self.gateway.delete(id).await {
            Ok(true) => tracing::debug!(%id, "task deleted"),
            Ok(false) => tracing::debug!(%id, "delete not confirmed by the store"),
            Err(error) => {
                if let Some(rollback) = rollback {
                    rollback.apply(&mut self.tasks);
                }
                self.fail("delete", error);
            }
        }
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn fail(&mut self, operation: &str, error: GatewayError) {
        tracing::warn!(%operation, %error, "gateway call failed");
        self.error = Some(error.to_string());
    }
}
