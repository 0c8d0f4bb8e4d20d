//! In-memory task table backing the server.
//!
//! The [`TaskTable`] owns the canonical task list and hands out monotonically
//! increasing ids. Listing returns newest-first, matching the order clients
//! display after prepending freshly created tasks.

use taskdeck_proto::task::{Task, TaskDraft, TaskId, TaskPatch, TaskQuery};
use tokio::sync::RwLock;

/// Thread-safe task storage with store-assigned ids.
pub struct TaskTable {
    inner: RwLock<TableInner>,
}

struct TableInner {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTable {
    /// Creates an empty table. The first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Returns the tasks matching `query`, newest first.
    pub async fn list(&self, query: &TaskQuery) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .iter()
            .rev()
            .filter(|task| query.matches(task))
            .cloned()
            .collect()
    }

    /// Returns a single task by id, if present.
    pub async fn get(&self, id: TaskId) -> Option<Task> {
        let inner = self.inner.read().await;
        inner.tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Inserts a new task from a draft, assigning the next id.
    ///
    /// The draft is assumed validated; missing optional fields take the
    /// store defaults (empty description, not completed).
    pub async fn create(&self, draft: TaskDraft) -> Task {
        let mut inner = self.inner.write().await;
        let id = TaskId::new(inner.next_id);
        inner.next_id += 1;
        let task = Task {
            id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            completed: draft.completed.unwrap_or(false),
        };
        inner.tasks.push(task.clone());
        task
    }

    /// Applies a patch to the task with the given id.
    ///
    /// Returns the updated task, or `None` if no task has that id.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Option<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.iter_mut().find(|task| task.id == id)?;
        task.apply_patch(patch);
        Some(task.clone())
    }

    /// Removes the task with the given id, returning whether it existed.
    pub async fn delete(&self, id: TaskId) -> bool {
        let mut inner = self.inner.write().await;
        let Some(position) = inner.tasks.iter().position(|task| task.id == id) else {
            return false;
        };
        inner.tasks.remove(position);
        true
    }

    /// Removes every task. Id assignment continues from where it was.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.tasks.clear();
    }

    /// Returns the number of stored tasks.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.tasks.len()
    }

    /// Returns `true` when no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
