//! In-process gateway for testing and offline sessions.
//!
//! Behaves like the remote store: assigns ids, applies the same validation
//! rules, honors the query, and answers newest-first. Cloning yields a second
//! handle onto the same table, which lets tests keep a grip on the "server
//! side" while the store owns the other handle. A queued failure makes the
//! next call error, which is how rollback paths are exercised.

use std::sync::Arc;

use taskdeck_proto::task::{self, Task, TaskDraft, TaskId, TaskPatch, TaskQuery};
use tokio::sync::Mutex;

use super::{GatewayError, TaskGateway};

/// Gateway backed by an in-memory task table.
#[derive(Clone)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryInner>>,
}

struct MemoryInner {
    tasks: Vec<Task>,
    next_id: u64,
    fail_next: Option<String>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    /// Creates an empty gateway. The first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                tasks: Vec::new(),
                next_id: 1,
                fail_next: None,
            })),
        }
    }

    /// Queues a failure: the next gateway call (any operation) returns an
    /// error carrying this message, then normal behavior resumes.
    pub async fn fail_next(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.fail_next = Some(message.into());
    }

    /// Returns the backing table newest-first, bypassing any query.
    pub async fn stored(&self) -> Vec<Task> {
        let inner = self.inner.lock().await;
        inner.tasks.iter().rev().cloned().collect()
    }

    /// Returns the number of stored tasks.
    pub async fn stored_len(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.tasks.len()
    }
}

impl MemoryInner {
    fn take_failure(&mut self) -> Result<(), GatewayError> {
        if let Some(message) = self.fail_next.take() {
            return Err(GatewayError::Api {
                status: 500,
                message,
            });
        }
        Ok(())
    }
}

impl TaskGateway for MemoryGateway {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        Ok(inner
            .tasks
            .iter()
            .rev()
            .filter(|task| query.matches(task))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let violations = task::validate_draft(draft);
        if !violations.is_empty() {
            return Err(GatewayError::Api {
                status: 400,
                message: violations.join(", "),
            });
        }

        let id = TaskId::new(inner.next_id);
        inner.next_id += 1;
        let created = Task {
            id,
            title: draft.title.clone(),
            description: draft.description.clone().unwrap_or_default(),
            completed: draft.completed.unwrap_or(false),
        };
        inner.tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let violations = task::validate_patch(patch);
        if !violations.is_empty() {
            return Err(GatewayError::Api {
                status: 400,
                message: violations.join(", "),
            });
        }

        let Some(stored) = inner.tasks.iter_mut().find(|task| task.id == id) else {
            return Err(GatewayError::Api {
                status: 404,
                message: format!("task {id} not found"),
            });
        };
        stored.apply_patch(patch);
        Ok(stored.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<bool, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;

        let Some(position) = inner.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };
        inner.tasks.remove(position);
        Ok(true)
    }
}
