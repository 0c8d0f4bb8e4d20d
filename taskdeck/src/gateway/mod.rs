//! Gateway layer abstraction for the remote task store.
//!
//! Defines the [`TaskGateway`] trait that all gateway implementations must
//! satisfy. Concrete implementations include:
//! - [`http::HttpGateway`] — reqwest-based client for the REST task API
//! - [`memory::MemoryGateway`] — in-process table for tests and offline use

pub mod http;
pub mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

use taskdeck_proto::task::{Task, TaskDraft, TaskId, TaskPatch, TaskQuery};
use taskdeck_proto::wire::WireError;

/// Errors that can occur during gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The store answered with an error status. `message` is already
    /// normalized into a single human-readable string.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response (0 for non-HTTP gateways).
        status: u16,
        /// Normalized error text.
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected envelope.
    #[error("{0}")]
    Decode(#[from] WireError),
}

/// Async CRUD contract against the remote task store.
///
/// Implementations translate the four operations into whatever the backing
/// store speaks. Callers treat the gateway as the source of truth: created
/// and updated tasks come back in their server-assigned form.
pub trait TaskGateway: Send + Sync {
    /// Fetch the tasks matching a query.
    fn list(
        &self,
        query: &TaskQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, GatewayError>> + Send;

    /// Create a task from a draft, returning the stored record with its
    /// assigned id.
    fn create(
        &self,
        draft: &TaskDraft,
    ) -> impl std::future::Future<Output = Result<Task, GatewayError>> + Send;

    /// Apply a partial update to the task with the given id, returning the
    /// updated record.
    fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl std::future::Future<Output = Result<Task, GatewayError>> + Send;

    /// Delete the task with the given id.
    ///
    /// Returns `Ok(true)` when the store confirmed the removal and
    /// `Ok(false)` when it answered with a non-success status (for example,
    /// the id was already gone). `Err` is reserved for requests that never
    /// produced an answer at all.
    fn delete(
        &self,
        id: TaskId,
    ) -> impl std::future::Future<Output = Result<bool, GatewayError>> + Send;
}
