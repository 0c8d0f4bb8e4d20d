//! HTTP gateway speaking the JSON task API.
//!
//! Sends mutation bodies wrapped as `{"task": ...}`, unwraps `{"data": ...}`
//! envelopes from successful responses, and normalizes error bodies into
//! single messages. The base URL is explicit configuration; nothing here
//! assumes a default host.

use std::time::Duration;

use serde::de::DeserializeOwned;
use taskdeck_proto::task::{Task, TaskDraft, TaskId, TaskPatch, TaskQuery};
use taskdeck_proto::wire::{self, TaskPayload};

use super::{GatewayError, TaskGateway};

/// Gateway backed by a reqwest client against a REST task API.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway against `base_url` (e.g. `http://localhost:3000/api`).
    ///
    /// A trailing slash on the base URL is tolerated and stripped. The
    /// timeout applies to each whole request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }

    /// Reads a response, unwrapping the data envelope on success and
    /// normalizing the error body otherwise.
    async fn read_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = wire::decode_error(&body).normalized_message();
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(wire::decode_data(&body)?)
    }
}

impl TaskGateway for HttpGateway {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, GatewayError> {
        let response = self
            .client
            .get(self.collection_url())
            .query(query)
            .send()
            .await?;
        Self::read_data(response).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, GatewayError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(&TaskPayload { task: draft })
            .send()
            .await?;
        Self::read_data(response).await
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, GatewayError> {
        let response = self
            .client
            .patch(self.item_url(id))
            .json(&TaskPayload { task: patch })
            .send()
            .await?;
        Self::read_data(response).await
    }

    async fn delete(&self, id: TaskId) -> Result<bool, GatewayError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Ok(response.status().is_success())
    }
}
