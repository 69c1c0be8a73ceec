//! Typed client for the remote agent service.
//!
//! [`AgentsClient`] covers the management surface (agents, threads,
//! messages) and the run lifecycle. The four operations the run monitor
//! needs are factored into the [`RunService`] trait so the monitor can be
//! driven against a fake service in tests.

pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::AgentryConfig;
use crate::error::{AgentryError, Result};
use crate::types::{
    AgentDefinition, CreateAgent, Role, Run, SortOrder, Thread, ThreadMessage, ToolApproval,
};

use http::{bearer_headers, shared_client, status_to_error};

/// Correlation header attached to every request.
const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

/// The remote contract the run monitor depends on.
///
/// The remote service owns all run state; these calls observe or nudge it.
#[async_trait]
pub trait RunService: Send + Sync {
    /// Fetch the current snapshot of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Submit one batch of approval decisions for a paused run.
    ///
    /// The protocol defines no per-item submission; all decisions for one
    /// `requires_action` snapshot go out in a single call.
    async fn submit_tool_approvals(
        &self,
        thread_id: &str,
        run_id: &str,
        approvals: Vec<ToolApproval>,
    ) -> Result<Run>;

    /// Request cancellation of a run.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List the messages of a thread.
    async fn list_messages(&self, thread_id: &str, order: SortOrder) -> Result<Vec<ThreadMessage>>;
}

/// HTTP client for a hosted agent service.
#[derive(Debug, Clone)]
pub struct AgentsClient {
    endpoint: String,
    credential: String,
    api_version: String,
}

impl AgentsClient {
    /// Create a client from explicit configuration.
    pub fn new(config: AgentryConfig) -> Result<Self> {
        if config.endpoint().is_empty() {
            return Err(AgentryError::Configuration("endpoint is empty".into()));
        }
        Ok(Self {
            endpoint: config.endpoint().to_string(),
            credential: config.credential().to_string(),
            api_version: config.api_version().to_string(),
        })
    }

    /// Create a server-side agent.
    pub async fn create_agent(&self, request: CreateAgent) -> Result<AgentDefinition> {
        debug!(model = %request.model, name = %request.name, "create agent");
        self.send(self.request(Method::POST, "assistants").json(&request))
            .await
    }

    /// Delete an agent.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        debug!(agent_id, "delete agent");
        let path = format!("assistants/{agent_id}");
        self.send_no_body(self.request(Method::DELETE, &path)).await
    }

    /// Create a new conversation thread.
    pub async fn create_thread(&self) -> Result<Thread> {
        debug!("create thread");
        self.send(
            self.request(Method::POST, "threads")
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Append a message to a thread.
    pub async fn create_message(
        &self,
        thread_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<ThreadMessage> {
        let path = format!("threads/{thread_id}/messages");
        let content: String = content.into();
        let body = serde_json::json!({
            "role": role,
            "content": content,
        });
        debug!(thread_id, %role, "create message");
        self.send(self.request(Method::POST, &path).json(&body)).await
    }

    /// Start a run of an agent against a thread.
    pub async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let path = format!("threads/{thread_id}/runs");
        let body = serde_json::json!({ "assistant_id": agent_id });
        debug!(thread_id, agent_id, "create run");
        self.send(self.request(Method::POST, &path).json(&body)).await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        shared_client()
            .request(method, format!("{}/{path}", self.endpoint))
            .headers(bearer_headers(&self.credential))
            .header(CLIENT_REQUEST_ID, Uuid::new_v4().to_string())
            .query(&[("api-version", self.api_version.as_str())])
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    async fn send_no_body(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }
}

/// Envelope the service wraps list responses in.
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
}

#[async_trait]
impl RunService for AgentsClient {
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let path = format!("threads/{thread_id}/runs/{run_id}");
        debug!(thread_id, run_id, "get run");
        self.send(self.request(Method::GET, &path)).await
    }

    async fn submit_tool_approvals(
        &self,
        thread_id: &str,
        run_id: &str,
        approvals: Vec<ToolApproval>,
    ) -> Result<Run> {
        let path = format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs");
        debug!(thread_id, run_id, count = approvals.len(), "submit tool approvals");
        let body = serde_json::json!({ "tool_approvals": approvals });
        self.send(self.request(Method::POST, &path).json(&body)).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let path = format!("threads/{thread_id}/runs/{run_id}/cancel");
        debug!(thread_id, run_id, "cancel run");
        self.send(
            self.request(Method::POST, &path)
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str, order: SortOrder) -> Result<Vec<ThreadMessage>> {
        let path = format!("threads/{thread_id}/messages");
        debug!(thread_id, %order, "list messages");
        let envelope: ListEnvelope<ThreadMessage> = self
            .send(
                self.request(Method::GET, &path)
                    .query(&[("order", order.to_string())]),
            )
            .await?;
        Ok(envelope.data)
    }
}
