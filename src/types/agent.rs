//! Agent management types.

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-side agent definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an agent.
///
/// # Example
///
/// ```
/// use agentry::types::{CreateAgent, ToolDefinition};
///
/// let request = CreateAgent::builder()
///     .model("gpt-4o")
///     .name("docs-agent")
///     .instructions("You are a helpful assistant. Cite your sources.")
///     .tools(vec![ToolDefinition::Mcp {
///         server_label: "git".into(),
///         server_url: "https://gitmcp.example/specs".into(),
///         allowed_tools: vec![],
///     }])
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, Builder)]
pub struct CreateAgent {
    #[builder(into)]
    pub model: String,
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// Tool attached to an agent at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    /// A remote tool server. Calls against it are subject to the
    /// run-level approval protocol.
    Mcp {
        server_label: String,
        server_url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        allowed_tools: Vec<String>,
    },
    CodeInterpreter,
}
