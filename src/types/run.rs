//! Run lifecycle types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status of a run as reported by the remote service.
///
/// The service owns this state machine; the client only observes it:
/// `queued → in_progress → {completed | failed | cancelled | expired}`,
/// with `in_progress → requires_action → in_progress` repeating zero or
/// more times. Once terminal, a run never changes again.
///
/// This is a closed set — an unrecognized wire value fails deserialization
/// rather than being silently mapped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    Expired,
}

impl RunStatus {
    /// Whether the run can still change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired
        )
    }
}

/// Snapshot of one run of an agent against a thread.
///
/// The remote service is the source of truth; this is a read-only copy
/// refreshed on each poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    #[serde(rename = "assistant_id")]
    pub agent_id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunError>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Terminal error payload carried by a `failed` run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Pause-state payload present while a run has status `requires_action`.
///
/// The only kind this client acts on is `submit_tool_approval`. Anything
/// else is preserved verbatim in [`RequiredAction::Unknown`] so the monitor
/// can report a protocol mismatch with the payload intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolApproval {
        submit_tool_approval: ToolApprovalRequest,
    },
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

/// The list of tool calls awaiting an approval decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolApprovalRequest {
    pub tool_calls: Vec<ToolCallRequest>,
}

/// A discrete action the remote task wants to execute, pending approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_label: Option<String>,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// A grant/deny decision for one pending tool call.
///
/// Consumed by the service exactly once per call id; decisions for one
/// `requires_action` snapshot are submitted together as a single batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolApproval {
    pub tool_call_id: String,
    pub approve: bool,
    /// Decision-scoped metadata attached when the tool executes
    /// (e.g. authorization headers for the tool's upstream server).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl ToolApproval {
    /// Grant a pending call.
    pub fn grant(call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: call_id.into(),
            approve: true,
            headers: HashMap::new(),
        }
    }

    /// Deny a pending call.
    pub fn deny(call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: call_id.into(),
            approve: false,
            headers: HashMap::new(),
        }
    }

    /// Attach decision-scoped headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}
