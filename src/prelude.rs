//! Convenience re-exports for common use.

pub use crate::approval::{AllowList, ApprovalPolicy, ApproveAll, DenyAll, HandlerPolicy};
pub use crate::client::{AgentsClient, RunService};
pub use crate::config::AgentryConfig;
pub use crate::error::{AgentryError, Result};
pub use crate::monitor::{PollOptions, RunMonitor};
pub use crate::types::{
    AgentDefinition, CreateAgent, RequiredAction, Role, Run, RunStatus, SortOrder, ThreadMessage,
    ToolApproval, ToolCallRequest, ToolDefinition,
};
