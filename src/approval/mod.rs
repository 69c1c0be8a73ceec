//! Approval policies for the tool-approval protocol.
//!
//! When a run pauses in `requires_action`, each pending
//! [`ToolCallRequest`] is mapped to a [`ToolApproval`] by a policy. The
//! policy is an injected capability of the
//! [`RunMonitor`](crate::monitor::RunMonitor), never inline logic, so
//! deny-all, allow-list, and interactive policies drop in without touching
//! the polling loop.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;
use crate::types::{ToolApproval, ToolCallRequest};

/// Decision rule mapping a pending tool call to grant/deny.
#[async_trait]
pub trait ApprovalPolicy: Send + Sync {
    /// Decide on one pending call.
    ///
    /// An `Err` here is isolated by the monitor: the failing call is
    /// skipped and the remaining decisions in the batch still go out.
    async fn decide(&self, call: &ToolCallRequest) -> Result<ToolApproval>;
}

/// Grant every call, optionally attaching fixed decision-scoped headers.
#[derive(Debug, Clone, Default)]
pub struct ApproveAll {
    headers: HashMap<String, String>,
}

impl ApproveAll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach headers to every grant (e.g. auth for the tool's upstream).
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[async_trait]
impl ApprovalPolicy for ApproveAll {
    async fn decide(&self, call: &ToolCallRequest) -> Result<ToolApproval> {
        Ok(ToolApproval::grant(&call.id).with_headers(self.headers.clone()))
    }
}

/// Deny every call.
#[derive(Debug, Clone, Default)]
pub struct DenyAll;

#[async_trait]
impl ApprovalPolicy for DenyAll {
    async fn decide(&self, call: &ToolCallRequest) -> Result<ToolApproval> {
        Ok(ToolApproval::deny(&call.id))
    }
}

/// Grant calls whose tool name is listed; deny the rest.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: HashSet<String>,
    headers: HashMap<String, String>,
}

impl AllowList {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            headers: HashMap::new(),
        }
    }

    /// Attach headers to grants.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[async_trait]
impl ApprovalPolicy for AllowList {
    async fn decide(&self, call: &ToolCallRequest) -> Result<ToolApproval> {
        if self.allowed.contains(&call.name) {
            Ok(ToolApproval::grant(&call.id).with_headers(self.headers.clone()))
        } else {
            Ok(ToolApproval::deny(&call.id))
        }
    }
}

/// Async callback deciding on a single pending call.
///
/// The seam for interactive policies (human prompt, external authorizer).
pub type ApprovalHandlerFn =
    Arc<dyn Fn(ToolCallRequest) -> BoxFuture<'static, Result<ToolApproval>> + Send + Sync>;

/// Policy that defers every decision to an injected async handler.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use agentry::approval::HandlerPolicy;
/// use agentry::types::ToolApproval;
///
/// let policy = HandlerPolicy::new(Arc::new(|call| {
///     Box::pin(async move { Ok(ToolApproval::grant(call.id)) })
/// }));
/// ```
#[derive(Clone)]
pub struct HandlerPolicy {
    handler: ApprovalHandlerFn,
}

impl HandlerPolicy {
    pub fn new(handler: ApprovalHandlerFn) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl ApprovalPolicy for HandlerPolicy {
    async fn decide(&self, call: &ToolCallRequest) -> Result<ToolApproval> {
        (self.handler)(call.clone()).await
    }
}
