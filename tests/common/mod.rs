//! Shared test helpers: a scripted fake of the remote run service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use agentry::client::RunService;
use agentry::error::{AgentryError, Result};
use agentry::types::{
    RequiredAction, Run, RunError, RunStatus, SortOrder, ThreadMessage, ToolApproval,
    ToolApprovalRequest, ToolCallRequest,
};

/// One scripted reply to a status fetch.
pub enum ScriptStep {
    Snapshot(Run),
    TransientError,
}

/// A fake remote service that deterministically replays a scripted status
/// sequence and records every side effect the monitor performs.
///
/// Panics if the monitor fetches past the end of the script, which turns
/// "no extra polls after terminal" into a hard test failure.
#[derive(Default)]
pub struct ScriptedService {
    script: Mutex<VecDeque<ScriptStep>>,
    fetches: AtomicUsize,
    cancels: AtomicUsize,
    submissions: Mutex<Vec<Vec<ToolApproval>>>,
    reject_submissions: bool,
}

impl ScriptedService {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Script from plain statuses (no required actions).
    pub fn from_statuses(statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        Self::new(
            statuses
                .into_iter()
                .map(|status| ScriptStep::Snapshot(make_run(status))),
        )
    }

    /// Make `submit_tool_approvals` fail.
    pub fn rejecting_submissions(mut self) -> Self {
        self.reject_submissions = true;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Vec<ToolApproval>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunService for ScriptedService {
    async fn get_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(ScriptStep::Snapshot(run)) => Ok(run),
            Some(ScriptStep::TransientError) => Err(AgentryError::Timeout(50)),
            None => panic!("monitor polled past the scripted status sequence"),
        }
    }

    async fn submit_tool_approvals(
        &self,
        _thread_id: &str,
        _run_id: &str,
        approvals: Vec<ToolApproval>,
    ) -> Result<Run> {
        if self.reject_submissions {
            return Err(AgentryError::api(400, "approval batch rejected"));
        }
        self.submissions.lock().unwrap().push(approvals);
        Ok(make_run(RunStatus::InProgress))
    }

    async fn cancel_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(make_run(RunStatus::Cancelled))
    }

    async fn list_messages(
        &self,
        _thread_id: &str,
        _order: SortOrder,
    ) -> Result<Vec<ThreadMessage>> {
        Ok(Vec::new())
    }
}

/// A run snapshot with the given status and no required action.
pub fn make_run(status: RunStatus) -> Run {
    Run {
        id: "run_1".into(),
        thread_id: "thread_1".into(),
        agent_id: "asst_1".into(),
        status,
        required_action: None,
        last_error: None,
        created_at: Utc::now(),
        completed_at: status.is_terminal().then(Utc::now),
    }
}

/// A `requires_action` snapshot asking for approval of the given calls.
pub fn approval_run(calls: Vec<ToolCallRequest>) -> Run {
    let mut run = make_run(RunStatus::RequiresAction);
    run.required_action = Some(RequiredAction::SubmitToolApproval {
        submit_tool_approval: ToolApprovalRequest { tool_calls: calls },
    });
    run
}

/// A `failed` snapshot carrying a last-error payload.
pub fn failed_run(code: &str, message: &str) -> Run {
    let mut run = make_run(RunStatus::Failed);
    run.last_error = Some(RunError {
        code: code.into(),
        message: message.into(),
    });
    run
}

/// A pending tool call.
pub fn make_call(id: &str, name: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.into(),
        name: name.into(),
        server_label: Some("git".into()),
        arguments: serde_json::json!({"query": "readme"}),
    }
}
