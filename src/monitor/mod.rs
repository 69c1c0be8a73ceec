//! Run-completion monitor with tool-approval gating.
//!
//! Drives a remote run to a terminal state by polling its status. The
//! remote service owns the state machine
//! (`queued → in_progress → {completed | failed | cancelled | expired}`,
//! with `in_progress → requires_action → in_progress` repeating); the
//! monitor never predicts, it only polls. When the run pauses in
//! `requires_action`, each pending tool call is decided by the injected
//! [`ApprovalPolicy`] and the decisions are submitted back as one batch.

use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::approval::ApprovalPolicy;
use crate::client::RunService;
use crate::error::{AgentryError, Result};
use crate::types::{RequiredAction, Run, RunStatus};
use crate::util::RetryPolicy;

/// Polling parameters.
///
/// Defaults to a fixed 1-second interval with no deadline. Set
/// `multiplier` above 1.0 to grow the interval up to `max_interval`, and
/// `deadline` to bound the total wait.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use agentry::monitor::PollOptions;
///
/// let options = PollOptions::builder()
///     .interval(Duration::from_millis(500))
///     .multiplier(2.0)
///     .max_interval(Duration::from_secs(8))
///     .deadline(Duration::from_secs(300))
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PollOptions {
    /// Wait between polls (initial value when a multiplier is set).
    #[builder(default = Duration::from_secs(1))]
    pub interval: Duration,
    /// Growth factor applied to the interval after each poll.
    #[builder(default = 1.0)]
    pub multiplier: f64,
    /// Upper bound on the grown interval.
    #[builder(default = Duration::from_secs(30))]
    pub max_interval: Duration,
    /// Total elapsed-time budget for the wait.
    pub deadline: Option<Duration>,
    /// Retry policy for transient transport failures while polling.
    #[builder(default)]
    pub retry: RetryPolicy,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            multiplier: 1.0,
            max_interval: Duration::from_secs(30),
            deadline: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of one `requires_action` snapshot.
enum ActionOutcome {
    /// Decisions (if any) were submitted; keep polling.
    Handled,
    /// The run was cancelled client-side; this is the final snapshot.
    Cancelled(Run),
}

/// Drives a remote run to completion.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use agentry::approval::ApproveAll;
/// use agentry::client::AgentsClient;
/// use agentry::config::AgentryConfig;
/// use agentry::monitor::RunMonitor;
/// use agentry::types::RunStatus;
///
/// # async fn example() -> agentry::error::Result<()> {
/// let client = AgentsClient::new(AgentryConfig::from_env()?)?;
/// let monitor = RunMonitor::new(Arc::new(client), Arc::new(ApproveAll::new()));
/// let run = monitor.await_completion("thread_1", "run_1").await?;
/// if run.status == RunStatus::Failed {
///     eprintln!("run failed: {:?}", run.last_error);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RunMonitor {
    service: Arc<dyn RunService>,
    policy: Arc<dyn ApprovalPolicy>,
    options: PollOptions,
    cancel: Option<CancellationToken>,
}

impl RunMonitor {
    /// Create a monitor over a service with an approval policy.
    pub fn new(service: Arc<dyn RunService>, policy: Arc<dyn ApprovalPolicy>) -> Self {
        Self {
            service,
            policy,
            options: PollOptions::default(),
            cancel: None,
        }
    }

    /// Replace the polling parameters.
    pub fn with_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a cooperative cancellation token.
    ///
    /// Checked at every wait point; when signalled, the monitor issues a
    /// remote cancel and returns the resulting snapshot.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Poll a run until it reaches a terminal state and return the final
    /// snapshot.
    ///
    /// A run that terminates with status `failed` is an `Ok` return: the
    /// failure payload travels on [`Run::last_error`] so the caller has to
    /// branch on it explicitly. `Err` is reserved for transport failures
    /// that survive retry, protocol mismatches, and a missed deadline.
    ///
    /// A run that is already terminal on the first fetch is returned as-is:
    /// no waits, no approvals, no cancellation.
    pub async fn await_completion(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let started = Instant::now();
        let mut delay = self.options.interval;
        let mut run = self.fetch(thread_id, run_id).await?;

        loop {
            debug!(run_id, status = %run.status, "run status");

            if run.status.is_terminal() {
                if run.status == RunStatus::Failed {
                    if let Some(err) = run.last_error.as_ref() {
                        warn!(run_id, code = %err.code, message = %err.message, "run failed");
                    }
                }
                return Ok(run);
            }

            if run.status == RunStatus::RequiresAction {
                match self.handle_required_action(&run, thread_id, run_id).await? {
                    ActionOutcome::Handled => {}
                    ActionOutcome::Cancelled(final_run) => return Ok(final_run),
                }
            }

            if let Some(deadline) = self.options.deadline {
                if started.elapsed() >= deadline {
                    return Err(AgentryError::Timeout(deadline.as_millis() as u64));
                }
            }

            if !self.wait(delay).await {
                warn!(run_id, "cancellation requested; cancelling remote run");
                return self.service.cancel_run(thread_id, run_id).await;
            }
            delay = grow_delay(delay, &self.options);

            run = self.fetch(thread_id, run_id).await?;
        }
    }

    /// Decide and submit approvals for one `requires_action` snapshot.
    async fn handle_required_action(
        &self,
        run: &Run,
        thread_id: &str,
        run_id: &str,
    ) -> Result<ActionOutcome> {
        let action = run.required_action.as_ref().ok_or_else(|| {
            AgentryError::Protocol("run requires action but carries no payload".into())
        })?;

        let request = match action {
            RequiredAction::SubmitToolApproval {
                submit_tool_approval,
            } => submit_tool_approval,
            RequiredAction::Unknown(payload) => {
                return Err(AgentryError::Protocol(format!(
                    "unrecognized required action: {payload}"
                )));
            }
        };

        if request.tool_calls.is_empty() {
            // Nothing to decide on and nothing to submit: the run can never
            // leave requires_action, so cancel it instead of spinning.
            warn!(run_id, "no tool calls in required action; cancelling run");
            let cancelled = self.service.cancel_run(thread_id, run_id).await?;
            return Ok(ActionOutcome::Cancelled(cancelled));
        }

        let mut approvals = Vec::with_capacity(request.tool_calls.len());
        for call in &request.tool_calls {
            match self.policy.decide(call).await {
                Ok(approval) => {
                    debug!(run_id, call_id = %call.id, tool = %call.name, approve = approval.approve, "decided tool call");
                    approvals.push(approval);
                }
                Err(e) => {
                    warn!(run_id, call_id = %call.id, error = %e, "approval policy failed; skipping call");
                }
            }
        }

        if !approvals.is_empty() {
            self.service
                .submit_tool_approvals(thread_id, run_id, approvals)
                .await?;
        }
        Ok(ActionOutcome::Handled)
    }

    async fn fetch(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.options
            .retry
            .execute(|| self.service.get_run(thread_id, run_id))
            .await
    }

    /// Sleep between polls. Returns `false` if cancellation was signalled
    /// before the wait elapsed.
    async fn wait(&self, delay: Duration) -> bool {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => false,
                    _ = time::sleep(delay) => true,
                }
            }
            None => {
                time::sleep(delay).await;
                true
            }
        }
    }
}

fn grow_delay(delay: Duration, options: &PollOptions) -> Duration {
    if options.multiplier <= 1.0 {
        return delay;
    }
    let grown = delay.as_secs_f64() * options.multiplier;
    Duration::from_secs_f64(grown.min(options.max_interval.as_secs_f64()))
}
