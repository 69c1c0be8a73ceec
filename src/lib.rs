//! Agentry — Rust client SDK for hosted AI agent services.
//!
//! Covers the threads/runs protocol family: create an agent, open a
//! conversation thread, post a message, start a run, poll the run to a
//! terminal state with tool-approval gating, and read back the results.
//! The remote service owns all run state; this crate polls it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentry::prelude::*;
//!
//! # async fn example() -> agentry::error::Result<()> {
//! let client = AgentsClient::new(AgentryConfig::from_env()?)?;
//!
//! let agent = client
//!     .create_agent(CreateAgent::builder().model("gpt-4o").name("my-agent").build())
//!     .await?;
//! let thread = client.create_thread().await?;
//! client
//!     .create_message(&thread.id, Role::User, "Summarize the project readme")
//!     .await?;
//! let run = client.create_run(&thread.id, &agent.id).await?;
//!
//! let monitor = RunMonitor::new(Arc::new(client.clone()), Arc::new(ApproveAll::new()));
//! let run = monitor.await_completion(&thread.id, &run.id).await?;
//!
//! if run.status == RunStatus::Failed {
//!     eprintln!("run failed: {:?}", run.last_error);
//! }
//! for message in client.list_messages(&thread.id, SortOrder::Asc).await? {
//!     println!("{}: {}", message.role, message.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod approval;
pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod prelude;
pub mod types;
pub mod util;
