//! # CLA Gate
//!
//! Decides what a CLA check run does to a pull request.
//!
//! ## Flow
//!
//! ```text
//! EventContext
//!     │
//!     ├──> match_event (supported event? PR comment? acknowledgement?)
//!     │
//!     ├──> pull request ──> ClaCheck
//!     │                       ├─> collect_authors (commits of every PR, concurrently)
//!     │                       ├─> classify (registry, bounded retry)
//!     │                       └─> reconcile labels ──> CheckOutcome
//!     │                     └─> react to pending acknowledgement comments
//!     │
//!     └──> comment ──> rerun last failed run, or recheck directly
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cla_classifier::HttpRegistry;
//! use cla_gate::{EventContext, Gate, GateConfig};
//! use cla_github::{RestClient, DEFAULT_API_URL};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GateConfig::default();
//!     let host = RestClient::new(DEFAULT_API_URL, "octo/repo".parse()?, "gh-token")?;
//!     let registry = HttpRegistry::new(config.registry_endpoint(), "cla-token")?;
//!     let gate = Gate::new(Arc::new(host), Arc::new(registry), config)?;
//!
//!     let ctx = EventContext::from_json("pull_request_target", "CLA", "{}")?;
//!     let report = gate.run(&ctx).await?;
//!     println!("{report:?}");
//!     Ok(())
//! }
//! ```

mod check;
mod config;
mod error;
mod event;
mod flow;
mod matcher;
mod message;
mod reactions;

pub use check::{collect_authors, remove_label_if_present, CheckOutcome, CheckState, ClaCheck};
pub use config::{
    CommentSettings, CommentStrategy, GateConfig, Messages, RegistrySettings, DEFAULT_CLA_URL,
    DEFAULT_COMMENT_PATTERN, DEFAULT_LABEL,
};
pub use error::{GateError, Result};
pub use event::{
    CommentPayload, EventContext, EventPayload, HeadPayload, IssuePayload, PullRequestPayload,
};
pub use flow::{screen_event, Gate, RunReport};
pub use matcher::{match_event, EventMatch, Trigger, SUPPORTED_EVENTS};
pub use message::{failure_summary, registry_unavailable, restart_workflow, success_summary};
pub use reactions::{is_pending, react_to_acknowledgements, verdict_reaction};
