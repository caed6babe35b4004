//! Event-level flows: what a single event delivery does end to end.

mod issue_comment;
mod pull_request;

use crate::check::{CheckOutcome, ClaCheck};
use crate::config::{CommentStrategy, GateConfig};
use crate::error::Result;
use crate::event::EventContext;
use crate::matcher::{match_event, EventMatch, Trigger};
use cla_classifier::{AuthorClassificationService, SignatureRegistry};
use cla_github::HostApi;
use regex::Regex;
use std::sync::Arc;

/// Terminal result of one event delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Skipped { reason: String },
    Checked(CheckOutcome),
    /// A failed prior run was restarted from a comment.
    Retriggered { run_id: u64 },
    /// The prior run already passed; nothing was restarted.
    AlreadyPassing { run_id: u64 },
    /// Restarting failed; a diagnostic comment was posted instead.
    RerunFailed { run_id: u64, error: String },
}

impl RunReport {
    /// Message to fail the run with, if the run should fail.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Checked(outcome) => outcome.failure_message(),
            _ => None,
        }
    }
}

/// Decides whether an event needs the gate at all, without touching the host.
///
/// Skipped events come back as the report to finish the run with; unsupported
/// events log at info level, ignored comments at warn level.
pub fn screen_event(ctx: &EventContext, pattern: &Regex) -> std::result::Result<Trigger, RunReport> {
    match match_event(ctx, pattern) {
        EventMatch::Matched(trigger) => Ok(trigger),
        EventMatch::Unsupported(reason) => {
            log::info!("CLA: {reason}");
            Err(RunReport::Skipped { reason })
        }
        EventMatch::Ignored(reason) => {
            log::warn!("CLA: {reason}");
            Err(RunReport::Skipped { reason })
        }
    }
}

pub struct Gate {
    host: Arc<dyn HostApi>,
    check: ClaCheck,
    pattern: Regex,
}

impl Gate {
    pub fn new(
        host: Arc<dyn HostApi>,
        registry: Arc<dyn SignatureRegistry>,
        config: GateConfig,
    ) -> Result<Self> {
        let pattern = config.comment_pattern()?;
        Ok(Self::with_pattern(host, registry, config, pattern))
    }

    /// Builds a gate around a pattern already compiled from `config`.
    pub fn with_pattern(
        host: Arc<dyn HostApi>,
        registry: Arc<dyn SignatureRegistry>,
        config: GateConfig,
        pattern: Regex,
    ) -> Self {
        let classifier =
            AuthorClassificationService::new(registry).with_retry(config.retry_policy());
        Self {
            check: ClaCheck::new(Arc::clone(&host), classifier, config),
            host,
            pattern,
        }
    }

    pub fn config(&self) -> &GateConfig {
        self.check.config()
    }

    pub async fn run(&self, ctx: &EventContext) -> Result<RunReport> {
        let trigger = match screen_event(ctx, &self.pattern) {
            Ok(trigger) => trigger,
            Err(skipped) => return Ok(skipped),
        };

        match trigger {
            Trigger::PullRequest { number, head_sha } => {
                log::info!("CLA: {head_sha} Triggered \"{}\" hook", ctx.qualified_name());
                self.on_pull_request(number, &head_sha).await
            }
            Trigger::Comment { number, comment_id } => match self.config().comments.strategy {
                CommentStrategy::Rerun => self.on_comment_rerun(ctx, number, comment_id).await,
                CommentStrategy::Recheck => self.on_comment_recheck(ctx, number).await,
            },
        }
    }
}
