use crate::event::EventContext;
use regex::Regex;

pub const SUPPORTED_EVENTS: &[&str] = &[
    "pull_request_target.opened",
    "pull_request_target.reopened",
    "pull_request_target.synchronize",
    "pull_request.opened",
    "pull_request.reopened",
    "pull_request.synchronize",
    "issue_comment.created",
];

/// What started the run, once the event is known to be relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    PullRequest { number: u64, head_sha: String },
    Comment { number: u64, comment_id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMatch {
    Matched(Trigger),
    /// Supported event that does not concern the CLA.
    Ignored(String),
    /// Event/action pair the gate does not handle.
    Unsupported(String),
}

pub fn match_event(ctx: &EventContext, pattern: &Regex) -> EventMatch {
    let qualified = ctx.qualified_name();
    if !SUPPORTED_EVENTS.contains(&qualified.as_str()) {
        return EventMatch::Unsupported(format!("Hooked with invalid event type: {qualified}"));
    }

    if ctx.event_name == "issue_comment" {
        let Some(issue) = ctx.payload.issue.as_ref() else {
            return EventMatch::Ignored("Comment event has no issue".to_string());
        };
        if issue.pull_request.is_none() {
            return EventMatch::Ignored("Issue is not a pull request".to_string());
        }
        let Some(comment) = ctx.payload.comment.as_ref() else {
            return EventMatch::Ignored("Comment event has no comment".to_string());
        };
        if !pattern.is_match(&comment.body) {
            return EventMatch::Ignored("Comment does not match CLA pattern".to_string());
        }
        return EventMatch::Matched(Trigger::Comment {
            number: issue.number,
            comment_id: comment.id,
        });
    }

    match ctx.payload.pull_request.as_ref() {
        Some(pr) => EventMatch::Matched(Trigger::PullRequest {
            number: pr.number,
            head_sha: pr.head.sha.clone(),
        }),
        None => EventMatch::Ignored("Event has no pull request".to_string()),
    }
}
