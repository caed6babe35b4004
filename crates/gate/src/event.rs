use crate::error::Result;
use serde::Deserialize;

/// The subset of a webhook payload the gate reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    #[serde(default)]
    pub comment: Option<CommentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub head: HeadPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadPayload {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub number: u64,
    /// Present (as an object) only when the issue is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub id: u64,
    #[serde(default)]
    pub body: String,
}

/// One event delivery: its name, the workflow it runs in, and the payload.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub event_name: String,
    pub workflow: String,
    pub payload: EventPayload,
}

impl EventContext {
    pub fn new(event_name: impl Into<String>, workflow: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            event_name: event_name.into(),
            workflow: workflow.into(),
            payload,
        }
    }

    pub fn from_json(
        event_name: impl Into<String>,
        workflow: impl Into<String>,
        raw_payload: &str,
    ) -> Result<Self> {
        let payload = if raw_payload.trim().is_empty() {
            EventPayload::default()
        } else {
            serde_json::from_str(raw_payload)?
        };
        Ok(Self::new(event_name, workflow, payload))
    }

    /// `event.action`, e.g. `pull_request_target.opened`.
    pub fn qualified_name(&self) -> String {
        format!(
            "{}.{}",
            self.event_name,
            self.payload.action.as_deref().unwrap_or("undefined")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_pull_request_payload() {
        let ctx = EventContext::from_json(
            "pull_request_target",
            "CLA",
            r#"{"action":"opened","number":3,"pull_request":{"number":3,"head":{"sha":"deadbeef","ref":"feature"}}}"#,
        )
        .unwrap();
        assert_eq!(ctx.qualified_name(), "pull_request_target.opened");
        let pr = ctx.payload.pull_request.unwrap();
        assert_eq!((pr.number, pr.head.sha.as_str()), (3, "deadbeef"));
    }

    #[test]
    fn empty_pull_request_object_marks_a_pr_comment() {
        let ctx = EventContext::from_json(
            "issue_comment",
            "CLA",
            r#"{"action":"created","issue":{"number":3,"pull_request":{}},"comment":{"id":42,"body":"I signed the CLA"}}"#,
        )
        .unwrap();
        assert!(ctx.payload.issue.unwrap().pull_request.is_some());
        assert_eq!(ctx.payload.comment.unwrap().id, 42);
    }

    #[test]
    fn missing_action_is_reported_as_undefined() {
        let ctx = EventContext::from_json("push", "CLA", "").unwrap();
        assert_eq!(ctx.qualified_name(), "push.undefined");
    }
}
