use crate::error::{HostError, Result};
use async_trait::async_trait;
use cla_protocol::{Comment, Commit, PullRequestHead, ReactionKind, Workflow, WorkflowRun};
use std::fmt;
use std::str::FromStr;

/// `owner/name` of the repository the check runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repo {
    type Err = HostError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(HostError::InvalidRepository(raw.to_string())),
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything the CLA gate reads from or writes to the source-control host.
#[async_trait]
pub trait HostApi: Send + Sync {
    /// All commits of a pull request, across every page.
    async fn fetch_commits(&self, number: u64) -> Result<Vec<Commit>>;

    /// Adding a label that is already present is a no-op on the host.
    async fn add_label(&self, number: u64, label: &str) -> Result<()>;

    /// Fails with [`HostError::LabelNotFound`] when the label is absent.
    async fn remove_label(&self, number: u64, label: &str) -> Result<()>;

    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>>;

    async fn add_comment(&self, number: u64, body: &str) -> Result<()>;

    async fn list_reactions(&self, comment_id: u64) -> Result<Vec<ReactionKind>>;

    async fn add_reaction(&self, comment_id: u64, kind: ReactionKind) -> Result<()>;

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestHead>;

    async fn find_workflow_by_name(&self, name: &str) -> Result<Option<Workflow>>;

    /// Runs of `workflow_id` on the pull request's head branch for `event`, newest first.
    async fn list_workflow_runs(
        &self,
        number: u64,
        workflow_id: u64,
        event: &str,
    ) -> Result<Vec<WorkflowRun>>;

    async fn get_workflow_run(&self, run_id: u64) -> Result<WorkflowRun>;

    async fn rerun_workflow(&self, run_id: u64) -> Result<()>;
}
