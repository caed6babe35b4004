#![allow(dead_code)]

use async_trait::async_trait;
use cla_classifier::{RegistryError, SignatureRegistry, SignedUsernames};
use cla_gate::{EventContext, Gate, GateConfig};
use cla_github::{HostApi, HostError};
use cla_protocol::{
    Comment, Commit, CommitAccount, CommitDetails, GitIdentity, PullRequestHead, ReactionKind,
    Workflow, WorkflowRun,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const PR: u64 = 3;
pub const HEAD_SHA: &str = "abcdef0123";
pub const WORKFLOW: &str = "CLA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchCommits(u64),
    AddLabel(u64, String),
    RemoveLabel(u64, String),
    ListComments(u64),
    AddComment(u64, String),
    ListReactions(u64),
    AddReaction(u64, ReactionKind),
    GetPullRequest(u64),
    FindWorkflow(String),
    ListRuns(u64, u64, String),
    GetRun(u64),
    Rerun(u64),
}

#[derive(Default)]
pub struct HostState {
    pub commits: HashMap<u64, Vec<Commit>>,
    pub labels: HashMap<u64, BTreeSet<String>>,
    pub comments: HashMap<u64, Vec<Comment>>,
    pub reactions: HashMap<u64, Vec<ReactionKind>>,
    pub pull_requests: HashMap<u64, PullRequestHead>,
    pub workflows: Vec<Workflow>,
    pub runs: Vec<WorkflowRun>,
    pub label_failures: HashSet<u64>,
    pub reaction_failures: HashSet<u64>,
    pub rerun_fails: bool,
    pub calls: Vec<Call>,
}

/// In-memory host that behaves like GitHub for the calls the gate makes.
#[derive(Default)]
pub struct MockHost {
    state: Mutex<HostState>,
}

fn not_found(path: String) -> HostError {
    HostError::Api {
        method: "GET".to_string(),
        path,
        status: 404,
        message: "Not Found".to_string(),
    }
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut HostState) -> R) -> R {
        f(&mut *self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|state| state.calls.clone())
    }

    pub fn labels(&self, number: u64) -> Vec<String> {
        self.with(|state| {
            state
                .labels
                .get(&number)
                .map(|labels| labels.iter().cloned().collect())
                .unwrap_or_default()
        })
    }

    pub fn added_labels(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddLabel(number, label) => Some((number, label)),
                _ => None,
            })
            .collect()
    }

    pub fn removed_labels(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::RemoveLabel(number, label) => Some((number, label)),
                _ => None,
            })
            .collect()
    }

    pub fn added_reactions(&self) -> Vec<(u64, ReactionKind)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddReaction(id, kind) => Some((id, kind)),
                _ => None,
            })
            .collect()
    }

    pub fn posted_comments(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddComment(number, body) => Some((number, body)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.with(|state| state.calls.push(call));
    }
}

#[async_trait]
impl HostApi for MockHost {
    async fn fetch_commits(&self, number: u64) -> Result<Vec<Commit>, HostError> {
        self.record(Call::FetchCommits(number));
        self.with(|state| state.commits.get(&number).cloned())
            .ok_or_else(|| not_found(format!("/pulls/{number}/commits")))
    }

    async fn add_label(&self, number: u64, label: &str) -> Result<(), HostError> {
        self.record(Call::AddLabel(number, label.to_string()));
        self.with(|state| {
            if state.label_failures.contains(&number) {
                return Err(HostError::Other(format!("label service down for #{number}")));
            }
            state.labels.entry(number).or_default().insert(label.to_string());
            Ok(())
        })
    }

    async fn remove_label(&self, number: u64, label: &str) -> Result<(), HostError> {
        self.record(Call::RemoveLabel(number, label.to_string()));
        self.with(|state| {
            let removed = state
                .labels
                .get_mut(&number)
                .is_some_and(|labels| labels.remove(label));
            if removed {
                Ok(())
            } else {
                Err(HostError::LabelNotFound {
                    number,
                    label: label.to_string(),
                })
            }
        })
    }

    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>, HostError> {
        self.record(Call::ListComments(number));
        Ok(self.with(|state| state.comments.get(&number).cloned().unwrap_or_default()))
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<(), HostError> {
        self.record(Call::AddComment(number, body.to_string()));
        Ok(())
    }

    async fn list_reactions(&self, comment_id: u64) -> Result<Vec<ReactionKind>, HostError> {
        self.record(Call::ListReactions(comment_id));
        self.with(|state| {
            if state.reaction_failures.contains(&comment_id) {
                return Err(HostError::Api {
                    method: "GET".to_string(),
                    path: format!("/issues/comments/{comment_id}/reactions"),
                    status: 502,
                    message: "Bad Gateway".to_string(),
                });
            }
            Ok(state.reactions.get(&comment_id).cloned().unwrap_or_default())
        })
    }

    async fn add_reaction(&self, comment_id: u64, kind: ReactionKind) -> Result<(), HostError> {
        self.record(Call::AddReaction(comment_id, kind));
        self.with(|state| state.reactions.entry(comment_id).or_default().push(kind));
        Ok(())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestHead, HostError> {
        self.record(Call::GetPullRequest(number));
        self.with(|state| state.pull_requests.get(&number).cloned())
            .ok_or_else(|| not_found(format!("/pulls/{number}")))
    }

    async fn find_workflow_by_name(&self, name: &str) -> Result<Option<Workflow>, HostError> {
        self.record(Call::FindWorkflow(name.to_string()));
        Ok(self.with(|state| state.workflows.iter().find(|w| w.name == name).cloned()))
    }

    async fn list_workflow_runs(
        &self,
        number: u64,
        workflow_id: u64,
        event: &str,
    ) -> Result<Vec<WorkflowRun>, HostError> {
        self.record(Call::ListRuns(number, workflow_id, event.to_string()));
        Ok(self.with(|state| state.runs.clone()))
    }

    async fn get_workflow_run(&self, run_id: u64) -> Result<WorkflowRun, HostError> {
        self.record(Call::GetRun(run_id));
        self.with(|state| state.runs.iter().find(|run| run.id == run_id).cloned())
            .ok_or_else(|| not_found(format!("/actions/runs/{run_id}")))
    }

    async fn rerun_workflow(&self, run_id: u64) -> Result<(), HostError> {
        self.record(Call::Rerun(run_id));
        if self.with(|state| state.rerun_fails) {
            return Err(HostError::Api {
                method: "POST".to_string(),
                path: format!("/actions/runs/{run_id}/rerun"),
                status: 403,
                message: "Resource not accessible by integration".to_string(),
            });
        }
        Ok(())
    }
}

/// Registry that answers from a script, then keeps repeating the last answer.
pub struct MockRegistry {
    script: Mutex<Vec<Result<Vec<String>, String>>>,
    queries: Mutex<Vec<String>>,
}

impl MockRegistry {
    pub fn signed(logins: &[&str]) -> Arc<Self> {
        Self::scripted(vec![Ok(logins.to_vec())])
    }

    pub fn down() -> Arc<Self> {
        Self::scripted(vec![Err("connect ECONNREFUSED")])
    }

    pub fn scripted(script: Vec<Result<Vec<&str>, &str>>) -> Arc<Self> {
        let script = script
            .into_iter()
            .map(|step| {
                step.map(|logins| logins.into_iter().map(str::to_string).collect())
                    .map_err(str::to_string)
            })
            .collect();
        Arc::new(Self {
            script: Mutex::new(script),
            queries: Mutex::default(),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignatureRegistry for MockRegistry {
    async fn fetch_signed_logins(&self, logins_csv: &str) -> Result<SignedUsernames, RegistryError> {
        self.queries.lock().unwrap().push(logins_csv.to_string());
        let mut script = self.script.lock().unwrap();
        let step = if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().cloned().unwrap_or(Ok(Vec::new()))
        };
        step.map(|signed_usernames| SignedUsernames { signed_usernames })
            .map_err(RegistryError::Other)
    }
}

pub fn github_user_commit(username: &str) -> Commit {
    Commit {
        sha: "abcdef".to_string(),
        commit: CommitDetails {
            author: Some(GitIdentity {
                name: None,
                email: Some(format!("{username}@example.com")),
            }),
            message: String::new(),
        },
        author: Some(CommitAccount {
            id: Some(123),
            login: Some(username.to_string()),
        }),
    }
}

pub fn anonymous_user_commit() -> Commit {
    Commit {
        sha: "abcdef".to_string(),
        commit: CommitDetails {
            author: Some(GitIdentity {
                name: Some("Mystery".to_string()),
                email: Some("mystery-user@example.com".to_string()),
            }),
            message: String::new(),
        },
        author: None,
    }
}

pub fn test_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.registry.retry_delay_ms = 10;
    config
}

pub fn gate(host: &Arc<MockHost>, registry: &Arc<MockRegistry>, config: GateConfig) -> Gate {
    Gate::new(host.clone(), registry.clone(), config).expect("gate")
}

pub fn pull_request_event(action: &str) -> EventContext {
    let payload = serde_json::json!({
        "action": action,
        "number": PR,
        "pull_request": {"number": PR, "head": {"sha": HEAD_SHA, "ref": "feature-branch"}},
        "repository": {"name": "cla-test", "owner": {"login": "BPScott"}},
    });
    EventContext::from_json("pull_request_target", WORKFLOW, &payload.to_string()).expect("payload")
}

pub fn comment_event(comment_id: u64, body: &str) -> EventContext {
    let payload = serde_json::json!({
        "action": "created",
        "issue": {"number": PR, "pull_request": {"url": "https://api.github.com/repos/BPScott/cla-test/pulls/3"}},
        "comment": {"id": comment_id, "body": body},
        "repository": {"name": "cla-test", "owner": {"login": "BPScott"}},
    });
    EventContext::from_json("issue_comment", WORKFLOW, &payload.to_string()).expect("payload")
}
