use crate::error::{HostError, Result};
use crate::host::{HostApi, Repo};
use async_trait::async_trait;
use cla_protocol::{Comment, Commit, PullRequestHead, ReactionKind, Workflow, WorkflowRun};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: &str = "100";
const API_VERSION: &str = "2022-11-28";
const LABEL_MISSING_MESSAGE: &str = "Label does not exist";

/// [`HostApi`] over the GitHub REST API.
pub struct RestClient {
    client: Client,
    api_url: Url,
    repo: Repo,
    token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ReactionRecord {
    content: ReactionKind,
}

#[derive(Deserialize)]
struct PullRequestRecord {
    number: u64,
    head: PullRequestRef,
}

#[derive(Deserialize)]
struct PullRequestRef {
    sha: String,
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<Workflow>,
}

#[derive(Deserialize)]
struct WorkflowRunList {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>,
}

impl RestClient {
    pub fn new(api_url: &str, repo: Repo, token: impl Into<String>) -> Result<Self> {
        let api_url = Url::parse(api_url.trim())
            .map_err(|err| HostError::Other(format!("Invalid API URL '{api_url}': {err}")))?;
        if api_url.cannot_be_a_base() {
            return Err(HostError::Other(format!("Invalid API URL '{api_url}'")));
        }
        let client = Client::builder()
            .user_agent(concat!("cla-gate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url,
            repo,
            token: token.into(),
        })
    }

    fn repo_url(&self, segments: &[&str]) -> Url {
        repo_url(&self.api_url, &self.repo, segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, method: Method, url: Url, body: Option<serde_json::Value>) -> Result<Response> {
        let path = url.path().to_string();
        log::debug!("{method} {path}");
        let mut builder = self.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&raw)
            .map(|body| body.message)
            .unwrap_or(raw);
        Err(HostError::Api {
            method: method.to_string(),
            path,
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(Method::GET, url, None).await?;
        let raw = response.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn get_paginated<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        self.get_pages(url, |page: Vec<T>| page).await
    }

    /// Follows `rel="next"` links, pulling the items out of each page with `items`.
    async fn get_pages<P, T>(&self, mut url: Url, items: impl Fn(P) -> Vec<T>) -> Result<Vec<T>>
    where
        P: DeserializeOwned,
    {
        url.query_pairs_mut().append_pair("per_page", PER_PAGE);
        let mut collected = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next.take() {
            let response = self.send(Method::GET, page_url, None).await?;
            next = next_page_url(response.headers());
            let raw = response.text().await?;
            let page: P = serde_json::from_str(&raw)?;
            collected.extend(items(page));
        }
        Ok(collected)
    }
}

fn repo_url(api_url: &Url, repo: &Repo, segments: &[&str]) -> Url {
    let mut url = api_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(segments);
    }
    url
}

fn next_page_url(headers: &HeaderMap) -> Option<Url> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    next_page_link(raw).and_then(|link| Url::parse(&link).ok())
}

/// Extracts the `rel="next"` target of an RFC 8288 `Link` header.
pub(crate) fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[async_trait]
impl HostApi for RestClient {
    async fn fetch_commits(&self, number: u64) -> Result<Vec<Commit>> {
        let number = number.to_string();
        self.get_paginated(self.repo_url(&["pulls", number.as_str(), "commits"]))
            .await
    }

    async fn add_label(&self, number: u64, label: &str) -> Result<()> {
        let url = self.repo_url(&["issues", number.to_string().as_str(), "labels"]);
        self.send(Method::POST, url, Some(json!({ "labels": [label] })))
            .await?;
        Ok(())
    }

    async fn remove_label(&self, number: u64, label: &str) -> Result<()> {
        let url = self.repo_url(&["issues", number.to_string().as_str(), "labels", label]);
        match self.send(Method::DELETE, url, None).await {
            Ok(_) => Ok(()),
            Err(HostError::Api {
                status: 404,
                message,
                ..
            }) if message == LABEL_MISSING_MESSAGE => Err(HostError::LabelNotFound {
                number,
                label: label.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    async fn list_comments(&self, number: u64) -> Result<Vec<Comment>> {
        let number = number.to_string();
        self.get_paginated(self.repo_url(&["issues", number.as_str(), "comments"]))
            .await
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<()> {
        let url = self.repo_url(&["issues", number.to_string().as_str(), "comments"]);
        self.send(Method::POST, url, Some(json!({ "body": body })))
            .await?;
        Ok(())
    }

    async fn list_reactions(&self, comment_id: u64) -> Result<Vec<ReactionKind>> {
        let id = comment_id.to_string();
        let records: Vec<ReactionRecord> = self
            .get_paginated(self.repo_url(&["issues", "comments", id.as_str(), "reactions"]))
            .await?;
        Ok(records.into_iter().map(|record| record.content).collect())
    }

    async fn add_reaction(&self, comment_id: u64, kind: ReactionKind) -> Result<()> {
        let url = self.repo_url(&["issues", "comments", comment_id.to_string().as_str(), "reactions"]);
        self.send(Method::POST, url, Some(json!({ "content": kind })))
            .await?;
        Ok(())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestHead> {
        let record: PullRequestRecord = self
            .get_json(self.repo_url(&["pulls", number.to_string().as_str()]))
            .await?;
        Ok(PullRequestHead {
            number: record.number,
            sha: record.head.sha,
            branch: record.head.branch,
        })
    }

    async fn find_workflow_by_name(&self, name: &str) -> Result<Option<Workflow>> {
        let workflows = self
            .get_pages(self.repo_url(&["actions", "workflows"]), |list: WorkflowList| {
                list.workflows
            })
            .await?;
        Ok(workflows.into_iter().find(|workflow| workflow.name == name))
    }

    async fn list_workflow_runs(
        &self,
        number: u64,
        workflow_id: u64,
        event: &str,
    ) -> Result<Vec<WorkflowRun>> {
        let head = self.get_pull_request(number).await?;
        let mut url = self.repo_url(&["actions", "workflows", workflow_id.to_string().as_str(), "runs"]);
        url.query_pairs_mut()
            .append_pair("branch", &head.branch)
            .append_pair("event", event);
        let list: WorkflowRunList = self.get_json(url).await?;
        Ok(list.workflow_runs)
    }

    async fn get_workflow_run(&self, run_id: u64) -> Result<WorkflowRun> {
        self.get_json(self.repo_url(&["actions", "runs", run_id.to_string().as_str()]))
            .await
    }

    async fn rerun_workflow(&self, run_id: u64) -> Result<()> {
        let url = self.repo_url(&["actions", "runs", run_id.to_string().as_str(), "rerun"]);
        self.send(Method::POST, url, None).await?;
        Ok(())
    }
}
