use crate::error::{GateError, Result};
use cla_classifier::RetryPolicy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LABEL: &str = "cla-needed";
pub const DEFAULT_CLA_URL: &str = "https://cla.shopify.com";
pub const DEFAULT_COMMENT_PATTERN: &str = r"(?i)I.*signed.*CLA";

const RESTART_WORKFLOW_COMMENT: &str = "CLA: Unexpected error has occurred, please re-run the workflow.

We are sorry for the inconvenience, due to GitHub actions limitations this requires a manual intervention.

There are few ways to do it:
- Create a new pull request with the same changes.
- Push an empty commit to the branch.
- Rebase the branch on top of the latest master might also help.

If the issue persists, please contact the maintainers of this repo.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Label kept on pull requests while any author still needs to sign.
    pub label: String,
    pub cla_url: String,
    pub messages: Messages,
    pub registry: RegistrySettings,
    pub comments: CommentSettings,
}

/// Message templates. Placeholders: `{{claUrl}}`, `{{usernames}}`, `{{emails}}`, `{{registry}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub welcome: String,
    pub request_known_users: String,
    pub request_unknown_users: String,
    pub success: String,
    pub registry_unavailable: String,
    pub restart_workflow: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Falls back to `cla_url` when unset.
    pub endpoint: Option<String>,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentSettings {
    pub strategy: CommentStrategy,
    /// Trigger event of the workflow runs a comment may re-run.
    pub workflow_event: String,
    pub pattern: String,
}

/// How a "I signed the CLA" comment gets acted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStrategy {
    /// Re-run the last pull request run; pull request runs react to the comment afterwards.
    #[default]
    Rerun,
    /// Run the whole check directly from the comment event.
    Recheck,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            cla_url: DEFAULT_CLA_URL.to_string(),
            messages: Messages::default(),
            registry: RegistrySettings::default(),
            comments: CommentSettings::default(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            welcome: "In order to merge this pull request, all contributors must sign [Shopify’s CLA]({{claUrl}}).".to_string(),
            request_known_users: "{{usernames}}: [Sign the CLA]({{claUrl}}) to have your PR reviewed.".to_string(),
            request_unknown_users: "{{emails}}: Connect your email address with a GitHub account and [sign the CLA]({{claUrl}}) to have your PR reviewed.".to_string(),
            success: "All contributors have signed and are covered by Shopify’s CLA.".to_string(),
            registry_unavailable: "CLA: Failed to get a response from {{registry}}, please try again later.".to_string(),
            restart_workflow: RESTART_WORKFLOW_COMMENT.to_string(),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_attempts: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl Default for CommentSettings {
    fn default() -> Self {
        Self {
            strategy: CommentStrategy::Rerun,
            workflow_event: "pull_request_target".to_string(),
            pattern: DEFAULT_COMMENT_PATTERN.to_string(),
        }
    }
}

impl GateConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| GateError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            GateError::Config(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(GateError::Config("label must not be empty".to_string()));
        }
        if self.registry_endpoint().trim().is_empty() {
            return Err(GateError::Config(
                "registry endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn registry_endpoint(&self) -> &str {
        self.registry.endpoint.as_deref().unwrap_or(&self.cla_url)
    }

    /// Host part of the registry endpoint, for user-facing messages.
    pub fn registry_display_name(&self) -> &str {
        let endpoint = self.registry_endpoint().trim();
        let without_scheme = endpoint
            .split_once("://")
            .map_or(endpoint, |(_, rest)| rest);
        without_scheme
            .split('/')
            .next()
            .unwrap_or(without_scheme)
    }

    /// Compiled acknowledgement pattern.
    pub fn comment_pattern(&self) -> Result<Regex> {
        Ok(Regex::new(&self.comments.pattern)?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.registry.max_attempts,
            Duration::from_millis(self.registry.retry_delay_ms),
        )
    }
}
