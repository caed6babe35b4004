use crate::config::GateConfig;
use crate::error::Result;
use crate::message;
use cla_classifier::{extract_authors, AuthorClassificationService, ClassifierError, ExtractedAuthors};
use cla_github::{HostApi, HostError};
use cla_protocol::{serialize_json, ClassifiedAuthors};
use futures::future::{join_all, try_join_all};
use std::fmt;
use std::sync::Arc;

/// Phases of one check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Fetching,
    Classifying,
    Reconciling,
    Done,
    Errored,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::Reconciling => "reconciling",
            Self::Done => "done",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// Some authors are unsigned or unidentifiable; the message names them.
    Failed { message: String },
    /// The registry never answered; labels were left untouched.
    RegistryUnavailable { message: String },
}

impl CheckOutcome {
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { message } | Self::RegistryUnavailable { message } => Some(message),
        }
    }
}

/// Removes `label`, treating an absent label as already removed.
pub async fn remove_label_if_present(
    host: &dyn HostApi,
    number: u64,
    label: &str,
) -> std::result::Result<(), HostError> {
    match host.remove_label(number, label).await {
        Err(err) if err.is_label_not_found() => Ok(()),
        other => other,
    }
}

/// Fetches the commits of every pull request concurrently and derives their authors.
pub async fn collect_authors(host: &dyn HostApi, numbers: &[u64]) -> Result<ExtractedAuthors> {
    let commit_lists = try_join_all(numbers.iter().map(|&number| host.fetch_commits(number))).await?;
    Ok(extract_authors(commit_lists))
}

/// Runs the CLA check for pull requests sharing one head commit and reconciles labels.
pub struct ClaCheck {
    host: Arc<dyn HostApi>,
    classifier: AuthorClassificationService,
    config: GateConfig,
}

impl ClaCheck {
    pub fn new(
        host: Arc<dyn HostApi>,
        classifier: AuthorClassificationService,
        config: GateConfig,
    ) -> Self {
        Self {
            host,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub async fn check(&self, head_sha: &str, numbers: &[u64]) -> Result<CheckOutcome> {
        let mut state = CheckState::Fetching;
        let result = self.run(head_sha, numbers, &mut state).await;
        match &result {
            Ok(_) => advance(head_sha, &mut state, CheckState::Done),
            Err(err) => {
                log::error!("CLA: {head_sha} Failed while {state}: {err}");
                advance(head_sha, &mut state, CheckState::Errored);
            }
        }
        result
    }

    async fn run(&self, head_sha: &str, numbers: &[u64], state: &mut CheckState) -> Result<CheckOutcome> {
        log::info!("CLA: {head_sha} Fetching commits");
        let extracted = collect_authors(self.host.as_ref(), numbers).await?;
        log::info!(
            "CLA: {head_sha} Found {} commits with {} unique authors",
            extracted.commit_count,
            extracted.authors.len()
        );

        advance(head_sha, state, CheckState::Classifying);
        let classified = match self.classifier.classify(&extracted.authors).await {
            Ok(classified) => classified,
            Err(ClassifierError::RegistryUnavailable { attempts, source }) => {
                advance(head_sha, state, CheckState::Reconciling);
                let message = message::registry_unavailable(&self.config);
                log::error!("{message}");
                log::debug!("CLA: {head_sha} Registry gave up after {attempts} attempt(s): {source}");
                return Ok(CheckOutcome::RegistryUnavailable { message });
            }
        };
        log_classification(head_sha, &classified);

        advance(head_sha, state, CheckState::Reconciling);
        if classified.all_signed() {
            log::info!("CLA: {head_sha} All authors have signed a CLA. Passing check");
            self.update_labels(numbers, LabelChange::Remove).await?;
            log::info!("{}", message::success_summary(&self.config));
            return Ok(CheckOutcome::Passed);
        }

        log::info!(
            "CLA: {head_sha} Not all authors have signed a CLA or have a GitHub account associated with their email. Failing check"
        );
        let message = message::failure_summary(
            &self.config,
            &classified.unsigned_logins(),
            &classified.orphan_committer_lines(),
        );
        self.update_labels(numbers, LabelChange::Add).await?;
        Ok(CheckOutcome::Failed { message })
    }

    /// Applies the change to every pull request; one failure does not stop the others.
    async fn update_labels(&self, numbers: &[u64], change: LabelChange) -> Result<()> {
        let label = self.config.label.as_str();
        let host = self.host.as_ref();
        let results = join_all(numbers.iter().map(|&number| async move {
            match change {
                LabelChange::Add => host.add_label(number, label).await,
                LabelChange::Remove => remove_label_if_present(host, number, label).await,
            }
        }))
        .await;

        let mut first_error = None;
        for (number, result) in numbers.iter().zip(results) {
            if let Err(err) = result {
                log::error!("CLA: Failed to {change} label '{label}' on #{number}: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LabelChange {
    Add,
    Remove,
}

impl fmt::Display for LabelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

fn advance(head_sha: &str, state: &mut CheckState, next: CheckState) {
    log::debug!("CLA: {head_sha} {state} -> {next}");
    *state = next;
}

fn log_classification(head_sha: &str, classified: &ClassifiedAuthors) {
    match serialize_json(classified) {
        Ok(json) => log::debug!("CLA: {head_sha} {json}"),
        Err(err) => log::debug!("CLA: {head_sha} Classification not serializable: {err}"),
    }
}
