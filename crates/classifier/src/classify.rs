use crate::error::{ClassifierError, Result};
use crate::extract::dedup_by_value;
use crate::registry::SignatureRegistry;
use crate::retry::RetryPolicy;
use cla_protocol::{Author, ClassifiedAuthors};
use std::collections::HashSet;
use std::sync::Arc;

/// Splits authors into signed, unsigned and account-less.
///
/// Only authors with a linked account are sent to the registry, in a single
/// batched request per call to [`classify`](Self::classify).
pub struct AuthorClassificationService {
    registry: Arc<dyn SignatureRegistry>,
    retry: RetryPolicy,
}

impl AuthorClassificationService {
    pub fn new(registry: Arc<dyn SignatureRegistry>) -> Self {
        Self {
            registry,
            retry: RetryPolicy::single_attempt(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub async fn classify(&self, authors: &[Author]) -> Result<ClassifiedAuthors> {
        let authors = dedup_by_value(authors.iter().cloned());
        let logins: Vec<&str> = dedup_by_value(
            authors
                .iter()
                .filter(|author| author.has_account())
                .filter_map(|author| author.login.as_deref()),
        );

        let signed = if logins.is_empty() {
            HashSet::new()
        } else {
            self.fetch_signed(&logins.join(",")).await?
        };

        Ok(partition_authors(authors, &signed))
    }

    async fn fetch_signed(&self, logins_csv: &str) -> Result<HashSet<String>> {
        log::debug!("Checking CLA signatures for {logins_csv}");
        let response = self
            .retry
            .run("CLA registry", move |_| self.registry.fetch_signed_logins(logins_csv))
            .await
            .map_err(|exhausted| ClassifierError::RegistryUnavailable {
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })?;
        Ok(response.signed_usernames.into_iter().collect())
    }
}

/// Three-way split against a known set of signed logins.
pub fn partition_authors(
    authors: impl IntoIterator<Item = Author>,
    signed: &HashSet<String>,
) -> ClassifiedAuthors {
    let mut classified = ClassifiedAuthors::default();
    for author in authors {
        if !author.has_account() {
            classified.without_github_account.push(author);
        } else if author
            .login
            .as_ref()
            .is_some_and(|login| signed.contains(login))
        {
            classified.valid.push(author);
        } else {
            classified.without_cla.push(author);
        }
    }
    classified
}
