use async_trait::async_trait;
use cla_classifier::{
    AuthorClassificationService, RegistryError, SignatureRegistry, SignedUsernames,
};
use cla_protocol::{Author, ClassifiedAuthors};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Reports a fixed set of logins as signed.
struct FixedRegistry {
    signed: HashSet<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl SignatureRegistry for FixedRegistry {
    async fn fetch_signed_logins(&self, logins_csv: &str) -> Result<SignedUsernames, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let signed_usernames = logins_csv
            .split(',')
            .filter(|login| self.signed.contains(*login))
            .map(str::to_string)
            .collect();
        Ok(SignedUsernames { signed_usernames })
    }
}

fn author_strategy() -> impl Strategy<Value = Author> {
    (
        prop::sample::select(vec!["Ada", "Bob", ""]),
        prop::sample::select(vec!["a@example.com", "b@example.com"]),
        prop::option::of((1u64..4, prop::sample::select(vec!["ada", "bob", "cy"]))),
    )
        .prop_map(|(name, email, account)| match account {
            Some((id, login)) => Author::new(name, email, Some(id), Some(login.to_string())),
            None => Author::anonymous(name, email),
        })
}

fn classify(authors: &[Author], signed: &HashSet<String>) -> (ClassifiedAuthors, usize) {
    let registry = Arc::new(FixedRegistry {
        signed: signed.clone(),
        calls: AtomicUsize::new(0),
    });
    let service = AuthorClassificationService::new(registry.clone());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let result = runtime
        .block_on(service.classify(authors))
        .expect("classify");
    (result, registry.calls.load(Ordering::SeqCst))
}

proptest! {
    #[test]
    fn output_partitions_the_deduplicated_input(
        authors in prop::collection::vec(author_strategy(), 0..12),
        signed in prop::collection::hash_set(prop::sample::select(vec!["ada".to_string(), "bob".to_string(), "cy".to_string()]), 0..3),
    ) {
        let (result, calls) = classify(&authors, &signed);

        let input: HashSet<Author> = authors.iter().cloned().collect();
        let buckets = [&result.valid, &result.without_cla, &result.without_github_account];

        let mut union = HashSet::new();
        for bucket in buckets {
            for author in bucket {
                prop_assert!(union.insert(author.clone()), "{author:?} appears twice");
            }
        }
        prop_assert_eq!(union, input);
        prop_assert!(calls <= 1);
        prop_assert!(result.without_github_account.iter().all(|a| !a.has_account()));
        prop_assert!(result.valid.iter().all(|a| signed.contains(a.login.as_deref().unwrap_or_default())));
    }

    #[test]
    fn classifying_duplicates_matches_classifying_the_set(
        authors in prop::collection::vec(author_strategy(), 0..8),
    ) {
        let signed: HashSet<String> = ["ada".to_string()].into_iter().collect();
        let mut doubled = authors.clone();
        doubled.extend(authors.iter().cloned());

        let (once, _) = classify(&authors, &signed);
        let (twice, _) = classify(&doubled, &signed);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn only_anonymous_authors_make_zero_calls(
        names in prop::collection::vec(prop::sample::select(vec!["Ada", "Bob"]), 1..6),
    ) {
        let authors: Vec<Author> = names
            .into_iter()
            .map(|name| Author::anonymous(name, "mystery@example.com"))
            .collect();
        let (result, calls) = classify(&authors, &HashSet::new());
        prop_assert_eq!(calls, 0);
        prop_assert!(result.valid.is_empty() && result.without_cla.is_empty());
    }
}
