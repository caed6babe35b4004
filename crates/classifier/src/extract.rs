use cla_protocol::{Author, Commit};
use std::collections::HashSet;
use std::hash::Hash;

/// Authors found across the commits of one check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAuthors {
    pub authors: Vec<Author>,
    /// Commits left after exact duplicates were dropped.
    pub commit_count: usize,
}

/// Drops repeated values, keeping the first occurrence and the original order.
pub fn dedup_by_value<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn author_from_commit(commit: &Commit) -> Author {
    let identity = commit.commit.author.clone().unwrap_or_default();
    let account = commit.author.clone().unwrap_or_default();
    Author::new(
        identity.name.unwrap_or_default(),
        identity.email.unwrap_or_default(),
        account.id,
        account.login,
    )
}

/// Unions the commit lists of several pull requests and derives their distinct authors.
pub fn extract_authors<I>(commit_lists: I) -> ExtractedAuthors
where
    I: IntoIterator<Item = Vec<Commit>>,
{
    let commits = dedup_by_value(commit_lists.into_iter().flatten());
    let authors = dedup_by_value(commits.iter().map(author_from_commit));
    ExtractedAuthors {
        commit_count: commits.len(),
        authors,
    }
}
