use serde::{Deserialize, Serialize};

/// One distinct contribution identity.
///
/// Equality and hashing cover all four fields, so two commits made by the same
/// person under different emails produce two authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl Author {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        id: Option<u64>,
        login: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            id,
            login,
        }
    }

    /// Author whose commits are not linked to any account on the host.
    pub fn anonymous(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, None, None)
    }

    pub fn has_account(&self) -> bool {
        self.id.is_some()
    }

    /// `@login`, only for authors with a linked account.
    pub fn formatted_login(&self) -> Option<String> {
        if !self.has_account() {
            return None;
        }
        self.login.as_deref().map(|login| format!("@{login}"))
    }

    /// Backtick-quoted `name <email>` line, usable for every author.
    pub fn formatted_committer_line(&self) -> String {
        format!("`{} <{}>`", self.name, self.email)
    }
}

/// Three-way split of a deduplicated author set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAuthors {
    /// Linked account and a signed CLA.
    pub valid: Vec<Author>,
    /// Linked account, no CLA on file.
    pub without_cla: Vec<Author>,
    /// No linked account; never sent to the registry.
    pub without_github_account: Vec<Author>,
}

impl ClassifiedAuthors {
    pub fn problematic_count(&self) -> usize {
        self.without_cla.len() + self.without_github_account.len()
    }

    pub fn all_signed(&self) -> bool {
        self.problematic_count() == 0
    }

    /// One entry per unsigned author: `@login`, or the committer line when the
    /// account carries no login.
    pub fn unsigned_logins(&self) -> Vec<String> {
        self.without_cla
            .iter()
            .map(|author| {
                author
                    .formatted_login()
                    .unwrap_or_else(|| author.formatted_committer_line())
            })
            .collect()
    }

    pub fn orphan_committer_lines(&self) -> Vec<String> {
        self.without_github_account
            .iter()
            .map(Author::formatted_committer_line)
            .collect()
    }
}
