use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {path} failed with status {status}: {message}")]
    Api {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    /// Removing a label that is not on the issue.
    #[error("Label '{label}' does not exist on #{number}")]
    LabelNotFound { number: u64, label: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid repository '{0}' (expected owner/name)")]
    InvalidRepository(String),

    #[error("{0}")]
    Other(String),
}

impl HostError {
    pub fn is_label_not_found(&self) -> bool {
        matches!(self, Self::LabelNotFound { .. })
    }
}
