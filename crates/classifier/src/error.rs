use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// A single failed call to the signature registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid registry response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("CLA registry unavailable after {attempts} attempt(s): {source}")]
    RegistryUnavailable {
        attempts: u32,
        #[source]
        source: RegistryError,
    },
}
