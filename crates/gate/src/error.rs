use cla_github::HostError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GateError>;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Cannot find current workflow '{0}'")]
    WorkflowNotFound(String),

    #[error("Cannot find last run for the workflow: {workflow_id}")]
    NoPriorRunFound { workflow_id: u64 },

    #[error("Failed to re-run workflow run {run_id}: {source}")]
    RerunFailed {
        run_id: u64,
        #[source]
        source: HostError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid CLA comment pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}
