//! # CLA Protocol
//!
//! Value types shared by every crate of the CLA gate: the [`Author`] identity
//! derived from commits, the [`ClassifiedAuthors`] partition, and the records
//! read from the source-control host.

use anyhow::Result;
use serde::Serialize;

mod author;
mod host;

pub use author::{Author, ClassifiedAuthors};
pub use host::{
    Comment, Commit, CommitAccount, CommitDetails, GitIdentity, PullRequestHead, ReactionKind,
    Workflow, WorkflowRun,
};

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
