//! # CLA GitHub
//!
//! The source-control host as seen by the CLA gate: a [`HostApi`] trait covering
//! commits, labels, comments, reactions and workflow runs, plus [`RestClient`],
//! its binding to the GitHub REST API.
//!
//! Label removal reports an absent label as [`HostError::LabelNotFound`] so the
//! caller can decide to ignore it; every other call maps non-2xx responses to
//! [`HostError::Api`].

mod error;
mod host;
mod rest;

pub use error::{HostError, Result};
pub use host::{HostApi, Repo};
pub use rest::{RestClient, DEFAULT_API_URL};
