//! # CLA Classifier
//!
//! Turns the commits of one or more pull requests into a CLA verdict per author.
//!
//! ## Pipeline
//!
//! ```text
//! Commit lists (one per PR)
//!     │
//!     ├──> extract_authors (union, exact-commit dedup, author dedup)
//!     │      └─> Author[]
//!     │
//!     └──> AuthorClassificationService
//!            ├─> no linked account  ──> without_github_account
//!            └─> SignatureRegistry (one batched call, bounded retry)
//!                   ├─> signed      ──> valid
//!                   └─> not signed  ──> without_cla
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cla_classifier::{AuthorClassificationService, HttpRegistry, RetryPolicy};
//! use cla_protocol::Author;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = HttpRegistry::new("https://cla.shopify.com", "secret")?;
//!     let service = AuthorClassificationService::new(Arc::new(registry))
//!         .with_retry(RetryPolicy::new(3, Duration::from_secs(1)));
//!
//!     let authors = vec![Author::new("Ada", "ada@example.com", Some(1), Some("ada".into()))];
//!     let classified = service.classify(&authors).await?;
//!     println!("{} authors still need to sign", classified.problematic_count());
//!     Ok(())
//! }
//! ```

mod classify;
mod error;
mod extract;
mod registry;
mod retry;

pub use classify::{partition_authors, AuthorClassificationService};
pub use error::{ClassifierError, RegistryError, Result};
pub use extract::{author_from_commit, dedup_by_value, extract_authors, ExtractedAuthors};
pub use registry::{HttpRegistry, SignatureRegistry, SignedUsernames};
pub use retry::{Exhausted, RetryPolicy};
