use crate::error::RegistryError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

const CONTRIBUTOR_CHECK_PATH: &str = "api/contributor-check";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUsernames {
    #[serde(default)]
    pub signed_usernames: Vec<String>,
}

/// Remote record of which host logins have signed the CLA.
#[async_trait]
pub trait SignatureRegistry: Send + Sync {
    /// Looks up a comma-separated batch of logins in one request.
    async fn fetch_signed_logins(&self, logins_csv: &str)
        -> Result<SignedUsernames, RegistryError>;
}

/// Registry reached over HTTP with a `Token` authorization header.
pub struct HttpRegistry {
    client: Client,
    endpoint: Url,
    token: String,
}

impl HttpRegistry {
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(concat!("cla-gate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: contributor_check_url(endpoint)?,
            token: token.into(),
        })
    }
}

fn contributor_check_url(endpoint: &str) -> Result<Url, RegistryError> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    let base = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Url::parse(&format!("{base}/{CONTRIBUTOR_CHECK_PATH}"))
        .map_err(|err| RegistryError::Other(format!("Invalid registry endpoint '{endpoint}': {err}")))
}

fn parse_signed_usernames(body: &str) -> Result<SignedUsernames, RegistryError> {
    if body.trim().is_empty() {
        return Ok(SignedUsernames::default());
    }
    let parsed: Option<SignedUsernames> = serde_json::from_str(body)?;
    Ok(parsed.unwrap_or_default())
}

#[async_trait]
impl SignatureRegistry for HttpRegistry {
    async fn fetch_signed_logins(
        &self,
        logins_csv: &str,
    ) -> Result<SignedUsernames, RegistryError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("usernames", logins_csv)])
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_signed_usernames(&body)
    }
}
