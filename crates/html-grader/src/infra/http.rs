//! HTTP transport used for remote document acquisition.

use std::error::Error as _;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::errors::GradeError;

/// Transport settings for remote fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

/// Status line and decoded body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl FetchedBody {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Black-box GET transport. Implementations report transport failures as
/// [`GradeError::Network`] and leave status interpretation to the caller.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedBody, GradeError>;
}

/// [`HttpFetcher`] backed by a `reqwest` client with a bounded timeout.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedBody, GradeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| network_error(url, &err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| network_error(url, &err))?;

        Ok(FetchedBody {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_owned),
            body,
        })
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> GradeError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GradeError::Network {
        url: url.to_owned(),
        message,
        timed_out: err.is_timeout(),
    }
}
