use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::github::source::RepoSource;
use crate::models::ContentEntry;

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

/// The contents endpoint answers with a list for directories and with a single
/// object when the path resolves to a file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Other(serde_json::Value),
}

impl GitHubClient {
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("rootdocs/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check_status(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &headers, what, &body))
    }
}

/// Maps a non-success response to an error: 404 is a missing repository, an
/// exhausted quota on 403/429 is a rate limit, anything else is a plain API error.
fn status_error(status: StatusCode, headers: &HeaderMap, what: &str, body: &str) -> Error {
    if status == StatusCode::NOT_FOUND {
        return Error::RepoNotFound(what.to_string());
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if let Some(reset_in) = rate_limit_reset(headers, chrono::Utc::now().timestamp()) {
            return Error::RateLimited(reset_in);
        }
    }

    Error::GitHubApi(format!("Failed to fetch {}: {} - {}", what, status, body))
}

/// Seconds until the rate-limit window resets, when the headers say the quota
/// is exhausted.
fn rate_limit_reset(headers: &HeaderMap, now: i64) -> Option<u64> {
    let remaining: u64 = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())?;
    if remaining > 0 {
        return None;
    }

    let reset_at: u64 = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    Some(reset_at.saturating_sub(now.max(0) as u64))
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn list_root(&self, owner: &str, repo: &str) -> Result<Vec<ContentEntry>> {
        let url = format!("{}/repos/{}/{}/contents/", self.base_url, owner, repo);
        tracing::debug!("Listing root of {}/{}", owner, repo);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, &format!("{}/{}", owner, repo)).await?;

        match response.json::<ContentsResponse>().await? {
            ContentsResponse::Listing(entries) => Ok(entries),
            ContentsResponse::Other(_) => {
                tracing::warn!("No directory listing returned for {}/{}", owner, repo);
                Ok(Vec::new())
            }
        }
    }

    async fn fetch_raw(&self, download_url: &str) -> Result<String> {
        tracing::debug!("Downloading {}", download_url);
        let response = self.client.get(download_url).send().await?;
        let response = Self::check_status(response, download_url).await?;
        Ok(response.text().await?)
    }
}
