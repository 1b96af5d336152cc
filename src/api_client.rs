use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

pub struct ApiClient {
    base_url: String,
    repo: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String, repo: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            repo,
            client,
        })
    }

    pub async fn latest_release(&self) -> Result<Release> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, self.repo);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .context("Failed to send request to release API")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("Repository {} has no published releases", self.repo);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Release API error ({}): {}", status, text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read release API response")?;

        parse_release(&body)
    }
}

fn parse_release(body: &str) -> Result<Release> {
    let release: Release =
        serde_json::from_str(body).context("Failed to parse release API response")?;

    if release.tag_name.trim().is_empty() {
        anyhow::bail!("Release API returned an empty tag");
    }

    Ok(release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_release_payload() {
        let body = r#"{
            "tag_name": "v1.4.0",
            "html_url": "https://github.com/someone/fest-bot/releases/tag/v1.4.0",
            "published_at": "2025-05-01T12:00:00Z",
            "draft": false,
            "assets": []
        }"#;

        let release = parse_release(body).unwrap();
        assert_eq!(release.tag_name, "v1.4.0");
        assert_eq!(
            release.html_url.as_deref(),
            Some("https://github.com/someone/fest-bot/releases/tag/v1.4.0")
        );
        assert_eq!(
            release.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let release = parse_release(r#"{"tag_name": "2.0.0"}"#).unwrap();
        assert_eq!(release.tag_name, "2.0.0");
        assert!(release.html_url.is_none());
        assert!(release.published_at.is_none());
    }

    #[test]
    fn rejects_missing_or_empty_tag() {
        assert!(parse_release(r#"{"message": "Not Found"}"#).is_err());
        assert!(parse_release(r#"{"tag_name": "  "}"#).is_err());
        assert!(parse_release("<html>").is_err());
    }
}
