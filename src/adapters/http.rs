use crate::domain::freshness::outcome_from_header;
use crate::domain::model::{ProbeOutcome, SkipReason};
use crate::utils::error::{HarvestError, Result};
use reqwest::header::LAST_MODIFIED;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

/// HTTP access to the statistics site. Every request carries the configured
/// User-Agent and its own timeout; redirects are followed.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
}

impl SiteClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the body; non-2xx answers are errors.
    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// HEADs `url` and reads its `Last-Modified` header. Never fails: every
    /// problem is reported as a skip reason.
    pub async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let response = match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::Skipped(SkipReason::Network(e.to_string())),
        };

        let status = response.status().as_u16();
        if status >= 400 {
            return ProbeOutcome::Skipped(SkipReason::Status(status));
        }

        match response.headers().get(LAST_MODIFIED) {
            None => outcome_from_header(None),
            Some(value) => match value.to_str() {
                Ok(text) => outcome_from_header(Some(text)),
                Err(_) => ProbeOutcome::Skipped(SkipReason::UnreadableLastModified(
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_page_sends_user_agent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/en/2025/abou-dhabi/grille.aspx")
                .header("user-agent", "Mozilla/5.0");
            then.status(200).body("<table></table>");
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let body = client
            .fetch_page(
                &server.url("/en/2025/abou-dhabi/grille.aspx"),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        page_mock.assert();
        assert_eq!(body, "<table></table>");
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.aspx");
            then.status(404);
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let result = client
            .fetch_page(&server.url("/missing.aspx"), Duration::from_secs(5))
            .await;

        assert!(matches!(
            result,
            Err(HarvestError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_probe_reads_last_modified() {
        let server = MockServer::start();
        let head_mock = server.mock(|when, then| {
            when.method(httpmock::Method::HEAD)
                .path("/en/2025/abou-dhabi/classement.aspx");
            then.status(200)
                .header("Last-Modified", "Tue, 03 Dec 2025 10:00:00 GMT");
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let outcome = client
            .probe(
                &server.url("/en/2025/abou-dhabi/classement.aspx"),
                Duration::from_secs(5),
            )
            .await;

        head_mock.assert();
        let expected = NaiveDate::from_ymd_opt(2025, 12, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(
            outcome,
            ProbeOutcome::Fresh {
                last_modified: Some(expected)
            }
        );
    }

    #[tokio::test]
    async fn test_probe_follows_redirects() {
        let server = MockServer::start();
        let moved_mock = server.mock(|when, then| {
            when.method(httpmock::Method::HEAD)
                .path("/en/2025/qatar/classement.aspx");
            then.status(301)
                .header("Location", server.url("/en/2025/qatar/resultats.aspx"));
        });
        let target_mock = server.mock(|when, then| {
            when.method(httpmock::Method::HEAD)
                .path("/en/2025/qatar/resultats.aspx");
            then.status(200)
                .header("Last-Modified", "Sun, 30 Nov 2025 18:30:00 GMT");
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let outcome = client
            .probe(
                &server.url("/en/2025/qatar/classement.aspx"),
                Duration::from_secs(5),
            )
            .await;

        moved_mock.assert();
        target_mock.assert();
        let expected = NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(
            outcome,
            ProbeOutcome::Fresh {
                last_modified: Some(expected)
            }
        );
    }

    #[tokio::test]
    async fn test_probe_without_header_is_undated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::HEAD).path("/page.aspx");
            then.status(200);
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let outcome = client
            .probe(&server.url("/page.aspx"), Duration::from_secs(5))
            .await;

        assert_eq!(outcome, ProbeOutcome::Fresh { last_modified: None });
    }

    #[tokio::test]
    async fn test_probe_skips_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::HEAD).path("/gone.aspx");
            then.status(410);
        });

        let client = SiteClient::new("Mozilla/5.0").unwrap();
        let outcome = client
            .probe(&server.url("/gone.aspx"), Duration::from_secs(5))
            .await;

        assert_eq!(outcome, ProbeOutcome::Skipped(SkipReason::Status(410)));
    }

    #[tokio::test]
    async fn test_probe_skips_unreachable_host() {
        let client = SiteClient::new("Mozilla/5.0").unwrap();
        // Nothing listens on the discard port locally.
        let outcome = client
            .probe("http://127.0.0.1:9/page.aspx", Duration::from_secs(2))
            .await;

        assert!(matches!(
            outcome,
            ProbeOutcome::Skipped(SkipReason::Network(_))
        ));
    }
}
