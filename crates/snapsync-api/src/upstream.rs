//! HTTP client for the upstream SnapSync API.
//!
//! The upstream owns the application/access logs and the face-embedding index;
//! the admin service only reads them (and asks it to clear logs).

use std::time::Duration;

use reqwest::{Client, Method, Response};
use snapsync_common::{
    config::UpstreamConfig,
    error::{SnapError, SnapResult},
    models::{ClearLogsRequest, LogType, UpstreamStatsEnvelope},
};

/// Pooled client bound to one upstream base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("SnapSync-Admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Build a client if an upstream is configured.
    pub fn from_config(config: &UpstreamConfig) -> Result<Option<Self>, reqwest::Error> {
        match config.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Self::new(url, Duration::from_secs(config.timeout_secs)).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    /// Send a request, turning transport failures and non-2xx statuses into `action` errors.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&ClearLogsRequest>,
        action: &str,
    ) -> SnapResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Upstream request failed");
            SnapError::Upstream {
                message: action.to_owned(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Upstream returned an error status");
            return Err(SnapError::Upstream {
                message: format!("{action} (upstream status {})", status.as_u16()),
            });
        }
        Ok(resp)
    }

    // ── Logs ──────────────────────────────────────────────────────────────────

    /// Download a log file as text.
    pub async fn fetch_log_text(&self, log_type: LogType) -> SnapResult<String> {
        const ACTION: &str = "Failed to fetch logs";
        let resp = self
            .send(Method::GET, log_type.download_path(), None, ACTION)
            .await?;
        resp.text().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read upstream log body");
            SnapError::Upstream {
                message: ACTION.to_owned(),
            }
        })
    }

    /// Ask the upstream to truncate a log file.
    pub async fn clear_logs(&self, request: &ClearLogsRequest) -> SnapResult<()> {
        self.send(Method::POST, "/api/logs/clear", Some(request), "Failed to clear logs")
            .await?;
        Ok(())
    }

    // ── Stats ─────────────────────────────────────────────────────────────────

    /// Total face embeddings known to the upstream.
    pub async fn embeddings_count(&self) -> SnapResult<Option<i64>> {
        const ACTION: &str = "Failed to fetch upstream stats";
        let resp = self
            .send(Method::GET, "/api/admin/stats", None, ACTION)
            .await?;
        let envelope: UpstreamStatsEnvelope = resp.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Upstream stats had an unexpected shape");
            SnapError::Upstream {
                message: ACTION.to_owned(),
            }
        })?;
        Ok(envelope.embeddings())
    }
}
