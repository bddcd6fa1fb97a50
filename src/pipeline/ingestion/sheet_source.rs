use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::common::constants::{CACHE_BUST_PARAM, DEFAULT_FETCH_ERROR, SHEET_PARAM};
use crate::common::error::{Result, SyncError};
use crate::domain::RawRow;
use crate::observability::metrics;

/// Response envelope returned by the sheet backend script.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SheetResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| SyncError::upstream(format!("Malformed sheet response: {e}")))
    }

    /// Validate the envelope and return the data rows, without the header row.
    pub fn into_rows(self) -> Result<Vec<RawRow>> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FETCH_ERROR.to_string());
            return Err(SyncError::UpstreamUnavailable(message));
        }

        let entries = match self.data {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(SyncError::upstream(
                    "Unexpected payload shape: data is not a row collection",
                ))
            }
        };

        Ok(entries.into_iter().skip(1).map(RawRow::from_value).collect())
    }
}

/// Fetches one sheet from the backend script as raw rows.
pub struct SheetSource {
    http: Arc<dyn HttpClientPort>,
    script_url: String,
    sheet: String,
}

impl SheetSource {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        script_url: impl Into<String>,
        sheet: impl Into<String>,
    ) -> Self {
        Self {
            http,
            script_url: script_url.into(),
            sheet: sheet.into(),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Request URL for the sheet, with a cache-busting timestamp.
    pub fn request_url(&self, timestamp_millis: i64) -> Result<Url> {
        if self.script_url.trim().is_empty() {
            return Err(SyncError::Config("script URL is not defined".to_string()));
        }
        let mut url = Url::parse(self.script_url.trim())
            .map_err(|e| SyncError::Config(format!("invalid script URL '{}': {e}", self.script_url)))?;
        url.query_pairs_mut()
            .append_pair(SHEET_PARAM, &self.sheet)
            .append_pair(CACHE_BUST_PARAM, &timestamp_millis.to_string());
        Ok(url)
    }

    /// Fetch the sheet and return its rows with the header row removed.
    #[instrument(skip(self), fields(sheet = %self.sheet))]
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let url = self.request_url(Utc::now().timestamp_millis())?;
        debug!(%url, "Fetching sheet");

        let result = self.fetch(url.as_str()).await;
        match &result {
            Ok(rows) => {
                info!(rows = rows.len(), "Fetched sheet rows");
                metrics::fetch::success(rows.len());
            }
            Err(e) => {
                warn!(error = %e, "Sheet fetch failed");
                metrics::fetch::error();
            }
        }
        result
    }

    async fn fetch(&self, url: &str) -> Result<Vec<RawRow>> {
        let resp = self.http.get(url).await.map_err(SyncError::UpstreamUnavailable)?;
        let envelope = serde_json::from_slice::<SheetResponse>(&resp.bytes);

        if !resp.is_success() {
            // Prefer the backend's own error message over the bare status
            let message = envelope
                .ok()
                .and_then(|e| e.error)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| format!("Sheet backend returned HTTP {}", resp.status));
            return Err(SyncError::UpstreamUnavailable(message));
        }

        envelope
            .map_err(|e| {
                SyncError::upstream(format!(
                    "Malformed sheet response ({}): {e}",
                    resp.content_type
                ))
            })?
            .into_rows()
    }
}
