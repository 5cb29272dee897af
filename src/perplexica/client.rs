use super::wire::{SearchPayload, parse_response};
use crate::domain::{SearchPort, SearchRequest, SearchResult};
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_PATH: &str = "/api/search";

/// HTTP gateway to a Perplexica instance.
///
/// The underlying `reqwest::Client` is built on first use and shared by every
/// call until [`PerplexicaClient::close`] releases it.
#[derive(Debug)]
pub struct PerplexicaClient {
    base_url: String,
    timeout: Duration,
    http: Mutex<Option<reqwest::Client>>,
}

impl PerplexicaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
            http: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn close(&self) {
        let released = self.http.lock().unwrap_or_else(PoisonError::into_inner).take();
        if released.is_some() {
            info!("Released Perplexica HTTP client");
        }
    }

    fn http(&self) -> Result<reqwest::Client, SearchError> {
        let mut slot = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .user_agent(format!("perplexica-search-mcp/{}", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(SearchError::unexpected)?;
        debug!("Created Perplexica HTTP client (timeout {:?})", self.timeout);
        *slot = Some(client.clone());
        Ok(client)
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.http.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

#[async_trait]
impl SearchPort for PerplexicaClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let client = self.http()?;
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let payload = SearchPayload::from(request);

        debug!(
            "POST {} focus={} optimization={} history={}",
            url,
            request.focus_mode,
            request.optimization_mode,
            request.history.len()
        );

        let resp = client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&payload)
            .send()
            .await
            .map_err(classify_send_error)
            .inspect_err(|e| warn!("{}", e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Perplexica API returned HTTP {}", status.as_u16());
            let cause = match resp.error_for_status_ref() {
                Err(e) => SearchError::status(status.as_u16(), e),
                Ok(_) => SearchError::status(status.as_u16(), format!("HTTP {status}")),
            };
            return Err(cause);
        }

        let body = resp.bytes().await.map_err(SearchError::unreachable).inspect_err(|e| warn!("{}", e))?;

        let data: Value = serde_json::from_slice(&body).map_err(SearchError::unexpected).inspect_err(|e| warn!("{}", e))?;
        let Value::Object(data) = data else {
            warn!("Perplexica API returned a non-object JSON body");
            return Err(SearchError::unexpected("response body is not a JSON object"));
        };

        let result = parse_response(&data);
        debug!("Perplexica answered with {} sources", result.sources.len());
        Ok(result)
    }
}

fn classify_send_error(e: reqwest::Error) -> SearchError {
    if e.is_builder() { SearchError::unexpected(e) } else { SearchError::unreachable(e) }
}
