use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::{SearchPort, SearchRequest, SearchResult, Source};
use crate::error::SearchError;

/// In-memory [`SearchPort`] that records every request and answers with a
/// canned result, or fails with a canned error message.
pub struct InMemorySearchPort {
    calls: Mutex<Vec<SearchRequest>>,
    response: SearchResult,
    error: Option<String>,
}

impl Default for InMemorySearchPort {
    fn default() -> Self {
        Self::returning(SearchResult {
            message: "Test response".into(),
            sources: vec![Source {
                title: "Test Source".into(),
                url: "https://example.com".into(),
                snippet: Some("Test snippet".into()),
            }],
        })
    }
}

impl InMemorySearchPort {
    pub fn returning(response: SearchResult) -> Self {
        Self { calls: Mutex::new(Vec::new()), response, error: None }
    }

    pub fn failing(message: &str) -> Self {
        Self { error: Some(message.into()), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<SearchRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchPort for InMemorySearchPort {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.error {
            Some(message) => Err(SearchError::new(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}
