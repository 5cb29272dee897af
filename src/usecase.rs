use std::sync::Arc;

use crate::domain::{SearchPort, SearchResult};
use crate::error::ToolError;
use crate::tools::SearchParams;
use crate::translate::translate;

/// Translates validated input and hands it to the search backend.
#[derive(Clone)]
pub struct SearchUseCase {
    port: Arc<dyn SearchPort>,
}

impl SearchUseCase {
    pub fn new(port: Arc<dyn SearchPort>) -> Self {
        Self { port }
    }

    pub async fn execute(&self, params: &SearchParams) -> Result<SearchResult, ToolError> {
        let request = translate(params)?;
        Ok(self.port.search(&request).await?)
    }
}
