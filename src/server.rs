use crate::config::RequestDefaults;
use crate::error::ToolError;
use crate::presentation::render;
use crate::tools::{SearchInput, SearchParams};
use crate::usecase::SearchUseCase;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde_json::{Map, Value};

const INSTRUCTIONS: &str = "MCP server for the Perplexica search API. \
    Use the `search` tool to search the web and get an AI-generated answer with source citations.";

#[derive(Clone)]
pub struct PerplexicaSearchServer {
    use_case: SearchUseCase,
    defaults: RequestDefaults,
}

impl PerplexicaSearchServer {
    pub fn new(use_case: SearchUseCase, defaults: RequestDefaults) -> Self {
        Self { use_case, defaults }
    }

    /// Runs one tool call end to end. Every failure comes back as text.
    pub async fn run(&self, mut input: Map<String, Value>) -> String {
        self.defaults.prefill(&mut input);

        let outcome = match SearchParams::validate(&Value::Object(input)) {
            Ok(params) => {
                tracing::info!(
                    "search: focus={} optimization={} history={}",
                    params.focus_mode,
                    params.optimization_mode,
                    params.history.len()
                );
                self.use_case.execute(&params).await
            }
            Err(e) => Err(ToolError::from(e)),
        };

        match &outcome {
            Ok(result) => tracing::info!("search: answered with {} sources", result.sources.len()),
            Err(ToolError::Search(e)) => {
                tracing::warn!("search failed: {}", e);
                if let Some(cause) = e.cause() {
                    tracing::debug!("search failure cause: {:?}", cause);
                }
            }
            Err(e) => tracing::warn!("search rejected: {}", e),
        }
        render(outcome)
    }
}

#[tool_router]
impl PerplexicaSearchServer {
    #[tool(description = r###"
    Search the web using Perplexica and get an AI-generated answer with source citations.

    `query` is the question or search terms. `chatModel` and `embeddingModel` select the
    Perplexica models as { providerId, key } where key is "namespace/name".

    `focusMode` picks the search behaviour: webSearch (default), academicSearch,
    writingAssistant, wolframAlphaSearch, youtubeSearch or redditSearch.
    `optimizationMode` trades speed for quality: speed, balanced (default) or quality.
    `history` is the prior conversation as [role, content] pairs, oldest first.
    `systemInstructions` adds custom instructions for the answering model.

    Returns the answer followed by a numbered "## Sources" list, or a line starting with
    "Search failed:" or "Unexpected error:" describing what went wrong.
    "###)]
    pub async fn search(&self, Parameters(input): Parameters<SearchInput>) -> Result<String, McpError> {
        Ok(self.run(input.0).await)
    }
}

#[tool_handler(router = Self::tool_router())]
impl ServerHandler for PerplexicaSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "perplexica-search".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FocusMode, SearchResult, Source};
    use crate::testing::InMemorySearchPort;
    use serde_json::json;
    use std::sync::Arc;

    fn server(port: Arc<InMemorySearchPort>, defaults: RequestDefaults) -> PerplexicaSearchServer {
        PerplexicaSearchServer::new(SearchUseCase::new(port), defaults)
    }

    fn input(raw: Value) -> Map<String, Value> {
        raw.as_object().cloned().unwrap()
    }

    fn minimal() -> Map<String, Value> {
        input(json!({
            "query": "test query",
            "chatModel": { "providerId": "provider-1", "key": "test/chat-model" },
            "embeddingModel": { "providerId": "provider-2", "key": "test/embed-model" },
        }))
    }

    #[tokio::test]
    async fn formats_answer_with_sources() {
        let port = Arc::new(InMemorySearchPort::returning(SearchResult {
            message: "X".into(),
            sources: vec![Source { title: "T".into(), url: "U".into(), snippet: Some("S".into()) }],
        }));
        let out = server(port.clone(), RequestDefaults::default()).run(minimal()).await;

        assert_eq!(out, "X\n\n## Sources\n1. [T](U)\n   > S");
        assert_eq!(port.calls().len(), 1);
    }

    #[tokio::test]
    async fn search_failure_is_rendered() {
        let port = Arc::new(InMemorySearchPort::failing("Perplexica API returned error: 500"));
        let out = server(port, RequestDefaults::default()).run(minimal()).await;
        assert_eq!(out, "Search failed: Perplexica API returned error: 500");
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_port() {
        let port = Arc::new(InMemorySearchPort::default());
        let srv = server(port.clone(), RequestDefaults::default());

        let out = srv.run(input(json!({ "query": "" }))).await;
        assert!(out.starts_with("Unexpected error: Invalid search request: query: must not be empty"), "{out}");
        assert!(out.contains("chatModel: field required"));

        let mut bad_mode = minimal();
        bad_mode.insert("focusMode".into(), json!("not-a-mode"));
        let out = srv.run(bad_mode).await;
        assert!(out.starts_with("Unexpected error: Invalid focus mode 'not-a-mode'"), "{out}");

        assert!(port.calls().is_empty());
    }

    #[tokio::test]
    async fn configured_defaults_fill_missing_fields() {
        let port = Arc::new(InMemorySearchPort::default());
        let defaults = RequestDefaults {
            chat_model_provider_id: "default-chat".into(),
            embedding_model_provider_id: "default-embed".into(),
            focus_mode: FocusMode::AcademicSearch,
            system_instructions: Some("Be concise".into()),
            ..RequestDefaults::default()
        };

        let out = server(port.clone(), defaults).run(input(json!({ "query": "only a query" }))).await;
        assert!(out.starts_with("Test response"), "{out}");

        let calls = port.calls();
        let request = &calls[0];
        assert_eq!(request.chat_model.provider_id, "default-chat");
        assert_eq!(request.chat_model.key, "anthropic/claude-sonnet-4.5");
        assert_eq!(request.embedding_model.provider_id, "default-embed");
        assert_eq!(request.focus_mode, FocusMode::AcademicSearch);
        assert_eq!(request.system_instructions.as_deref(), Some("Be concise"));
    }

    #[test]
    fn exposes_a_single_search_tool() {
        let tools = PerplexicaSearchServer::tool_router().list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "search");
        let description = tools[0].description.as_deref().unwrap_or_default();
        assert!(description.contains("\"## Sources\" list"), "{description}");
        assert!(description.contains("\"Unexpected error:\""), "{description}");
        let props = tools[0].input_schema.get("properties").and_then(Value::as_object).unwrap();
        assert!(props.contains_key("query"));
        assert!(props.contains_key("embeddingModel"));
    }
}
