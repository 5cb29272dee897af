//! JSON shapes exchanged with `POST /api/search`.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{SearchRequest, SearchResult, Source};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload<'a> {
    pub provider_id: &'a str,
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload<'a> {
    pub chat_model: ModelPayload<'a>,
    pub embedding_model: ModelPayload<'a>,
    pub optimization_mode: &'static str,
    pub focus_mode: &'static str,
    pub query: &'a str,
    pub history: Vec<[&'a str; 2]>,
    pub stream: bool,
    /// Left out entirely when there are no custom instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<&'a str>,
}

impl<'a> From<&'a SearchRequest> for SearchPayload<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        Self {
            chat_model: ModelPayload {
                provider_id: &request.chat_model.provider_id,
                key: &request.chat_model.key,
            },
            embedding_model: ModelPayload {
                provider_id: &request.embedding_model.provider_id,
                key: &request.embedding_model.key,
            },
            optimization_mode: request.optimization_mode.as_str(),
            focus_mode: request.focus_mode.as_str(),
            query: &request.query,
            history: request
                .history
                .iter()
                .map(|entry| [entry.role.as_str(), entry.content.as_str()])
                .collect(),
            stream: request.stream,
            system_instructions: request.system_instructions.as_deref(),
        }
    }
}

/// Reads a response object leniently: missing or mistyped fields fall back
/// to empty values, and source entries that are not objects are dropped.
pub fn parse_response(data: &serde_json::Map<String, Value>) -> SearchResult {
    let message = str_field(data, "message").unwrap_or_default();

    let sources = data
        .get("sources")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|s| Source {
                    title: str_field(s, "title").unwrap_or_default(),
                    url: str_field(s, "url").unwrap_or_default(),
                    snippet: str_field(s, "snippet"),
                })
                .collect()
        })
        .unwrap_or_default();

    SearchResult { message, sources }
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
