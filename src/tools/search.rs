use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::error::{FieldViolation, ValidationError};

pub const DEFAULT_FOCUS_MODE: &str = "webSearch";
pub const DEFAULT_OPTIMIZATION_MODE: &str = "balanced";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    /// Provider identifier as configured in Perplexica
    pub provider_id: String,
    /// Model key in "namespace/name" form (e.g., "openai/text-embedding-3-small")
    pub key: String,
}

/// Search tool input after shape validation. Modes are still raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search query
    pub query: String,

    /// Chat model used to write the answer
    pub chat_model: ModelParams,

    /// Embedding model used to rank sources
    pub embedding_model: ModelParams,

    /// One of: webSearch, academicSearch, writingAssistant, wolframAlphaSearch, youtubeSearch, redditSearch (default webSearch)
    #[serde(default = "default_focus_mode")]
    pub focus_mode: String,

    /// One of: speed, balanced, quality (default balanced)
    #[serde(default = "default_optimization_mode")]
    pub optimization_mode: String,

    /// Prior conversation as [role, content] pairs, oldest first
    #[serde(default)]
    pub history: Vec<(String, String)>,

    /// Extra instructions for the answering model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<String>,

    /// Ask the provider for a streamed answer (default false)
    #[serde(default)]
    pub stream: bool,
}

fn default_focus_mode() -> String { DEFAULT_FOCUS_MODE.into() }
fn default_optimization_mode() -> String { DEFAULT_OPTIMIZATION_MODE.into() }

/// Raw tool arguments. Advertises the [`SearchParams`] schema but keeps the
/// JSON untouched so [`SearchParams::validate`] can report every violation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SearchInput(pub Map<String, Value>);

impl JsonSchema for SearchInput {
    fn schema_name() -> Cow<'static, str> {
        SearchParams::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        SearchParams::json_schema(generator)
    }
}

impl SearchParams {
    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let Some(obj) = raw.as_object() else {
            return Err(ValidationError {
                violations: vec![FieldViolation::new("(root)", "expected an object")],
            });
        };

        let mut v = Vec::new();

        let query = required_str(obj, &["query"], "query", &mut v);
        let chat_model = model(obj, &["chatModel", "chat_model"], "chatModel", &mut v);
        let embedding_model = model(obj, &["embeddingModel", "embedding_model"], "embeddingModel", &mut v);
        let focus_mode = optional_str(obj, &["focusMode", "focus_mode"], "focusMode", &mut v)
            .unwrap_or_else(default_focus_mode);
        let optimization_mode =
            optional_str(obj, &["optimizationMode", "optimization_mode"], "optimizationMode", &mut v)
                .unwrap_or_else(default_optimization_mode);
        let history = history(obj, &mut v);
        let system_instructions =
            optional_str(obj, &["systemInstructions", "system_instructions"], "systemInstructions", &mut v);
        let stream = match lookup(obj, &["stream"]) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                v.push(FieldViolation::new("stream", "expected a boolean"));
                false
            }
        };

        match (query, chat_model, embedding_model) {
            (Some(query), Some(chat_model), Some(embedding_model)) if v.is_empty() => Ok(Self {
                query,
                chat_model,
                embedding_model,
                focus_mode,
                optimization_mode,
                history,
                system_instructions,
                stream,
            }),
            _ => Err(ValidationError { violations: v }),
        }
    }
}

/// First present, non-null value among the accepted spellings of a key.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

fn required_str(
    obj: &Map<String, Value>,
    keys: &[&str],
    field: &str,
    v: &mut Vec<FieldViolation>,
) -> Option<String> {
    match lookup(obj, keys) {
        None => {
            v.push(FieldViolation::new(field, "field required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            v.push(FieldViolation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            v.push(FieldViolation::new(field, "expected a string"));
            None
        }
    }
}

fn optional_str(
    obj: &Map<String, Value>,
    keys: &[&str],
    field: &str,
    v: &mut Vec<FieldViolation>,
) -> Option<String> {
    match lookup(obj, keys)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            v.push(FieldViolation::new(field, "expected a string"));
            None
        }
    }
}

fn model(
    obj: &Map<String, Value>,
    keys: &[&str],
    field: &str,
    v: &mut Vec<FieldViolation>,
) -> Option<ModelParams> {
    let inner = match lookup(obj, keys) {
        None => {
            v.push(FieldViolation::new(field, "field required"));
            return None;
        }
        Some(Value::Object(inner)) => inner,
        Some(_) => {
            v.push(FieldViolation::new(field, "expected an object"));
            return None;
        }
    };

    let provider_id = required_str(inner, &["providerId", "provider_id"], &format!("{field}.providerId"), v);
    let key = required_str(inner, &["key"], &format!("{field}.key"), v);
    Some(ModelParams { provider_id: provider_id?, key: key? })
}

fn history(obj: &Map<String, Value>, v: &mut Vec<FieldViolation>) -> Vec<(String, String)> {
    let entries = match lookup(obj, &["history"]) {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            v.push(FieldViolation::new("history", "expected a list of [role, content] pairs"));
            return Vec::new();
        }
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match entry.as_array().map(Vec::as_slice) {
            Some([Value::String(role), Value::String(content)]) => {
                pairs.push((role.clone(), content.clone()));
            }
            _ => v.push(FieldViolation::new(
                format!("history[{i}]"),
                "expected a [role, content] pair of strings",
            )),
        }
    }
    pairs
}
