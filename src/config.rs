use crate::domain::{FocusMode, OptimizationMode};
use crate::error::ConfigError;
use serde_json::{Map, Value, json};

type Result<T> = std::result::Result<T, ConfigError>;

const DEFAULT_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: f64 = 120.0;
const DEFAULT_CHAT_MODEL_KEY: &str = "anthropic/claude-sonnet-4.5";
const DEFAULT_EMBEDDING_MODEL_KEY: &str = "openai/text-embedding-3-small";

#[derive(Debug, Clone)]
pub struct Config {
    pub perplexica_url: String,
    pub timeout_secs: f64,
    pub log_level: String,
    pub defaults: RequestDefaults,
}

/// Values the server fills into a tool call when the caller leaves them out.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefaults {
    pub chat_model_provider_id: String,
    pub chat_model_key: String,
    pub embedding_model_provider_id: String,
    pub embedding_model_key: String,
    pub focus_mode: FocusMode,
    pub optimization_mode: OptimizationMode,
    pub system_instructions: Option<String>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            chat_model_provider_id: String::new(),
            chat_model_key: DEFAULT_CHAT_MODEL_KEY.into(),
            embedding_model_provider_id: String::new(),
            embedding_model_key: DEFAULT_EMBEDDING_MODEL_KEY.into(),
            focus_mode: FocusMode::default(),
            optimization_mode: OptimizationMode::default(),
            system_instructions: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let perplexica_url = env_opt("PERPLEXICA_URL").unwrap_or_else(|| DEFAULT_URL.into());
        validate_url(&perplexica_url)?;

        let focus_mode = match env_opt("DEFAULT_FOCUS_MODE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("DEFAULT_FOCUS_MODE must be one of: {}", FocusMode::names()))
            })?,
            None => FocusMode::default(),
        };
        let optimization_mode = match env_opt("DEFAULT_OPTIMIZATION_MODE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "DEFAULT_OPTIMIZATION_MODE must be one of: {}",
                    OptimizationMode::names()
                ))
            })?,
            None => OptimizationMode::default(),
        };

        Ok(Self {
            perplexica_url: perplexica_url.trim().trim_end_matches('/').to_string(),
            timeout_secs: env_f64_range("PERPLEXICA_TIMEOUT", DEFAULT_TIMEOUT_SECS, 1.0, 3600.0)?,
            log_level: env_opt("PERPLEXICA_LOG_LEVEL").unwrap_or_else(|| "info".into()).to_lowercase(),
            defaults: RequestDefaults {
                chat_model_provider_id: env_opt("DEFAULT_CHAT_MODEL_PROVIDER_ID").unwrap_or_default(),
                chat_model_key: env_opt("DEFAULT_CHAT_MODEL_KEY")
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL_KEY.into()),
                embedding_model_provider_id: env_opt("DEFAULT_EMBEDDING_MODEL_PROVIDER_ID")
                    .unwrap_or_default(),
                embedding_model_key: env_opt("DEFAULT_EMBEDDING_MODEL_KEY")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL_KEY.into()),
                focus_mode,
                optimization_mode,
                system_instructions: env_opt("DEFAULT_SYSTEM_INSTRUCTIONS"),
            },
        })
    }
}

impl RequestDefaults {
    /// Fills keys the caller left out; anything present in `input` wins.
    /// Model defaults only apply when both provider id and key are configured.
    pub fn prefill(&self, input: &mut Map<String, Value>) {
        prefill_model(
            input,
            ["chatModel", "chat_model"],
            &self.chat_model_provider_id,
            &self.chat_model_key,
        );
        prefill_model(
            input,
            ["embeddingModel", "embedding_model"],
            &self.embedding_model_provider_id,
            &self.embedding_model_key,
        );
        prefill(input, ["focusMode", "focus_mode"], || json!(self.focus_mode.as_str()));
        prefill(input, ["optimizationMode", "optimization_mode"], || {
            json!(self.optimization_mode.as_str())
        });
        if let Some(instructions) = &self.system_instructions {
            prefill(input, ["systemInstructions", "system_instructions"], || json!(instructions));
        }
    }
}

fn is_absent(input: &Map<String, Value>, keys: [&str; 2]) -> bool {
    keys.iter().all(|k| input.get(*k).is_none_or(Value::is_null))
}

fn prefill(input: &mut Map<String, Value>, keys: [&str; 2], value: impl FnOnce() -> Value) {
    if is_absent(input, keys) {
        input.insert(keys[0].to_string(), value());
    }
}

fn prefill_model(input: &mut Map<String, Value>, keys: [&str; 2], provider_id: &str, key: &str) {
    if provider_id.trim().is_empty() || key.trim().is_empty() {
        return;
    }
    prefill(input, keys, || json!({ "providerId": provider_id, "key": key }));
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_f64_range(name: &str, default: f64, min: f64, max: f64) -> Result<f64> {
    let Some(raw) = env_opt(name) else { return Ok(default) };
    let val: f64 = raw.trim().parse().map_err(|_| {
        ConfigError::Invalid(format!("{name} must be a number between {min} and {max}"))
    })?;
    if !val.is_finite() || val < min || val > max {
        return Err(ConfigError::Invalid(format!("{name} must be a number between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Invalid("PERPLEXICA_URL must be a valid http or https URL".into()));
    }
    Ok(())
}
