//! Search request/result value types and the port every search backend implements.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::error::{SearchError, TranslateError};

/// Chat model selection, `key` in `namespace/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatModel {
    pub provider_id: String,
    pub key: String,
}

/// Embedding model selection, `key` in `namespace/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingModel {
    pub provider_id: String,
    pub key: String,
}

/// One prior conversation turn. Roles are usually "human" or "assistant".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusMode {
    #[default]
    WebSearch,
    AcademicSearch,
    WritingAssistant,
    WolframAlphaSearch,
    YoutubeSearch,
    RedditSearch,
}

impl FocusMode {
    pub const ALL: [FocusMode; 6] = [
        FocusMode::WebSearch,
        FocusMode::AcademicSearch,
        FocusMode::WritingAssistant,
        FocusMode::WolframAlphaSearch,
        FocusMode::YoutubeSearch,
        FocusMode::RedditSearch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FocusMode::WebSearch => "webSearch",
            FocusMode::AcademicSearch => "academicSearch",
            FocusMode::WritingAssistant => "writingAssistant",
            FocusMode::WolframAlphaSearch => "wolframAlphaSearch",
            FocusMode::YoutubeSearch => "youtubeSearch",
            FocusMode::RedditSearch => "redditSearch",
        }
    }

    pub fn names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for FocusMode {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TranslateError::InvalidFocusMode(s.to_string()))
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptimizationMode {
    Speed,
    #[default]
    Balanced,
    Quality,
}

impl OptimizationMode {
    pub const ALL: [OptimizationMode; 3] =
        [OptimizationMode::Speed, OptimizationMode::Balanced, OptimizationMode::Quality];

    pub fn as_str(self) -> &'static str {
        match self {
            OptimizationMode::Speed => "speed",
            OptimizationMode::Balanced => "balanced",
            OptimizationMode::Quality => "quality",
        }
    }

    pub fn names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for OptimizationMode {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TranslateError::InvalidOptimizationMode(s.to_string()))
    }
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully translated search, built once per tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub chat_model: ChatModel,
    pub embedding_model: EmbeddingModel,
    pub focus_mode: FocusMode,
    pub optimization_mode: OptimizationMode,
    /// Oldest turn first.
    pub history: Vec<HistoryEntry>,
    pub system_instructions: Option<String>,
    /// Forwarded to the provider; responses are always read whole.
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub message: String,
    /// Citation order as returned by the provider.
    pub sources: Vec<Source>,
}

#[async_trait]
pub trait SearchPort: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_mode_parses_every_wire_name() {
        for mode in FocusMode::ALL {
            assert_eq!(mode.as_str().parse::<FocusMode>(), Ok(mode));
        }
        assert_eq!("academicSearch".parse(), Ok(FocusMode::AcademicSearch));
    }

    #[test]
    fn focus_mode_rejects_unknown_and_miscased_values() {
        assert_eq!(
            "not-a-mode".parse::<FocusMode>(),
            Err(TranslateError::InvalidFocusMode("not-a-mode".into()))
        );
        assert!("WebSearch".parse::<FocusMode>().is_err());
    }

    #[test]
    fn optimization_mode_round_trips_names() {
        assert_eq!("quality".parse(), Ok(OptimizationMode::Quality));
        assert_eq!(OptimizationMode::default().to_string(), "balanced");
        assert_eq!(
            "turbo".parse::<OptimizationMode>(),
            Err(TranslateError::InvalidOptimizationMode("turbo".into()))
        );
    }
}
