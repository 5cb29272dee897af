use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::domain::{FocusMode, OptimizationMode};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration invalid: {0}")]
    Invalid(String),
}

/// A single violated constraint on the raw tool input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Malformed tool input. Lists every violation found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid search request: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    #[cfg(test)]
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Invalid focus mode '{0}' (expected one of: {modes})", modes = FocusMode::names())]
    InvalidFocusMode(String),

    #[error("Invalid optimization mode '{0}' (expected one of: {modes})", modes = OptimizationMode::names())]
    InvalidOptimizationMode(String),
}

/// Failure while contacting or interpreting the search provider.
#[derive(Debug)]
pub struct SearchError {
    message: String,
    cause: Option<BoxError>,
}

impl SearchError {
    #[cfg(test)]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), cause: None }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self { message: message.into(), cause: Some(cause.into()) }
    }

    /// Non-2xx answer from the provider.
    pub fn status(status: u16, cause: impl Into<BoxError>) -> Self {
        Self::with_cause(format!("Perplexica API returned error: {status}"), cause)
    }

    /// Connection refused, DNS failure, timeout or a broken body read.
    pub fn unreachable(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self { message: format!("Failed to connect to Perplexica API: {cause}"), cause: Some(cause) }
    }

    pub fn unexpected(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self { message: format!("Unexpected error during search: {cause}"), cause: Some(cause) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for SearchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

/// Everything the search tool can fail with before it renders its answer.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error(transparent)]
    Search(#[from] SearchError),
}
