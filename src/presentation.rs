use std::fmt::Write;

use crate::domain::SearchResult;
use crate::error::ToolError;

/// Answer text followed by a numbered `## Sources` list when there are any.
pub fn format_result(result: &SearchResult) -> String {
    let mut out = result.message.clone();
    if result.sources.is_empty() {
        return out;
    }

    out.push_str("\n\n## Sources");
    for (i, source) in result.sources.iter().enumerate() {
        let _ = write!(out, "\n{}. [{}]({})", i + 1, source.title, source.url);
        if let Some(snippet) = source.snippet.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "\n   > {snippet}");
        }
    }
    out
}

/// Renders any outcome of a search call as the tool's reply. Never fails.
pub fn render(outcome: Result<SearchResult, ToolError>) -> String {
    match outcome {
        Ok(result) => format_result(&result),
        Err(ToolError::Search(e)) => format!("Search failed: {}", e.message()),
        Err(e) => format!("Unexpected error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use crate::error::{FieldViolation, SearchError, TranslateError, ValidationError};

    fn source(title: &str, url: &str, snippet: Option<&str>) -> Source {
        Source { title: title.into(), url: url.into(), snippet: snippet.map(str::to_string) }
    }

    #[test]
    fn message_only_without_sources() {
        let result = SearchResult { message: "X".into(), sources: vec![] };
        assert_eq!(format_result(&result), "X");
    }

    #[test]
    fn single_source_with_snippet() {
        let result = SearchResult { message: "X".into(), sources: vec![source("T", "U", Some("S"))] };
        assert_eq!(format_result(&result), "X\n\n## Sources\n1. [T](U)\n   > S");
    }

    #[test]
    fn numbers_sources_in_order() {
        let result = SearchResult {
            message: "Answer".into(),
            sources: vec![source("A", "https://a", None), source("B", "https://b", Some("quote"))],
        };
        assert_eq!(
            format_result(&result),
            "Answer\n\n## Sources\n1. [A](https://a)\n2. [B](https://b)\n   > quote"
        );
    }

    #[test]
    fn empty_snippet_prints_no_quote_line() {
        let result = SearchResult { message: "X".into(), sources: vec![source("T", "U", Some(""))] };
        assert_eq!(format_result(&result), "X\n\n## Sources\n1. [T](U)");
    }

    #[test]
    fn search_errors_render_as_search_failed() {
        let err = SearchError::status(500, "Internal Server Error");
        assert_eq!(render(Err(err.into())), "Search failed: Perplexica API returned error: 500");
    }

    #[test]
    fn other_errors_render_as_unexpected() {
        let err = TranslateError::InvalidFocusMode("not-a-mode".into());
        assert!(render(Err(err.into())).starts_with("Unexpected error: Invalid focus mode 'not-a-mode'"));

        let err = ValidationError { violations: vec![FieldViolation::new("query", "field required")] };
        assert_eq!(
            render(Err(err.into())),
            "Unexpected error: Invalid search request: query: field required"
        );
    }
}
