use crate::domain::{ChatModel, EmbeddingModel, FocusMode, HistoryEntry, OptimizationMode, SearchRequest};
use crate::error::TranslateError;
use crate::tools::SearchParams;

/// Turns validated tool input into a domain request. Unknown modes are
/// rejected here instead of falling back to a default.
pub fn translate(params: &SearchParams) -> Result<SearchRequest, TranslateError> {
    let focus_mode: FocusMode = params.focus_mode.parse()?;
    let optimization_mode: OptimizationMode = params.optimization_mode.parse()?;

    let history = params
        .history
        .iter()
        .map(|(role, content)| HistoryEntry { role: role.clone(), content: content.clone() })
        .collect();

    Ok(SearchRequest {
        query: params.query.clone(),
        chat_model: ChatModel {
            provider_id: params.chat_model.provider_id.clone(),
            key: params.chat_model.key.clone(),
        },
        embedding_model: EmbeddingModel {
            provider_id: params.embedding_model.provider_id.clone(),
            key: params.embedding_model.key.clone(),
        },
        focus_mode,
        optimization_mode,
        history,
        system_instructions: params.system_instructions.clone(),
        stream: params.stream,
    })
}
