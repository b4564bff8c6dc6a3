//! Action handlers: the entry points a UI shell invokes.
//!
//! Each handler runs one request/response cycle: precondition checks,
//! prompt composition, a single AI call under the `AiService` guard,
//! interpretation, and state/persistence updates. AI failures never
//! escape a handler; they become localized fallback replies that flow
//! through the same classifier and extractor as ordinary text.

pub mod chat;
pub mod interaction;
pub mod scan;

use crate::ai_service::AiServiceError;
use crate::core_state::StateError;
use crate::gemini::GeminiError;
use crate::localization::LanguagePack;

/// Errors surfaced to the caller instead of starting an AI call.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("complete the profile before scanning or chatting")]
    ProfileRequired,
    #[error("nothing to analyze: provide text or an image")]
    EmptyInput,
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Ai(#[from] AiServiceError),
}

/// Collapse an analysis/chat call outcome into reply text. Errors are
/// logged and replaced by the pack's fallback strings.
pub(crate) fn analysis_reply(
    outcome: Result<String, GeminiError>,
    pack: &LanguagePack,
) -> String {
    match outcome {
        Ok(text) => text,
        Err(GeminiError::EmptyResponse) => pack.empty_reply.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "AI call failed");
            pack.analysis_fallback.to_string()
        }
    }
}

/// Collapse an interaction-check call outcome into reply text.
pub(crate) fn interaction_reply(
    outcome: Result<String, GeminiError>,
    pack: &LanguagePack,
) -> String {
    match outcome {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Interaction check failed");
            pack.interaction_fallback.to_string()
        }
    }
}
