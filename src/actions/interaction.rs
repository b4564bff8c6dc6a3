//! Direct food-drug interaction check.
//!
//! The only flow that tolerates a missing profile: a "Guest" context is
//! substituted so the check still runs. Never writes to history.

use std::time::Instant;

use chrono::Utc;

use crate::ai_service::OperationKind;
use crate::config;
use crate::core_state::AppState;
use crate::gemini::GenerativeModel;
use crate::models::{AnalysisKind, AnalysisResult, UserProfile};
use crate::pipeline::{classify, prompt};

use super::ActionError;

/// Check one named food against one named drug, cross-referenced with the
/// saved profile (or a guest context when none exists).
pub fn check_interaction(
    state: &AppState,
    model: &dyn GenerativeModel,
    food: &str,
    drug: &str,
) -> Result<AnalysisResult, ActionError> {
    if food.trim().is_empty() || drug.trim().is_empty() {
        return Err(ActionError::EmptyInput);
    }
    let profile = state.profile()?.unwrap_or_else(UserProfile::guest);
    let language = state.language()?;

    let _guard = state
        .ai()
        .acquire(OperationKind::InteractionCheck, config::GEMINI_MODEL)?;

    let payload = prompt::compose_interaction(food, drug, &profile, language);
    let start = Instant::now();
    let reply = super::interaction_reply(
        model.generate(config::GEMINI_MODEL, &payload),
        language.pack(),
    );

    let risk_level = classify::classify_risk(&reply);
    tracing::info!(
        risk = %risk_level,
        elapsed_ms = %start.elapsed().as_millis(),
        "Interaction check complete"
    );

    let result = AnalysisResult {
        text: reply,
        risk_level,
        timestamp: Utc::now().timestamp_millis(),
        kind: AnalysisKind::InteractionCheck,
        extracted: None,
    };
    state.set_last_analysis(result.clone())?;
    Ok(result)
}
