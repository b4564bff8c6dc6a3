//! Scan analysis flow: medication, meal, or lab-result input to a
//! classified result, with qualifying extractions appended to history.

use std::time::Instant;

use chrono::Utc;

use crate::ai_service::OperationKind;
use crate::config;
use crate::core_state::AppState;
use crate::gemini::GenerativeModel;
use crate::models::{AnalysisKind, AnalysisResult, HistoryItem, ScanMode, ScanRequest};
use crate::pipeline::{classify, extract, prompt};

use super::ActionError;

/// Analyze one scan.
///
/// Rejects before calling the AI when no profile is saved or the input is
/// empty. A failed call degrades to the localized fallback reply, which
/// classifies as INFO and extracts nothing.
pub fn analyze_scan(
    state: &AppState,
    model: &dyn GenerativeModel,
    request: &ScanRequest,
    mode: ScanMode,
) -> Result<AnalysisResult, ActionError> {
    if request.is_empty() {
        return Err(ActionError::EmptyInput);
    }
    let profile = state.profile()?.ok_or(ActionError::ProfileRequired)?;
    let language = state.language()?;

    let _guard = state
        .ai()
        .acquire(OperationKind::ScanAnalysis, config::GEMINI_MODEL)?;

    let payload = prompt::compose_scan(request, mode, &profile, language);
    let start = Instant::now();
    let reply = super::analysis_reply(
        model.generate(config::GEMINI_MODEL, &payload),
        language.pack(),
    );

    let risk_level = classify::classify_risk(&reply);
    let record = extract::extract_record(&reply, mode);
    tracing::info!(
        mode = %mode,
        risk = %risk_level,
        elapsed_ms = %start.elapsed().as_millis(),
        reply_len = reply.len(),
        "Scan analysis complete"
    );

    // Only extractions with signal reach the history log.
    let extracted = if extract::should_record(&record) {
        state.append_history(HistoryItem::new(
            mode,
            record.name.clone(),
            record.value.clone(),
        ))?;
        Some(record)
    } else {
        None
    };

    let result = AnalysisResult {
        text: reply,
        risk_level,
        timestamp: Utc::now().timestamp_millis(),
        kind: AnalysisKind::Scan(mode),
        extracted,
    };
    state.set_last_analysis(result.clone())?;
    Ok(result)
}
