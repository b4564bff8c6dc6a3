//! Pharmacist chat flow.
//!
//! Messages append strictly in send order; each call replays the prior
//! turns so the stateless AI service keeps conversational context.

use std::time::Instant;

use crate::ai_service::OperationKind;
use crate::config;
use crate::core_state::AppState;
use crate::gemini::GenerativeModel;
use crate::models::ChatMessage;
use crate::pipeline::prompt;

use super::ActionError;

/// Send one chat turn (text plus optional base64 image attachment) and
/// append both the user message and the model reply to the session.
///
/// Returns the model's message. A failed call still produces a model
/// message, carrying the localized fallback text.
pub fn send_message(
    state: &AppState,
    model: &dyn GenerativeModel,
    text: &str,
    image: Option<String>,
) -> Result<ChatMessage, ActionError> {
    let has_image = image.as_deref().is_some_and(|data| !data.trim().is_empty());
    if text.trim().is_empty() && !has_image {
        return Err(ActionError::EmptyInput);
    }
    let profile = state.profile()?.ok_or(ActionError::ProfileRequired)?;
    let language = state.language()?;

    let prior = state.chat_history()?;
    state.push_chat_message(ChatMessage::user(text, image.clone()))?;

    let _guard = state
        .ai()
        .acquire(OperationKind::ChatGeneration, config::GEMINI_MODEL)?;

    let payload = prompt::compose_chat(&prior, text, image.as_deref(), &profile, language);
    let start = Instant::now();
    let reply = super::analysis_reply(
        model.generate(config::GEMINI_MODEL, &payload),
        language.pack(),
    );
    tracing::info!(
        turns = prior.len() + 2,
        elapsed_ms = %start.elapsed().as_millis(),
        "Chat turn complete"
    );

    let message = ChatMessage::model(reply);
    state.push_chat_message(message.clone())?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{fresh_state, sample_profile};
    use crate::gemini::MockModel;
    use crate::localization::Language;
    use crate::models::MessageRole;

    #[test]
    fn missing_profile_rejected_before_any_call() {
        let (_dir, state) = fresh_state();
        let mock = MockModel::replying("irrelevant");

        let err = send_message(&state, &mock, "Can I take ibuprofen?", None).unwrap_err();
        assert!(matches!(err, ActionError::ProfileRequired));
        assert!(mock.requests().is_empty());
        assert!(state.chat_history().unwrap().is_empty());
    }

    #[test]
    fn empty_turn_rejected_but_image_only_allowed() {
        let (_dir, state) = fresh_state();
        state.set_profile(sample_profile()).unwrap();
        let mock = MockModel::replying("That looks like a statin tablet.");

        assert!(matches!(
            send_message(&state, &mock, "  ", None),
            Err(ActionError::EmptyInput)
        ));

        let reply = send_message(&state, &mock, "", Some("cGlsbA==".into())).unwrap();
        assert_eq!(reply.role, MessageRole::Model);
    }

    #[test]
    fn appends_user_then_model_in_send_order() {
        let (_dir, state) = fresh_state();
        state.set_profile(sample_profile()).unwrap();
        let mock = MockModel::replying("Grapefruit can interact with statins.");

        send_message(&state, &mock, "Can I eat grapefruit?", None).unwrap();

        let history = state.chat_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].text, "Can I eat grapefruit?");
        assert_eq!(history[1].role, MessageRole::Model);
        assert_eq!(history[1].text, "Grapefruit can interact with statins.");
    }

    #[test]
    fn second_turn_replays_prior_conversation() {
        let (_dir, state) = fresh_state();
        state.set_profile(sample_profile()).unwrap();
        let mock = MockModel::replying("Oranges are fine.");

        send_message(&state, &mock, "Can I eat grapefruit?", None).unwrap();
        send_message(&state, &mock, "And oranges?", None).unwrap();

        let second_payload = &mock.requests()[1];
        // Two prior turns replayed plus the new user turn.
        assert_eq!(second_payload.contents.len(), 3);
        assert_eq!(second_payload.contents[0].role, "user");
        assert_eq!(second_payload.contents[1].role, "model");
        assert_eq!(second_payload.contents[2].role, "user");
    }

    #[test]
    fn failed_call_appends_fallback_model_message() {
        let (_dir, state) = fresh_state();
        state.set_profile(sample_profile()).unwrap();
        let mock = MockModel::failing();

        let reply = send_message(&state, &mock, "Hello?", None).unwrap();
        assert_eq!(reply.text, Language::En.pack().analysis_fallback);

        let history = state.chat_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text, Language::En.pack().analysis_fallback);
    }
}
