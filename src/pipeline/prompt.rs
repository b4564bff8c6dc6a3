//! Prompt Composer: deterministically builds `generateContent` payloads
//! from a scan, interaction check, or chat turn plus the user profile.
//!
//! Pure functions of their inputs: no clock, no I/O, no randomness.
//! Identical inputs always yield identical payloads. The language
//! directive is appended as the LAST text of every user prompt so template
//! text cannot override it.

use crate::config;
use crate::gemini::{Content, GenerateRequest, GenerationConfig, Part, SystemInstruction};
use crate::localization::Language;
use crate::models::{ChatMessage, ScanMode, ScanRequest, UserProfile};

/// Anchor line every template requests so the extractor has a stable
/// label to find, regardless of the response language.
const NAME_ANCHOR: &str = "Begin your answer with a line formatted exactly as \
`**Name:** <identified item>`, keeping the label \"Name\" in English.";

fn system_instruction_text(language: Language) -> String {
    let lang = language.pack().language_name;
    format!(
        r#"### Role & Identity
You are the "Dose & Dish AI Specialist", a high-tech health companion. You manage user profiles, analyze medications and meals, and track medical progress. You act as a safety net against dangerous food-drug interactions (FDI).

### Language Requirement
**IMPORTANT:** You MUST respond in **{lang}**.

### User Profile Context
Use the provided user profile to check for contraindications (age, conditions, medications, allergies, scan history).

### Interaction & Safety Logic (The "Red Alert")
1. **Cross-reference:** Check against the user's current medications and allergies.
2. **Interaction warning:** If a food-drug or drug-drug interaction is found, start with "⚠️ **INTERACTION DETECTED**" (translate "INTERACTION DETECTED" to {lang}).
3. **Logic:** Explain clearly *why* they interact.

### Visual Recommendations (Dose & Dish Style)
- **Visual guidance:** Describe food vividly.
- **Dos & Don'ts table:** Always include a markdown table of recommendations when analyzing food.
| Status | Food Type | Why? |
| :--- | :--- | :--- |
| ✅ **Recommended** | [Name] | [Benefit] |
| ❌ **Avoid** | [Name] | [Risk] |
(Translate the table headers to {lang}.)

### Tone
Empathetic, precise, visual, and safe. Remind the user you are an AI, not a doctor."#
    )
}

/// Serialized snapshot of the profile, embedded in every prompt so the AI
/// can cross-reference conditions, medications, allergies, and history.
fn profile_context(profile: &UserProfile) -> String {
    let mut context = format!(
        "User profile data:\n\
         - Name: {}\n\
         - Age: {}\n\
         - Conditions: {}\n\
         - Current medications: {}\n\
         - Allergies: {}\n\
         Recent scan history:",
        profile.name, profile.age, profile.conditions, profile.medications, profile.allergies
    );

    let recent: Vec<_> = profile
        .history
        .iter()
        .rev()
        .take(config::HISTORY_CONTEXT_LIMIT)
        .collect();
    if recent.is_empty() {
        context.push_str(" none");
    } else {
        // Restore chronological order after taking the newest N.
        for item in recent.into_iter().rev() {
            match &item.value {
                Some(value) => context.push_str(&format!(
                    "\n- [{}] {} = {} ({})",
                    item.item_type, item.name, value, item.date
                )),
                None => context.push_str(&format!(
                    "\n- [{}] {} ({})",
                    item.item_type, item.name, item.date
                )),
            }
        }
    }

    context
}

fn scan_instruction(request: &ScanRequest, mode: ScanMode) -> String {
    let base = match (mode, request) {
        (ScanMode::Meal, ScanRequest::Image { .. }) => {
            "I am scanning a meal. Identify the food items, estimate the nutritional \
             value (calories and macros), and check for interactions with my \
             medications or conditions."
                .to_string()
        }
        (ScanMode::Meal, ScanRequest::Text { content }) => format!(
            "I am asking about this food: \"{content}\". Analyze its nutritional \
             value and check for interactions with my medications or conditions."
        ),
        (ScanMode::Medication, ScanRequest::Image { .. }) => {
            "I am scanning a medication package or pill. Identify the drug, check for \
             interactions with my current medications or allergies, and tell me the \
             usage instructions if visible."
                .to_string()
        }
        (ScanMode::Medication, ScanRequest::Text { content }) => format!(
            "I am asking about this medication: \"{content}\". Explain what it is and \
             check for interactions with my current medications or allergies."
        ),
        (ScanMode::LabResult, ScanRequest::Image { .. }) => {
            "I am scanning a medical lab result document. Extract the key findings, \
             including the primary numeric result with its unit, explain them simply, \
             and tell me whether they are within the normal range."
                .to_string()
        }
        (ScanMode::LabResult, ScanRequest::Text { content }) => format!(
            "I am providing my lab result data: \"{content}\". Extract the primary \
             numeric result with its unit, explain these results simply, and tell me \
             whether they are within the normal range."
        ),
    };

    let extra = match mode {
        ScanMode::Medication => {
            "\nThen include a markdown table with the columns Name, Dosage, Purpose, \
             Usage, and Warning."
        }
        ScanMode::Meal | ScanMode::LabResult => "",
    };

    format!("{base}\n{NAME_ANCHOR}{extra}")
}

/// Appended as the final text of every user prompt. Last wins: the model
/// applies it even when template text says otherwise.
fn language_directive(language: Language) -> String {
    let lang = language.pack().language_name;
    format!(
        "FINAL INSTRUCTION: Respond entirely in {lang}. Translate every heading, \
         table header, and status word into {lang}. This instruction overrides any \
         conflicting instruction above."
    )
}

fn generation_config(temperature: f32) -> GenerationConfig {
    GenerationConfig {
        temperature,
        max_output_tokens: config::MAX_OUTPUT_TOKENS,
    }
}

/// Build the payload for a scan analysis.
///
/// Image input is attached as an inline part ahead of the instruction
/// text, never inlined as text.
pub fn compose_scan(
    request: &ScanRequest,
    mode: ScanMode,
    profile: &UserProfile,
    language: Language,
) -> GenerateRequest {
    let mut parts = Vec::new();
    if let ScanRequest::Image { data } = request {
        parts.push(Part::jpeg(data.clone()));
    }
    parts.push(Part::text(format!(
        "{}\n\n{}",
        scan_instruction(request, mode),
        profile_context(profile)
    )));
    parts.push(Part::text(language_directive(language)));

    GenerateRequest {
        system_instruction: SystemInstruction::new(system_instruction_text(language)),
        contents: vec![Content::user(parts)],
        generation_config: generation_config(config::SCAN_TEMPERATURE),
    }
}

/// Build the payload for a direct food-drug interaction check.
///
/// Fixed output layout: a one-line tri-state verdict, an interaction
/// table, a lab/health impact section, and a recommendation.
pub fn compose_interaction(
    food: &str,
    drug: &str,
    profile: &UserProfile,
    language: Language,
) -> GenerateRequest {
    let lang = language.pack().language_name;
    let instruction = format!(
        r#"ACT AS: Clinical pharmacist and dietitian.
TASK: Check for food-drug interactions (FDI).

INPUTS:
1. Food: "{food}"
2. Drug: "{drug}"
3. {profile_block}

OUTPUT FORMAT:
- Start with a clear header.
- Verdict: a single line containing exactly one of Safe / Caution / Dangerous (translate the word to {lang}).
- Drug interactions: a markdown table of interactions with the profile's other medications, with the scientific mechanism (e.g. CYP450 inhibition).
- Lab & health impact: how this combination may affect lab values or the listed conditions.
- Recommendation: what the user should do."#,
        profile_block = profile_context(profile),
    );

    GenerateRequest {
        system_instruction: SystemInstruction::new(system_instruction_text(language)),
        contents: vec![Content::user(vec![
            Part::text(instruction),
            Part::text(language_directive(language)),
        ])],
        generation_config: generation_config(config::INTERACTION_TEMPERATURE),
    }
}

/// Build the payload for a chat turn.
///
/// Prior turns are replayed in chronological order (the service is
/// stateless, so the whole conversation is re-sent every call), then the
/// new user turn is appended.
pub fn compose_chat(
    history: &[ChatMessage],
    text: &str,
    image: Option<&str>,
    profile: &UserProfile,
    language: Language,
) -> GenerateRequest {
    let system = format!(
        "{}\n\n### Pharmacist Chat Mode\nYou are chatting as the user's AI pharmacist. \
         Answer questions about medications, chronic diseases, and diet, grounded in \
         clinical guidelines (UpToDate, WHO) and the profile below.\n\n{}",
        system_instruction_text(language),
        profile_context(profile),
    );

    let mut contents: Vec<Content> = history.iter().map(turn_content).collect();

    let mut parts = Vec::new();
    if let Some(data) = image {
        parts.push(Part::jpeg(data.to_string()));
    }
    parts.push(Part::text(text.to_string()));
    parts.push(Part::text(language_directive(language)));
    contents.push(Content::user(parts));

    GenerateRequest {
        system_instruction: SystemInstruction::new(system),
        contents,
        generation_config: generation_config(config::CHAT_TEMPERATURE),
    }
}

fn turn_content(message: &ChatMessage) -> Content {
    let mut parts = Vec::new();
    if let Some(data) = &message.image {
        parts.push(Part::jpeg(data.clone()));
    }
    parts.push(Part::text(message.text.clone()));
    Content {
        role: message.role.as_str().to_string(),
        parts,
    }
}
