use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Dose & Dish";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model used for every analysis, interaction check, and chat turn.
pub const GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Default Gemini REST endpoint base.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Transport timeout for a single generateContent call. No retries are
/// layered on top; a timed-out call surfaces as a fallback reply.
pub const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Generation temperatures per flow. Interaction checks run colder so the
/// verdict line stays deterministic.
pub const SCAN_TEMPERATURE: f32 = 0.4;
pub const INTERACTION_TEMPERATURE: f32 = 0.2;
pub const CHAT_TEMPERATURE: f32 = 0.6;

/// Upper bound on a single completion.
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// How many of the most recent history entries are serialized into the
/// profile context block of each prompt.
pub const HISTORY_CONTEXT_LIMIT: usize = 10;

/// Get the application data directory
/// ~/DoseDish/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("DoseDish")
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "dosedish=info"
}
