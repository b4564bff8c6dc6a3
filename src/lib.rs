//! Dose & Dish engine.
//!
//! Everything between the UI shell and the Gemini service: prompt
//! composition from profile state, risk classification and record
//! extraction over free-text replies, session state, and the
//! profile/theme persistence boundary. The UI, camera capture, and chart
//! rendering live in the shell; the AI service is consumed strictly as a
//! request/response black box.

pub mod actions;
pub mod ai_service;
pub mod config;
pub mod core_state;
pub mod gemini;
pub mod localization;
pub mod models;
pub mod pipeline;
pub mod storage;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host process. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} engine v{}", config::APP_NAME, config::APP_VERSION);
}
