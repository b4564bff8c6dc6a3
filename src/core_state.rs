//! Application state shared by the action handlers.
//!
//! Explicit store-pattern state, not ambient globals: handlers borrow
//! `AppState`, read what they need, and write results back at defined
//! save points. Persistence happens only when the profile or theme
//! changes; everything else is session-scoped.

use std::sync::Mutex;

use crate::ai_service::AiService;
use crate::localization::{self, Language, LocalizationError};
use crate::models::{AnalysisResult, ChatMessage, HistoryItem, Theme, UserProfile};
use crate::storage::{ProfileStore, StorageError};

/// Errors from state access and its persistence side effects.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state lock poisoned")]
    LockPoisoned,
    #[error("no saved profile")]
    NoProfile,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Localization(#[from] LocalizationError),
}

pub struct AppState {
    profile: Mutex<Option<UserProfile>>,
    chat_messages: Mutex<Vec<ChatMessage>>,
    last_analysis: Mutex<Option<AnalysisResult>>,
    language: Mutex<Language>,
    theme: Mutex<Theme>,
    ai: AiService,
    store: ProfileStore,
}

impl AppState {
    /// Build state over a store, loading any persisted profile and theme.
    ///
    /// Validates the language packs first so an incomplete pack fails at
    /// startup rather than misclassifying later.
    pub fn new(store: ProfileStore) -> Result<Self, StateError> {
        localization::validate_packs()?;

        let profile = store.load_profile()?;
        let theme = store.load_theme()?.unwrap_or(Theme::Light);
        if profile.is_some() {
            tracing::info!("Loaded saved profile");
        }

        Ok(Self {
            profile: Mutex::new(profile),
            chat_messages: Mutex::new(Vec::new()),
            last_analysis: Mutex::new(None),
            language: Mutex::new(Language::default()),
            theme: Mutex::new(theme),
            ai: AiService::new(),
            store,
        })
    }

    /// State over the standard app data directory.
    pub fn open() -> Result<Self, StateError> {
        Self::new(ProfileStore::default_location())
    }

    pub fn ai(&self) -> &AiService {
        &self.ai
    }

    // ── Profile ─────────────────────────────────────────────

    pub fn profile(&self) -> Result<Option<UserProfile>, StateError> {
        Ok(self
            .profile
            .lock()
            .map_err(|_| StateError::LockPoisoned)?
            .clone())
    }

    pub fn has_profile(&self) -> bool {
        self.profile
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Replace the profile wholesale and persist it (form save point).
    pub fn set_profile(&self, profile: UserProfile) -> Result<(), StateError> {
        self.store.save_profile(&profile)?;
        *self.profile.lock().map_err(|_| StateError::LockPoisoned)? = Some(profile);
        tracing::info!("Profile saved");
        Ok(())
    }

    /// Append a history item to the saved profile and persist it
    /// (scan save point).
    pub fn append_history(&self, item: HistoryItem) -> Result<(), StateError> {
        let mut guard = self.profile.lock().map_err(|_| StateError::LockPoisoned)?;
        let profile = guard.as_mut().ok_or(StateError::NoProfile)?;
        profile.push_history(item);
        self.store.save_profile(profile)?;
        Ok(())
    }

    // ── Session preferences ─────────────────────────────────

    pub fn language(&self) -> Result<Language, StateError> {
        Ok(*self.language.lock().map_err(|_| StateError::LockPoisoned)?)
    }

    pub fn set_language(&self, language: Language) -> Result<(), StateError> {
        *self.language.lock().map_err(|_| StateError::LockPoisoned)? = language;
        Ok(())
    }

    pub fn theme(&self) -> Result<Theme, StateError> {
        Ok(*self.theme.lock().map_err(|_| StateError::LockPoisoned)?)
    }

    /// Set and persist the theme preference.
    pub fn set_theme(&self, theme: Theme) -> Result<(), StateError> {
        self.store.save_theme(theme)?;
        *self.theme.lock().map_err(|_| StateError::LockPoisoned)? = theme;
        Ok(())
    }

    // ── Session results ─────────────────────────────────────

    pub fn last_analysis(&self) -> Result<Option<AnalysisResult>, StateError> {
        Ok(self
            .last_analysis
            .lock()
            .map_err(|_| StateError::LockPoisoned)?
            .clone())
    }

    pub fn set_last_analysis(&self, result: AnalysisResult) -> Result<(), StateError> {
        *self
            .last_analysis
            .lock()
            .map_err(|_| StateError::LockPoisoned)? = Some(result);
        Ok(())
    }

    pub fn clear_last_analysis(&self) -> Result<(), StateError> {
        *self
            .last_analysis
            .lock()
            .map_err(|_| StateError::LockPoisoned)? = None;
        Ok(())
    }

    // ── Chat session ────────────────────────────────────────

    /// Conversation so far, in send order.
    pub fn chat_history(&self) -> Result<Vec<ChatMessage>, StateError> {
        Ok(self
            .chat_messages
            .lock()
            .map_err(|_| StateError::LockPoisoned)?
            .clone())
    }

    pub fn push_chat_message(&self, message: ChatMessage) -> Result<(), StateError> {
        self.chat_messages
            .lock()
            .map_err(|_| StateError::LockPoisoned)?
            .push(message);
        Ok(())
    }
}
