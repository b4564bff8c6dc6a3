//! Single-flight control for AI calls.
//!
//! The UI disables the triggering control while a call is outstanding;
//! this service is the engine-side mirror of that rule. Each action
//! handler holds an `AiGuard` for the duration of its one call, and
//! `current_operation()` exposes what is running for observability.
//! There is no queue, no cancellation, and no timeout state here.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// What kind of AI operation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Medication / meal / lab-result scan analysis.
    ScanAnalysis,
    /// Direct food-drug interaction check.
    InteractionCheck,
    /// Pharmacist chat turn.
    ChatGeneration,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanAnalysis => write!(f, "Scan analysis"),
            Self::InteractionCheck => write!(f, "Interaction check"),
            Self::ChatGeneration => write!(f, "Chat generation"),
        }
    }
}

/// Snapshot of the currently running AI operation.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveOperation {
    pub kind: OperationKind,
    /// Which model is being called.
    pub model: String,
    /// When the operation started (ISO 8601).
    pub started_at: String,
}

/// Errors from AiService operations.
#[derive(Debug, thiserror::Error)]
pub enum AiServiceError {
    #[error("Internal lock error")]
    LockPoisoned,
}

/// Exclusive-access controller for the one in-flight AI call.
pub struct AiService {
    /// Exclusive access lock; only one operation at a time.
    lock: Mutex<()>,
    /// What's currently running (observable state).
    current_op: Mutex<Option<ActiveOperation>>,
}

impl AiService {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            current_op: Mutex::new(None),
        }
    }

    /// Acquire exclusive access for an AI call. Blocks until available.
    ///
    /// The guard must be held for the entire call. Dropping it releases
    /// the lock and clears the current operation state.
    pub fn acquire(
        &self,
        kind: OperationKind,
        model: &str,
    ) -> Result<AiGuard<'_>, AiServiceError> {
        let guard = self.lock.lock().map_err(|_| AiServiceError::LockPoisoned)?;
        self.set_current_op(kind, model);
        Ok(AiGuard {
            _guard: guard,
            service: self,
        })
    }

    /// Try to acquire exclusive access without blocking.
    ///
    /// Returns `None` if another operation is already in flight.
    pub fn try_acquire(&self, kind: OperationKind, model: &str) -> Option<AiGuard<'_>> {
        let guard = self.lock.try_lock().ok()?;
        self.set_current_op(kind, model);
        Some(AiGuard {
            _guard: guard,
            service: self,
        })
    }

    /// What operation is currently running? `None` when idle.
    pub fn current_operation(&self) -> Option<ActiveOperation> {
        self.current_op.lock().ok()?.clone()
    }

    /// Is a call currently in flight?
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    // ── Internal ────────────────────────────────────────────

    fn set_current_op(&self, kind: OperationKind, model: &str) {
        if let Ok(mut current) = self.current_op.lock() {
            *current = Some(ActiveOperation {
                kind,
                model: model.to_string(),
                started_at: chrono::Utc::now().to_rfc3339(),
            });
        }
    }

    fn clear_current_op(&self) {
        if let Ok(mut current) = self.current_op.lock() {
            *current = None;
        }
    }
}

impl Default for AiService {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for exclusive AI access.
///
/// Dropping the guard releases the lock and clears the current operation.
pub struct AiGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    service: &'a AiService,
}

impl Drop for AiGuard<'_> {
    fn drop(&mut self) {
        self.service.clear_current_op();
    }
}
