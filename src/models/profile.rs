use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ScanMode;

/// One previously recorded scan outcome. Immutable once created; the
/// history log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub item_type: ScanMode,
    /// AI-extracted item name, e.g. "Atorvastatin", "Fried Rice", "LDL Cholesterol".
    pub name: String,
    /// Numeric-looking value, only meaningful for lab results, e.g. "152".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Creation instant, Unix milliseconds.
    pub timestamp: i64,
}

impl HistoryItem {
    /// Stamp a new history item at the current instant.
    pub fn new(item_type: ScanMode, name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_type,
            name: name.into(),
            value,
            date: Local::now().format("%Y-%m-%d").to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Identity and medical context for the single local user.
///
/// Created on first use via the caller's form, replaced wholesale on edit,
/// and mutated only by appending history items when a scan yields
/// recordable data. Persisted indefinitely; there is no deletion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// Chronic conditions, free text.
    pub conditions: String,
    /// Current medications, free text, comma-separable.
    pub medications: String,
    /// Food and drug allergies, free text.
    pub allergies: String,
    /// Scan history, insertion order = chronological.
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl UserProfile {
    /// Ephemeral stand-in context for flows that tolerate a missing profile
    /// (interaction check only). Never persisted.
    pub fn guest() -> Self {
        Self {
            name: "Guest".into(),
            age: 0,
            conditions: "None".into(),
            medications: "None".into(),
            allergies: "None".into(),
            history: Vec::new(),
        }
    }

    /// Split the free-text medications field on commas, dropping blanks.
    pub fn medication_list(&self) -> Vec<&str> {
        self.medications
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect()
    }

    pub fn push_history(&mut self, item: HistoryItem) {
        self.history.push(item);
    }
}
