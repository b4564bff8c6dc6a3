use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::enums::{InvalidEnum, RiskLevel, ScanMode};

/// What the user submitted for analysis. Ephemeral; never persisted.
///
/// Image bytes arrive base64-encoded with any data-URI prefix already
/// stripped by the capture boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Image { data: String },
    Text { content: String },
}

impl ScanRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn image(data: impl Into<String>) -> Self {
        Self::Image { data: data.into() }
    }

    /// Normalize captured image data: strip any `data:*;base64,` prefix
    /// and reject payloads that are not valid base64.
    pub fn image_from_capture(data: &str) -> Option<Self> {
        let trimmed = data.trim();
        let payload = match trimmed.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => trimmed,
        };
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .ok()
            .filter(|bytes| !bytes.is_empty())?;
        Some(Self::image(payload))
    }

    /// Blank text and no image; handlers reject this before composing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Image { data } => data.trim().is_empty(),
            Self::Text { content } => content.trim().is_empty(),
        }
    }
}

/// Which flow produced an analysis: a scan in one of the three modes, or
/// the direct food-drug interaction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Scan(ScanMode),
    InteractionCheck,
}

const INTERACTION_CHECK_TAG: &str = "FDI_CHECK";

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan(mode) => mode.as_str(),
            Self::InteractionCheck => INTERACTION_CHECK_TAG,
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = InvalidEnum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == INTERACTION_CHECK_TAG {
            return Ok(Self::InteractionCheck);
        }
        s.parse::<ScanMode>()
            .map(Self::Scan)
            .map_err(|_| InvalidEnum {
                field: "AnalysisKind".into(),
                value: s.into(),
            })
    }
}

impl Serialize for AnalysisKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnalysisKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Structured record pulled out of an AI reply, destined for the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Outcome of one analysis flow. Session-scoped; only the extracted record
/// (if any) outlives it, as a history item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Raw markdown reply from the AI (or the localized fallback string).
    pub text: String,
    /// Derived solely from `text` by the classifier; never set elsewhere.
    pub risk_level: RiskLevel,
    /// Unix milliseconds.
    pub timestamp: i64,
    #[serde(rename = "mode")]
    pub kind: AnalysisKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn scan_request_emptiness() {
        assert!(ScanRequest::text("   ").is_empty());
        assert!(ScanRequest::image("").is_empty());
        assert!(!ScanRequest::text("Atorvastatin").is_empty());
        assert!(!ScanRequest::image("aGVsbG8=").is_empty());
    }

    #[test]
    fn image_from_capture_strips_data_uri_prefix() {
        let scan = ScanRequest::image_from_capture("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(scan, ScanRequest::image("aGVsbG8="));

        // Already-stripped payloads pass through unchanged.
        let scan = ScanRequest::image_from_capture("aGVsbG8=").unwrap();
        assert_eq!(scan, ScanRequest::image("aGVsbG8="));
    }

    #[test]
    fn image_from_capture_rejects_invalid_base64() {
        assert!(ScanRequest::image_from_capture("not base64!!").is_none());
        assert!(ScanRequest::image_from_capture("").is_none());
        assert!(ScanRequest::image_from_capture("data:image/png;base64,").is_none());
    }

    #[test]
    fn analysis_kind_round_trip() {
        for (kind, s) in [
            (AnalysisKind::Scan(ScanMode::Medication), "MEDICATION"),
            (AnalysisKind::Scan(ScanMode::LabResult), "LAB_RESULT"),
            (AnalysisKind::InteractionCheck, "FDI_CHECK"),
        ] {
            assert_eq!(kind.as_str(), s);
            assert_eq!(AnalysisKind::from_str(s).unwrap(), kind);
        }
        assert!(AnalysisKind::from_str("CHAT").is_err());
    }

    #[test]
    fn analysis_result_serializes_kind_as_mode() {
        let result = AnalysisResult {
            text: "ok".into(),
            risk_level: RiskLevel::Info,
            timestamp: 1,
            kind: AnalysisKind::InteractionCheck,
            extracted: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"mode\":\"FDI_CHECK\""));
        assert!(!json.contains("extracted"));
    }
}
