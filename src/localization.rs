//! Language packs: per-language prompt strings, fallback replies, and the
//! risk keyword sets the classifier draws on.
//!
//! Each supported language maps to one `LanguagePack`. Adding a language
//! means adding a variant, a pack, and one match arm. `validate_packs()`
//! is run at state construction so an incomplete pack fails loudly at
//! startup instead of misclassifying silently later.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::InvalidEnum;

/// Target natural language for prompts and expected AI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Th,
    Cn,
}

impl Language {
    /// All supported languages. The classifier scans keyword sets across
    /// every entry because the AI's response language is not guaranteed.
    pub const ALL: [Language; 3] = [Language::En, Language::Th, Language::Cn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Th => "th",
            Self::Cn => "cn",
        }
    }

    pub fn pack(&self) -> &'static LanguagePack {
        match self {
            Self::En => &EN_PACK,
            Self::Th => &TH_PACK,
            Self::Cn => &CN_PACK,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = InvalidEnum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "th" => Ok(Self::Th),
            "cn" => Ok(Self::Cn),
            _ => Err(InvalidEnum {
                field: "Language".into(),
                value: s.into(),
            }),
        }
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed schema of localized strings and keyword sets for one language.
///
/// Keyword entries must be lowercase: the classifier lowercases the
/// response text before matching, so an uppercase keyword can never fire.
pub struct LanguagePack {
    /// Name used in prompt directives, e.g. "Respond in **Thai**".
    pub language_name: &'static str,
    /// Signals that classify a reply as DANGER.
    pub danger_keywords: &'static [&'static str],
    /// Signals that classify a reply as CAUTION.
    pub caution_keywords: &'static [&'static str],
    /// Signals that classify a reply as SAFE.
    pub safe_keywords: &'static [&'static str],
    /// Shown when the AI call fails outright. Must carry no risk keywords
    /// so the fallback classifies as INFO.
    pub analysis_fallback: &'static str,
    /// Shown when the AI returns an empty completion.
    pub empty_reply: &'static str,
    /// Shown when an interaction check fails outright.
    pub interaction_fallback: &'static str,
}

static EN_PACK: LanguagePack = LanguagePack {
    language_name: "English",
    danger_keywords: &["dangerous", "danger"],
    caution_keywords: &["caution", "avoid"],
    safe_keywords: &["safe", "recommended"],
    analysis_fallback: "An error occurred while communicating with the AI. \
        Please check your connection and try again.",
    empty_reply: "I couldn't analyze the data. Please try again.",
    interaction_fallback: "Could not complete the interaction check. Please try again.",
};

static TH_PACK: LanguagePack = LanguagePack {
    language_name: "Thai",
    danger_keywords: &["อันตราย"],
    caution_keywords: &["ระวัง"],
    safe_keywords: &["ปลอดภัย"],
    analysis_fallback: "เกิดข้อผิดพลาดในการเชื่อมต่อกับ AI กรุณาตรวจสอบอินเทอร์เน็ตแล้วลองใหม่อีกครั้ง",
    empty_reply: "ไม่สามารถวิเคราะห์ข้อมูลได้ กรุณาลองใหม่อีกครั้ง",
    interaction_fallback: "ไม่สามารถตรวจสอบการใช้ร่วมกันได้ กรุณาลองใหม่อีกครั้ง",
};

static CN_PACK: LanguagePack = LanguagePack {
    language_name: "Simplified Chinese",
    danger_keywords: &["危险"],
    caution_keywords: &["注意"],
    safe_keywords: &["安全"],
    analysis_fallback: "与 AI 通信时发生错误，请检查网络连接后重试。",
    empty_reply: "无法分析该数据，请重试。",
    interaction_fallback: "无法完成该项检查，请重试。",
};

/// Errors from pack validation.
#[derive(Debug, thiserror::Error)]
pub enum LocalizationError {
    #[error("language pack '{0}' is missing {1}")]
    MissingEntry(&'static str, &'static str),
    #[error("language pack '{0}' keyword '{1}' is not lowercase")]
    UppercaseKeyword(&'static str, &'static str),
}

/// Check every pack for completeness. Run once at startup.
pub fn validate_packs() -> Result<(), LocalizationError> {
    for language in Language::ALL {
        let pack = language.pack();
        let name = pack.language_name;
        if name.is_empty() {
            return Err(LocalizationError::MissingEntry(language.as_str(), "language_name"));
        }

        for (label, keywords) in [
            ("danger_keywords", pack.danger_keywords),
            ("caution_keywords", pack.caution_keywords),
            ("safe_keywords", pack.safe_keywords),
        ] {
            if keywords.is_empty() {
                return Err(LocalizationError::MissingEntry(name, label));
            }
            for kw in keywords.iter().copied() {
                if kw.chars().any(char::is_uppercase) {
                    return Err(LocalizationError::UppercaseKeyword(name, kw));
                }
            }
        }

        for (label, text) in [
            ("analysis_fallback", pack.analysis_fallback),
            ("empty_reply", pack.empty_reply),
            ("interaction_fallback", pack.interaction_fallback),
        ] {
            if text.trim().is_empty() {
                return Err(LocalizationError::MissingEntry(name, label));
            }
        }
    }
    Ok(())
}
