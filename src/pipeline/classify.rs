//! Risk classification of free-text AI replies.
//!
//! The precedence chain is data, not nested conditionals: an ordered rule
//! table, scanned top-down with the first hit winning. DANGER outranks
//! CAUTION outranks SAFE; no hit at all is INFO.

use std::sync::LazyLock;

use crate::localization::Language;
use crate::models::RiskLevel;

/// Glyph the system prompt tells the model to prefix interaction warnings
/// with; its presence alone classifies a reply as DANGER.
pub const WARNING_GLYPH: &str = "⚠️";

/// One priority level of the classification chain.
struct RiskRule {
    level: RiskLevel,
    /// Matched against the original text (emoji survive lowercasing, but
    /// keyword matching works on the lowered copy, so keep them apart).
    glyphs: &'static [&'static str],
    /// Union of this level's keywords across every supported language,
    /// matched against the lowercased text.
    keywords: Vec<&'static str>,
}

static RISK_RULES: LazyLock<[RiskRule; 3]> = LazyLock::new(|| {
    [
        RiskRule {
            level: RiskLevel::Danger,
            glyphs: &[WARNING_GLYPH],
            keywords: keywords_for(|pack| pack.danger_keywords),
        },
        RiskRule {
            level: RiskLevel::Caution,
            glyphs: &[],
            keywords: keywords_for(|pack| pack.caution_keywords),
        },
        RiskRule {
            level: RiskLevel::Safe,
            glyphs: &[],
            keywords: keywords_for(|pack| pack.safe_keywords),
        },
    ]
});

fn keywords_for(
    select: fn(&'static crate::localization::LanguagePack) -> &'static [&'static str],
) -> Vec<&'static str> {
    Language::ALL
        .iter()
        .flat_map(|language| select(language.pack()).iter().copied())
        .collect()
}

/// Classify an AI reply into a risk level.
///
/// The response language is not guaranteed to match the requested one, so
/// every language's keyword set is scanned. Short-circuits on the first
/// matching rule.
pub fn classify_risk(text: &str) -> RiskLevel {
    let lower = text.to_lowercase();

    for rule in RISK_RULES.iter() {
        let glyph_hit = rule.glyphs.iter().any(|glyph| text.contains(glyph));
        let keyword_hit = rule.keywords.iter().any(|kw| lower.contains(kw));
        if glyph_hit || keyword_hit {
            return rule.level;
        }
    }

    RiskLevel::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_glyph_is_danger() {
        assert_eq!(classify_risk("⚠️ **INTERACTION DETECTED**"), RiskLevel::Danger);
    }

    #[test]
    fn danger_keywords_all_languages() {
        assert_eq!(classify_risk("This is dangerous."), RiskLevel::Danger);
        assert_eq!(classify_risk("There is a danger here."), RiskLevel::Danger);
        assert_eq!(classify_risk("อาหารนี้อันตรายสำหรับคุณ"), RiskLevel::Danger);
        assert_eq!(classify_risk("这种组合很危险。"), RiskLevel::Danger);
    }

    #[test]
    fn caution_keywords_all_languages() {
        assert_eq!(classify_risk("Use with caution."), RiskLevel::Caution);
        assert_eq!(classify_risk("You may want to avoid grapefruit."), RiskLevel::Caution);
        assert_eq!(classify_risk("ควรระวังการใช้ร่วมกัน"), RiskLevel::Caution);
        assert_eq!(classify_risk("服用时请注意剂量。"), RiskLevel::Caution);
    }

    #[test]
    fn safe_keywords_all_languages() {
        assert_eq!(classify_risk("This is safe to take."), RiskLevel::Safe);
        assert_eq!(classify_risk("Leafy greens are recommended."), RiskLevel::Safe);
        assert_eq!(classify_risk("ทานร่วมกันได้อย่างปลอดภัย"), RiskLevel::Safe);
        assert_eq!(classify_risk("两者同服是安全的。"), RiskLevel::Safe);
    }

    #[test]
    fn no_signal_is_info() {
        assert_eq!(classify_risk("Atorvastatin is a statin medication."), RiskLevel::Info);
        assert_eq!(classify_risk(""), RiskLevel::Info);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(classify_risk("DANGEROUS interaction"), RiskLevel::Danger);
        assert_eq!(classify_risk("Use CAUTION here"), RiskLevel::Caution);
        assert_eq!(classify_risk("Perfectly SAFE"), RiskLevel::Safe);
    }

    // ── Precedence: DANGER > CAUTION > SAFE > INFO ──────────────────

    #[test]
    fn danger_outranks_caution() {
        assert_eq!(
            classify_risk("This combination is dangerous, avoid immediately"),
            RiskLevel::Danger
        );
    }

    #[test]
    fn danger_outranks_safe() {
        assert_eq!(
            classify_risk("Not safe at all, this is dangerous."),
            RiskLevel::Danger
        );
    }

    #[test]
    fn glyph_outranks_cooccurring_safe_keyword() {
        assert_eq!(
            classify_risk("⚠️ Generally safe, but an interaction was detected."),
            RiskLevel::Danger
        );
    }

    #[test]
    fn caution_outranks_safe() {
        assert_eq!(
            classify_risk("Safe in small amounts, but avoid large servings."),
            RiskLevel::Caution
        );
    }

    #[test]
    fn safe_only_when_no_higher_signal() {
        assert_eq!(
            classify_risk("Grapefruit juice is generally safe with this medication"),
            RiskLevel::Safe
        );
    }

    #[test]
    fn mixed_language_signals_follow_priority() {
        // Thai caution + English safe → CAUTION
        assert_eq!(classify_risk("ปลอดภัย but ระวัง portion size"), RiskLevel::Caution);
    }

    #[test]
    fn rule_table_is_ordered_danger_first() {
        assert_eq!(RISK_RULES[0].level, RiskLevel::Danger);
        assert_eq!(RISK_RULES[1].level, RiskLevel::Caution);
        assert_eq!(RISK_RULES[2].level, RiskLevel::Safe);
        assert!(!RISK_RULES[0].glyphs.is_empty());
    }
}
