//! Best-effort extraction of a structured record from an AI reply.
//!
//! The templates ask the model to open with a `**Name:** <item>` line, but
//! nothing guarantees it complies. Extraction never fails; it degrades to
//! placeholders and lets the caller decide whether the result is worth
//! recording.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ExtractedRecord, ScanMode};

/// Placeholder when no name line is found.
pub const UNKNOWN_ITEM: &str = "Unknown Item";
/// Placeholder for a lab reply that yielded a value but no name line.
pub const LAB_RESULT_PLACEHOLDER: &str = "Lab Result";

/// A `Name:` label line, tolerating bold markers, bullets, and headers:
/// `**Name:** LDL Cholesterol`, `- Name: Atorvastatin`, `# Name: ...`.
static NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s>*\-#]*name\s*\*{0,2}\s*[:：]\s*(.+)$").expect("invalid name-line regex")
});

/// First decimal number immediately followed by a recognized lab unit.
static LAB_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(?:mg/dl|mcg/dl|g/dl|mg/l|mmol/l|µmol/l|umol/l|meq/l|iu/l|u/l|ng/ml|pg/ml|%)",
    )
    .expect("invalid lab-value regex")
});

/// Pull a record out of an AI reply.
///
/// - The first `Name:` line supplies the name, bold markers stripped and
///   whitespace trimmed.
/// - For lab results, the first number-with-unit occurrence anywhere in
///   the text supplies the value.
/// - No match never errors; the name falls back to a placeholder.
pub fn extract_record(text: &str, mode: ScanMode) -> ExtractedRecord {
    let name = text.lines().find_map(|line| {
        NAME_LINE
            .captures(line)
            .map(|caps| caps[1].replace('*', "").trim().to_string())
            .filter(|name| !name.is_empty())
    });

    let value = match mode {
        ScanMode::LabResult => LAB_VALUE
            .captures(text)
            .map(|caps| caps[1].to_string()),
        _ => None,
    };

    let name = name.unwrap_or_else(|| {
        if mode == ScanMode::LabResult && value.is_some() {
            LAB_RESULT_PLACEHOLDER.to_string()
        } else {
            UNKNOWN_ITEM.to_string()
        }
    });

    ExtractedRecord { name, value }
}

/// History policy: record only extractions that carry signal, a real
/// name or a numeric value. Placeholder-only results are dropped.
pub fn should_record(record: &ExtractedRecord) -> bool {
    record.value.is_some()
        || (record.name != UNKNOWN_ITEM && record.name != LAB_RESULT_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_name_line_with_lab_value() {
        let text = "**Name:** LDL Cholesterol\n\nYour result of 152 mg/dL is above the \
                    optimal range of <100 mg/dL.";
        let record = extract_record(text, ScanMode::LabResult);
        assert_eq!(record.name, "LDL Cholesterol");
        assert_eq!(record.value.as_deref(), Some("152"));
    }

    #[test]
    fn plain_name_line() {
        let record = extract_record("Name: Atorvastatin\nA statin.", ScanMode::Medication);
        assert_eq!(record.name, "Atorvastatin");
        assert!(record.value.is_none());
    }

    #[test]
    fn bulleted_and_bolded_name_line() {
        let record = extract_record("- **Name**: Pad Thai\nStir-fried noodles.", ScanMode::Meal);
        assert_eq!(record.name, "Pad Thai");
    }

    #[test]
    fn first_name_line_wins() {
        let text = "Name: Metformin\nName: Aspirin";
        let record = extract_record(text, ScanMode::Medication);
        assert_eq!(record.name, "Metformin");
    }

    #[test]
    fn missing_name_defaults_to_unknown_item() {
        let record = extract_record("A balanced meal with rice.", ScanMode::Meal);
        assert_eq!(record.name, UNKNOWN_ITEM);
        assert!(record.value.is_none());
        assert!(!should_record(&record));
    }

    #[test]
    fn lab_value_without_name_uses_lab_placeholder() {
        let record = extract_record("Your glucose came back at 98 mg/dL.", ScanMode::LabResult);
        assert_eq!(record.name, LAB_RESULT_PLACEHOLDER);
        assert_eq!(record.value.as_deref(), Some("98"));
        assert!(should_record(&record));
    }

    #[test]
    fn lab_mode_without_value_or_name_is_unknown() {
        let record = extract_record("The document was unreadable.", ScanMode::LabResult);
        assert_eq!(record.name, UNKNOWN_ITEM);
        assert!(record.value.is_none());
    }

    #[test]
    fn decimal_values_and_percent_units() {
        let record = extract_record("HbA1c measured 6.8 % this quarter.", ScanMode::LabResult);
        assert_eq!(record.value.as_deref(), Some("6.8"));

        let record = extract_record("TSH was 2.41 mIU/L... creatinine 1.1 mg/dL", ScanMode::LabResult);
        // mIU/L is not a recognized unit; the first recognized one wins.
        assert_eq!(record.value.as_deref(), Some("1.1"));
    }

    #[test]
    fn value_only_extracted_for_lab_mode() {
        let record = extract_record("Contains 500 mg/dL of sugar, somehow.", ScanMode::Meal);
        assert!(record.value.is_none());
    }

    #[test]
    fn named_record_without_value_is_recorded() {
        let record = ExtractedRecord {
            name: "Fried Rice".into(),
            value: None,
        };
        assert!(should_record(&record));
    }

    #[test]
    fn bare_number_without_unit_is_ignored() {
        let record = extract_record("Scored 152 on the panel.", ScanMode::LabResult);
        assert!(record.value.is_none());
    }
}
