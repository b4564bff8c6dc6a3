use serde::{Deserialize, Serialize};

use super::enums::ScanMode;
use super::profile::HistoryItem;

/// One chart-ready lab measurement. The caller plots the series; this
/// module only shapes history data into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabDataPoint {
    pub date: String,
    pub value: f64,
    pub metric: String,
}

/// Derive a lab trend series from the scan history.
///
/// Takes every lab-result item whose value parses as a number, in
/// chronological (insertion) order. `metric` filters by item name,
/// case-insensitively; `None` takes all lab items.
pub fn lab_series(history: &[HistoryItem], metric: Option<&str>) -> Vec<LabDataPoint> {
    history
        .iter()
        .filter(|item| item.item_type == ScanMode::LabResult)
        .filter(|item| match metric {
            Some(m) => item.name.eq_ignore_ascii_case(m),
            None => true,
        })
        .filter_map(|item| {
            let value = item.value.as_ref()?.trim().parse::<f64>().ok()?;
            Some(LabDataPoint {
                date: item.date.clone(),
                value,
                metric: item.name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn lab_item(name: &str, value: Option<&str>, date: &str, timestamp: i64) -> HistoryItem {
        HistoryItem {
            id: Uuid::new_v4(),
            item_type: ScanMode::LabResult,
            name: name.into(),
            value: value.map(String::from),
            date: date.into(),
            timestamp,
        }
    }

    fn meal_item(name: &str) -> HistoryItem {
        HistoryItem {
            id: Uuid::new_v4(),
            item_type: ScanMode::Meal,
            name: name.into(),
            value: None,
            date: "2024-01-01".into(),
            timestamp: 0,
        }
    }

    #[test]
    fn series_keeps_chronological_order() {
        let history = vec![
            lab_item("LDL Cholesterol", Some("180"), "2023-10-01", 1),
            lab_item("LDL Cholesterol", Some("165"), "2023-11-15", 2),
            lab_item("LDL Cholesterol", Some("148"), "2024-01-10", 3),
        ];
        let series = lab_series(&history, Some("LDL Cholesterol"));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].value, 180.0);
        assert_eq!(series[2].date, "2024-01-10");
    }

    #[test]
    fn series_skips_non_lab_and_unparseable_items() {
        let history = vec![
            meal_item("Fried Rice"),
            lab_item("HbA1c", Some("6.8"), "2024-02-01", 4),
            lab_item("HbA1c", None, "2024-03-01", 5),
            lab_item("HbA1c", Some("pending"), "2024-04-01", 6),
        ];
        let series = lab_series(&history, None);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 6.8);
    }

    #[test]
    fn metric_filter_is_case_insensitive() {
        let history = vec![lab_item("LDL Cholesterol", Some("152"), "2024-01-10", 1)];
        assert_eq!(lab_series(&history, Some("ldl cholesterol")).len(), 1);
        assert!(lab_series(&history, Some("HbA1c")).is_empty());
    }
}
