use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reconcile::time::{numeric_time_to_local, parse_hhmm};

/// Spreadsheet rows can hold at most this many in/out pairs.
pub const MAX_PUNCH_PAIRS: usize = 6;

/// A spreadsheet time cell: either the raw day fraction or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellTime {
    Fraction(f64),
    Text(String),
}

impl CellTime {
    /// Normalises to `HH:mm`. Empty cells and unreadable text yield `None`.
    pub fn to_hhmm(&self) -> Option<String> {
        match self {
            CellTime::Fraction(v) => numeric_time_to_local(*v),
            CellTime::Text(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return None;
                }
                if let Some(t) = parse_hhmm(raw) {
                    return Some(t.format("%H:%M").to_string());
                }
                // durations such as "30:00" are not wall-clock times
                if let Some((h, m)) = raw.split_once(':') {
                    if let (Ok(h), Ok(m)) = (h.parse::<u32>(), m.parse::<u32>()) {
                        if m < 60 {
                            return Some(format!("{:02}:{:02}", h, m));
                        }
                    }
                }
                raw.parse::<f64>().ok().and_then(numeric_time_to_local)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchPair {
    #[schema(value_type = Option<String>, example = "08:00")]
    pub time_in: Option<CellTime>,
    #[schema(value_type = Option<String>, example = "17:00")]
    pub time_out: Option<CellTime>,
}

/// One parsed spreadsheet row: one employee, one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "05/03/2026")]
    pub date: NaiveDate,
    #[serde(default)]
    #[schema(example = "Thursday")]
    pub day_name: Option<String>,
    #[serde(default)]
    pub pairs: Vec<PunchPair>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_in: Option<CellTime>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_out: Option<CellTime>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "08:30")]
    pub net_work_hours: Option<CellTime>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl TimeEntry {
    /// First recorded check-in of the row, falling back to "last in".
    pub fn first_in(&self) -> Option<String> {
        self.pairs
            .iter()
            .filter_map(|p| p.time_in.as_ref().and_then(CellTime::to_hhmm))
            .next()
            .or_else(|| self.last_in.as_ref().and_then(CellTime::to_hhmm))
    }

    /// Explicit "last out" when present, otherwise the last non-empty out.
    pub fn final_out(&self) -> Option<String> {
        self.last_out
            .as_ref()
            .and_then(CellTime::to_hhmm)
            .or_else(|| {
                self.pairs
                    .iter()
                    .rev()
                    .filter_map(|p| p.time_out.as_ref().and_then(CellTime::to_hhmm))
                    .next()
            })
    }

    pub fn net_hours(&self) -> Option<String> {
        self.net_work_hours.as_ref().and_then(CellTime::to_hhmm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "01/03/2026")]
    pub start: NaiveDate,
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "31/03/2026")]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetEmployee {
    #[serde(default)]
    pub display_name: Option<String>,
    pub entries: Vec<TimeEntry>,
}

/// A whole parsed import, keyed by employee code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetImport {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    pub employees: HashMap<String, SheetEmployee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pairs: Vec<(Option<CellTime>, Option<CellTime>)>) -> TimeEntry {
        TimeEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            day_name: None,
            pairs: pairs
                .into_iter()
                .map(|(time_in, time_out)| PunchPair { time_in, time_out })
                .collect(),
            last_in: None,
            last_out: None,
            net_work_hours: None,
            site: None,
            remarks: None,
        }
    }

    fn text(s: &str) -> Option<CellTime> {
        Some(CellTime::Text(s.to_string()))
    }

    #[test]
    fn cells_normalise_to_hhmm() {
        assert_eq!(CellTime::Fraction(0.5).to_hhmm().as_deref(), Some("12:00"));
        assert_eq!(CellTime::Text("8:05".into()).to_hhmm().as_deref(), Some("08:05"));
        assert_eq!(CellTime::Text("30:00".into()).to_hhmm().as_deref(), Some("30:00"));
        assert_eq!(CellTime::Text("0.25".into()).to_hhmm().as_deref(), Some("06:00"));
        assert_eq!(CellTime::Text("  ".into()).to_hhmm(), None);
        assert_eq!(CellTime::Text("absent".into()).to_hhmm(), None);
    }

    #[test]
    fn first_in_and_final_out_skip_empty_pairs() {
        let row = entry(vec![
            (text(""), text("")),
            (text("08:00"), text("12:00")),
            (text("13:00"), text("17:30")),
            (None, text("")),
        ]);
        assert_eq!(row.first_in().as_deref(), Some("08:00"));
        assert_eq!(row.final_out().as_deref(), Some("17:30"));
    }

    #[test]
    fn explicit_last_out_wins() {
        let mut row = entry(vec![(text("08:00"), text("12:00"))]);
        row.last_out = text("18:10");
        assert_eq!(row.final_out().as_deref(), Some("18:10"));
    }

    #[test]
    fn import_payload_accepts_numeric_and_text_cells() {
        let json = r#"{
            "dateRange": {"start": "01/03/2026", "end": "2026-03-31"},
            "employees": {
                "EMP-001": {
                    "displayName": "Jane Roe",
                    "entries": [{
                        "date": "05/03/2026",
                        "pairs": [{"timeIn": 0.3333333, "timeOut": "17:00"}],
                        "netWorkHours": "08:00"
                    }]
                }
            }
        }"#;

        let import: SpreadsheetImport = serde_json::from_str(json).unwrap();
        let range = import.date_range.unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());

        let rows = &import.employees["EMP-001"].entries;
        assert_eq!(rows[0].first_in().as_deref(), Some("08:00"));
        assert_eq!(rows[0].final_out().as_deref(), Some("17:00"));
    }
}
