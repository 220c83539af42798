use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::EmployeeInfo;

/// Which side of the comparison a working value was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Spreadsheet,
    Database,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub check_in: Source,
    pub check_out: Source,
}

impl Selection {
    pub fn both(source: Source) -> Self {
        Self {
            check_in: source,
            check_out: source,
        }
    }
}

/// Spreadsheet values for one day, normalised to `HH:mm`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetDay {
    #[schema(example = "08:00")]
    pub check_in: Option<String>,
    #[serde(with = "crate::model::serde_date::option")]
    #[schema(value_type = Option<String>, example = "05/03/2026")]
    pub check_in_date: Option<NaiveDate>,
    #[schema(example = "17:00")]
    pub check_out: Option<String>,
    /// Row date, or the next day when the shift crosses midnight.
    #[serde(with = "crate::model::serde_date::option")]
    #[schema(value_type = Option<String>, example = "05/03/2026")]
    pub check_out_date: Option<NaiveDate>,
    #[schema(example = "09:00")]
    pub net_work_hours: Option<String>,
    pub site: Option<String>,
    pub remarks: Option<String>,
}

impl SpreadsheetDay {
    pub fn has_time(&self) -> bool {
        self.check_in.is_some() || self.check_out.is_some()
    }
}

/// Database values for one day, in local time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseDay {
    #[schema(example = "08:02")]
    pub check_in: Option<String>,
    #[serde(with = "crate::model::serde_date::option")]
    #[schema(value_type = Option<String>, example = "05/03/2026")]
    pub check_in_date: Option<NaiveDate>,
    #[schema(example = "16:58")]
    pub check_out: Option<String>,
    #[serde(with = "crate::model::serde_date::option")]
    #[schema(value_type = Option<String>, example = "05/03/2026")]
    pub check_out_date: Option<NaiveDate>,
    #[schema(example = 32160)]
    pub total_seconds: Option<i64>,
    #[schema(example = "08:56")]
    pub total: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancies {
    pub check_in_missing_in_other: bool,
    pub check_out_missing_in_other: bool,
    pub low_hours: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayComparison {
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "05/03/2026")]
    pub date: NaiveDate,
    #[schema(example = "Thursday")]
    pub day_name: String,
    pub spreadsheet: SpreadsheetDay,
    pub database: DatabaseDay,
    pub discrepancies: Discrepancies,
    pub issues: Vec<String>,
    pub selection: Selection,
    /// Duration of the selected check-in/check-out pair, absent when it cannot be computed.
    #[schema(example = "09:00")]
    pub calculated_duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateBounds {
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "01/01/2024")]
    pub earliest: NaiveDate,
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "19/10/2026")]
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Month,
    Range,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComparisonQuery {
    /// `month` (default), `range` or `all`
    #[param(value_type = Option<String>, example = "month")]
    pub mode: Option<FilterMode>,
    /// `YYYY-MM`, used with `mode=month`
    #[param(example = "2026-03")]
    pub month: Option<String>,
    /// `DD/MM/YYYY`, used with `mode=range`
    #[param(example = "01/03/2026")]
    pub start_date: Option<String>,
    /// `DD/MM/YYYY`, used with `mode=range`
    #[param(example = "31/03/2026")]
    pub end_date: Option<String>,
}

/// The interval a comparison was actually computed for.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub mode: FilterMode,
    #[schema(example = "2026-03")]
    pub month: Option<String>,
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "01/03/2026")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::model::serde_date")]
    #[schema(value_type = String, example = "31/03/2026")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub employee_info: EmployeeInfo,
    pub date_bounds: DateBounds,
    pub active_filter: ActiveFilter,
    pub days: Vec<DayComparison>,
    #[schema(example = 3)]
    pub total_issues: usize,
    /// Set when the attendance store could not be read and only spreadsheet data is shown.
    pub degraded: bool,
}
