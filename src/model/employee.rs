use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Directory entry for an employee, looked up by employee code.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DirectoryEmployee {
    pub internal_id: u64,
    pub employee_code: String,
    pub display_name: String,
    pub join_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "employeeCode": "EMP-001",
        "displayName": "John Doe",
        "joinDate": "01/01/2024",
        "inDirectory": true,
        "inSpreadsheet": true
    })
)]
pub struct EmployeeInfo {
    pub employee_code: String,
    pub display_name: Option<String>,
    #[serde(with = "crate::model::serde_date::option")]
    #[schema(value_type = Option<String>, format = "date")]
    pub join_date: Option<NaiveDate>,
    pub in_directory: bool,
    pub in_spreadsheet: bool,
}
