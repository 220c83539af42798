use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{MySqlPool, types::Json};

use crate::error::Result;
use crate::model::attendance::{AttendanceRecord, Period};
use crate::reconcile::time::{calendar_date, day_key};
use crate::store::AttendanceStore;

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    employee_id: u64,
    day: DateTime<Utc>,
    periods: Json<Vec<Period>>,
    total_seconds: i64,
    legacy_intervals: Option<Json<Value>>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            employee_id: row.employee_id,
            day: row.day,
            periods: row.periods.0,
            total_seconds: row.total_seconds,
            legacy_intervals: row.legacy_intervals.map(|j| j.0),
        }
    }
}

pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn records_for(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT employee_id, day, periods, total_seconds, legacy_intervals
            FROM attendance_records
            WHERE employee_id = ?
            AND day BETWEEN ? AND ?
            ORDER BY day ASC
            "#,
        )
        .bind(employee_id)
        .bind(day_key(start))
        .bind(day_key(end))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn earliest_day(&self, employee_id: u64) -> Result<Option<NaiveDate>> {
        let earliest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MIN(day) FROM attendance_records WHERE employee_id = ?",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(earliest.as_ref().map(calendar_date))
    }

    async fn find_one(
        &self,
        employee_id: u64,
        day: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT employee_id, day, periods, total_seconds, legacy_intervals
            FROM attendance_records
            WHERE employee_id = ? AND day = ?
            "#,
        )
        .bind(employee_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn upsert(&self, record: &AttendanceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance_records
                (employee_id, day, periods, total_seconds, legacy_intervals)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                periods = VALUES(periods),
                total_seconds = VALUES(total_seconds),
                legacy_intervals = VALUES(legacy_intervals)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.day)
        .bind(Json(&record.periods))
        .bind(record.total_seconds)
        .bind(record.legacy_intervals.as_ref().map(Json))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, employee_id: u64, day: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE employee_id = ? AND day = ?")
            .bind(employee_id)
            .bind(day)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
