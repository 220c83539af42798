use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::error::Result;
use crate::store::SuspectDayStore;

pub struct MySqlSuspectDays {
    pool: MySqlPool,
}

impl MySqlSuspectDays {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuspectDayStore for MySqlSuspectDays {
    async fn add(&self, employee_code: &str, day: NaiveDate) -> Result<()> {
        // unique (employee_code, day) makes a repeated add a no-op
        sqlx::query("INSERT IGNORE INTO suspect_days (employee_code, day) VALUES (?, ?)")
            .bind(employee_code)
            .bind(day)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, employee_code: &str, day: NaiveDate) -> Result<()> {
        sqlx::query("DELETE FROM suspect_days WHERE employee_code = ? AND day = ?")
            .bind(employee_code)
            .bind(day)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for(&self, employee_code: &str) -> Result<Vec<NaiveDate>> {
        let days = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT day FROM suspect_days WHERE employee_code = ? ORDER BY day ASC",
        )
        .bind(employee_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(days)
    }

    async fn counts_by_employee(&self) -> Result<BTreeMap<String, u64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT employee_code, COUNT(*) FROM suspect_days GROUP BY employee_code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(code, count)| (code, count.max(0) as u64))
            .collect())
    }
}
