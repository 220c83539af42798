use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::error::Result;
use crate::model::employee::DirectoryEmployee;
use crate::store::Directory;

/// Reads the HR `employees` table.
pub struct MySqlDirectory {
    pool: MySqlPool,
}

impl MySqlDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for MySqlDirectory {
    async fn find_employee(&self, employee_code: &str) -> Result<Option<DirectoryEmployee>> {
        let employee = sqlx::query_as::<_, DirectoryEmployee>(
            r#"
            SELECT id AS internal_id,
                   employee_code,
                   TRIM(CONCAT(first_name, ' ', COALESCE(last_name, ''))) AS display_name,
                   hire_date AS join_date
            FROM employees
            WHERE employee_code = ?
            LIMIT 1
            "#,
        )
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
