// src/repository/companies.rs
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::HireResult;
use crate::types::{Company, CompanyInput};

pub struct CompanyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_owner(&self, owner_id: i64) -> HireResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(company)
    }

    /// Update a company only if `owner_id` owns it.
    pub async fn update_for_owner(
        &self,
        company_id: i64,
        owner_id: i64,
        input: &CompanyInput,
    ) -> HireResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = ?, website = ?, location = ?, size = ?, industry = ?, logo_url = ?,
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.website)
        .bind(&input.location)
        .bind(&input.size)
        .bind(&input.industry)
        .bind(&input.logo_url)
        .bind(Utc::now())
        .bind(company_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(company)
    }

    pub async fn list_all(&self) -> HireResult<Vec<Company>> {
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC, id ASC")
                .fetch_all(self.pool)
                .await?;
        Ok(companies)
    }
}
