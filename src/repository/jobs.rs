// src/repository/jobs.rs
//! Job postings. Every query that touches a single posting is scoped by
//! `company_id`, so a posting owned by someone else reads as missing.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::HireResult;
use crate::types::{Job, JobSummary, ValidJob};

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company_id: i64, job: &ValidJob) -> HireResult<Job> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (company_id, title, description, location, remote_policy,
                              contract_type, salary_min, salary_max, salary_currency,
                              required_skills, nice_to_have_skills, seniority,
                              experience_years_min, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.remote_policy)
        .bind(job.contract_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(Json(&job.required_skills))
        .bind(Json(&job.nice_to_have_skills))
        .bind(job.seniority)
        .bind(job.experience_years_min)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;
        Ok(created)
    }

    /// The company's postings, newest first. Archived postings are hidden.
    pub async fn list_for_company(&self, company_id: i64) -> HireResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE company_id = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn find_owned(&self, id: i64, company_id: i64) -> HireResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE id = ? AND company_id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(job)
    }

    pub async fn find(&self, id: i64) -> HireResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(job)
    }

    pub async fn update_owned(
        &self,
        id: i64,
        company_id: i64,
        job: &ValidJob,
    ) -> HireResult<Option<Job>> {
        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = ?, description = ?, location = ?, remote_policy = ?, contract_type = ?,
                salary_min = ?, salary_max = ?, salary_currency = ?, required_skills = ?,
                nice_to_have_skills = ?, seniority = ?, experience_years_min = ?, updated_at = ?
            WHERE id = ? AND company_id = ? AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.remote_policy)
        .bind(job.contract_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(Json(&job.required_skills))
        .bind(Json(&job.nice_to_have_skills))
        .bind(job.seniority)
        .bind(job.experience_years_min)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn set_active_owned(
        &self,
        id: i64,
        company_id: i64,
        is_active: bool,
    ) -> HireResult<Option<Job>> {
        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET is_active = ?, updated_at = ?
            WHERE id = ? AND company_id = ? AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(is_active)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(updated)
    }

    /// Hide a posting from every listing. The row stays so swipes on it keep counting.
    pub async fn archive_owned(&self, id: i64, company_id: i64) -> HireResult<Option<Job>> {
        let now = Utc::now();
        let archived = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET is_active = FALSE, deleted_at = ?, updated_at = ?
            WHERE id = ? AND company_id = ? AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(archived)
    }

    /// Every posting the company ever owned, archived ones included.
    pub async fn ids_for_company(&self, company_id: i64) -> HireResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM jobs WHERE company_id = ?")
            .bind(company_id)
            .fetch_all(self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn summaries(&self, ids: &[i64]) -> HireResult<Vec<JobSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, title, location, salary_min, salary_max FROM jobs WHERE id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let summaries = query
            .build_query_as::<JobSummary>()
            .fetch_all(self.pool)
            .await?;
        Ok(summaries)
    }

    pub async fn count_active(&self, company_id: i64) -> HireResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs \
             WHERE company_id = ? AND is_active = TRUE AND deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}
