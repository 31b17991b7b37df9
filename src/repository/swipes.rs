// src/repository/swipes.rs
//! Interest signals in both directions.
//!
//! At most one signal exists per (actor, target). Casting again hits the
//! unique index; that error is swallowed and reported as a duplicate.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::warn;

use crate::error::{is_unique_violation, HireResult};
use crate::types::{CandidateSwipe, CompanySwipe, Direction, SwipeActivity, SwipeOutcome};

pub struct SwipeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SwipeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a company signal. On a duplicate the stored signal is returned unchanged.
    pub async fn record_company_swipe(
        &self,
        company_id: i64,
        candidate_id: i64,
        job_id: Option<i64>,
        direction: Direction,
    ) -> HireResult<(SwipeOutcome, CompanySwipe)> {
        let inserted = sqlx::query_as::<_, CompanySwipe>(
            r#"
            INSERT INTO company_swipes (company_id, candidate_id, job_id, direction, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(candidate_id)
        .bind(job_id)
        .bind(direction)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(swipe) => Ok((SwipeOutcome::Recorded, swipe)),
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Duplicate swipe ignored: company {} -> candidate {}",
                    company_id, candidate_id
                );
                let existing = sqlx::query_as::<_, CompanySwipe>(
                    "SELECT * FROM company_swipes WHERE company_id = ? AND candidate_id = ?",
                )
                .bind(company_id)
                .bind(candidate_id)
                .fetch_one(self.pool)
                .await?;
                Ok((SwipeOutcome::Duplicate, existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record a candidate signal on a posting.
    pub async fn record_candidate_swipe(
        &self,
        candidate_id: i64,
        job_id: i64,
        direction: Direction,
    ) -> HireResult<(SwipeOutcome, CandidateSwipe)> {
        let inserted = sqlx::query_as::<_, CandidateSwipe>(
            r#"
            INSERT INTO candidate_swipes (candidate_id, job_id, direction, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .bind(job_id)
        .bind(direction)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(swipe) => Ok((SwipeOutcome::Recorded, swipe)),
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Duplicate swipe ignored: candidate {} -> job {}",
                    candidate_id, job_id
                );
                let existing = sqlx::query_as::<_, CandidateSwipe>(
                    "SELECT * FROM candidate_swipes WHERE candidate_id = ? AND job_id = ?",
                )
                .bind(candidate_id)
                .bind(job_id)
                .fetch_one(self.pool)
                .await?;
                Ok((SwipeOutcome::Duplicate, existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Outbound interested signals of a company.
    pub async fn company_interested(&self, company_id: i64) -> HireResult<Vec<CompanySwipe>> {
        let swipes = sqlx::query_as::<_, CompanySwipe>(
            r#"
            SELECT * FROM company_swipes
            WHERE company_id = ? AND direction = 'right'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(swipes)
    }

    pub async fn company_swipe_for(
        &self,
        company_id: i64,
        candidate_id: i64,
    ) -> HireResult<Option<CompanySwipe>> {
        let swipe = sqlx::query_as::<_, CompanySwipe>(
            "SELECT * FROM company_swipes WHERE company_id = ? AND candidate_id = ?",
        )
        .bind(company_id)
        .bind(candidate_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(swipe)
    }

    /// A candidate's interested signals restricted to `job_ids`, earliest first.
    pub async fn candidate_interested_in(
        &self,
        candidate_id: i64,
        job_ids: &[i64],
    ) -> HireResult<Vec<CandidateSwipe>> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT * FROM candidate_swipes WHERE direction = 'right' AND candidate_id = ",
        );
        query.push_bind(candidate_id);
        query.push(" AND job_id IN (");
        let mut separated = query.separated(", ");
        for id in job_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        query.push(" ORDER BY created_at ASC, job_id ASC");

        let swipes = query
            .build_query_as::<CandidateSwipe>()
            .fetch_all(self.pool)
            .await?;
        Ok(swipes)
    }

    pub async fn count_company_interested(&self, company_id: i64) -> HireResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM company_swipes WHERE company_id = ? AND direction = 'right'",
        )
        .bind(company_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    pub async fn recent_company_interested(
        &self,
        company_id: i64,
        limit: i64,
    ) -> HireResult<Vec<SwipeActivity>> {
        let activity = sqlx::query_as::<_, SwipeActivity>(
            r#"
            SELECT s.id, s.candidate_id, c.first_name, c.last_name, c.headline, s.created_at
            FROM company_swipes s
            JOIN candidates c ON c.id = s.candidate_id
            WHERE s.company_id = ? AND s.direction = 'right'
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT ?
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(activity)
    }
}
