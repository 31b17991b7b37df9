// src/repository/candidates.rs
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{HireError, HireResult};
use crate::types::{Candidate, NewCandidate};
use crate::utils::parse_skills;

pub const MAX_DECK_SIZE: i64 = 50;

pub struct CandidateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, candidate: &NewCandidate) -> HireResult<Candidate> {
        let first_name = candidate.first_name.trim();
        let last_name = candidate.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(HireError::validation("Candidate first and last name are required"));
        }

        let created = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (first_name, last_name, email, headline, location, bio,
                                    avatar_url, skills, experience_years, seniority, is_active,
                                    created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, TRUE, ?)
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(&candidate.email)
        .bind(&candidate.headline)
        .bind(&candidate.location)
        .bind(&candidate.bio)
        .bind(&candidate.avatar_url)
        .bind(Json(parse_skills(&candidate.skills)))
        .bind(candidate.experience_years)
        .bind(&candidate.seniority)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find(&self, id: i64) -> HireResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(candidate)
    }

    pub async fn find_many(&self, ids: &[i64]) -> HireResult<Vec<Candidate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM candidates WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let candidates = query
            .build_query_as::<Candidate>()
            .fetch_all(self.pool)
            .await?;
        Ok(candidates)
    }

    /// Active candidates the company has not swiped yet, newest first.
    pub async fn deck(&self, company_id: i64, limit: i64) -> HireResult<Vec<Candidate>> {
        let limit = limit.clamp(1, MAX_DECK_SIZE);
        let candidates = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT c.* FROM candidates c
            WHERE c.is_active = TRUE
              AND NOT EXISTS (
                  SELECT 1 FROM company_swipes s
                  WHERE s.company_id = ? AND s.candidate_id = c.id
              )
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT ?
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn set_active(&self, id: i64, is_active: bool) -> HireResult<bool> {
        let result = sqlx::query("UPDATE candidates SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
