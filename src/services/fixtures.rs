// src/services/fixtures.rs
//! Test-only builders over an in-memory store.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::core::database::Database;
use crate::realtime::ChangeFeed;
use crate::repository::{CandidateRepository, JobRepository, SwipeRepository};
use crate::types::{
    Candidate, Company, ContractType, Direction, Job, NewCandidate, RemotePolicy, Seniority,
    ValidJob,
};

pub struct Fixture {
    pub db: Database,
    pub feed: ChangeFeed,
}

impl Fixture {
    pub async fn new() -> Self {
        Self {
            db: Database::in_memory().await.unwrap(),
            feed: ChangeFeed::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// A user owning one company, inserted without hashing a real password.
    pub async fn company(&self, email: &str) -> Company {
        let now = Utc::now();
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, full_name, created_at, updated_at)
             VALUES (?, 'not-a-hash', 'Test Recruiter', ?, ?) RETURNING id",
        )
        .bind(email)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .unwrap();

        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (owner_id, name, location, size, created_at, updated_at)
             VALUES (?, ?, 'Paris', '1-10', ?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(format!("Company of {}", email))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .unwrap()
    }

    pub async fn job(&self, company_id: i64, title: &str) -> Job {
        let job = ValidJob {
            title: title.to_string(),
            description: "Build things".to_string(),
            location: "Paris".to_string(),
            remote_policy: RemotePolicy::Hybrid,
            contract_type: ContractType::FullTime,
            salary_min: 50_000,
            salary_max: 70_000,
            salary_currency: "EUR".to_string(),
            required_skills: vec!["Rust".to_string()],
            nice_to_have_skills: vec![],
            seniority: Seniority::Mid,
            experience_years_min: None,
        };
        JobRepository::new(self.pool())
            .create(company_id, &job)
            .await
            .unwrap()
    }

    pub async fn candidate(&self, first_name: &str) -> Candidate {
        let candidate = NewCandidate {
            first_name: first_name.to_string(),
            last_name: "Martin".to_string(),
            email: None,
            headline: Some("Software Engineer".to_string()),
            location: Some("Lyon".to_string()),
            bio: None,
            avatar_url: None,
            skills: "Rust, SQL".to_string(),
            experience_years: Some(4),
            seniority: Some("mid".to_string()),
        };
        CandidateRepository::new(self.pool())
            .create(&candidate)
            .await
            .unwrap()
    }

    pub async fn company_swipe(&self, company_id: i64, candidate_id: i64, direction: Direction) {
        SwipeRepository::new(self.pool())
            .record_company_swipe(company_id, candidate_id, None, direction)
            .await
            .unwrap();
    }

    pub async fn candidate_swipe(&self, candidate_id: i64, job_id: i64, direction: Direction) {
        SwipeRepository::new(self.pool())
            .record_candidate_swipe(candidate_id, job_id, direction)
            .await
            .unwrap();
    }

    /// Interested company swipe with a chosen timestamp.
    pub async fn company_swipe_at(&self, company_id: i64, candidate_id: i64, at: DateTime<Utc>) {
        sqlx::query(
            "INSERT INTO company_swipes (company_id, candidate_id, direction, created_at)
             VALUES (?, ?, 'right', ?)",
        )
        .bind(company_id)
        .bind(candidate_id)
        .bind(at)
        .execute(self.pool())
        .await
        .unwrap();
    }

    /// Interested candidate swipe with a chosen timestamp.
    pub async fn candidate_swipe_at(&self, candidate_id: i64, job_id: i64, at: DateTime<Utc>) {
        sqlx::query(
            "INSERT INTO candidate_swipes (candidate_id, job_id, direction, created_at)
             VALUES (?, ?, 'right', ?)",
        )
        .bind(candidate_id)
        .bind(job_id)
        .bind(at)
        .execute(self.pool())
        .await
        .unwrap();
    }
}
