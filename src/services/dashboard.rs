// src/services/dashboard.rs
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::HireResult;
use crate::repository::{JobRepository, SwipeRepository};
use crate::services::MatchDetector;
use crate::types::SwipeActivity;

const RECENT_ACTIVITY: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_jobs: i64,
    pub interested: i64,
    pub matches: i64,
    /// Interested swipes the candidate has not answered yet.
    pub pending: i64,
    pub recent_activity: Vec<SwipeActivity>,
}

pub async fn stats(pool: &SqlitePool, company_id: i64) -> HireResult<DashboardStats> {
    let swipes = SwipeRepository::new(pool);

    let active_jobs = JobRepository::new(pool).count_active(company_id).await?;
    let interested = swipes.count_company_interested(company_id).await?;
    let board = MatchDetector::new(pool).compute(company_id).await?;
    let matches = board.stats.matched as i64;
    let recent_activity = swipes
        .recent_company_interested(company_id, RECENT_ACTIVITY)
        .await?;

    Ok(DashboardStats {
        active_jobs,
        interested,
        matches,
        pending: (interested - matches).max(0),
        recent_activity,
    })
}
