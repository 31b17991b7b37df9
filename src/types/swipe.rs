// src/types/swipe.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::job::JobSummary;

/// Direction of an interest signal. `Right` means interested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "not_interested")]
    Left,
    #[serde(alias = "interested")]
    Right,
}

impl Direction {
    pub fn is_interested(self) -> bool {
        self == Direction::Right
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "not_interested" => Ok(Direction::Left),
            "right" | "interested" => Ok(Direction::Right),
            other => Err(format!("Unknown swipe direction: {}", other)),
        }
    }
}

/// Signal cast by a company on a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanySwipe {
    pub id: i64,
    pub company_id: i64,
    pub candidate_id: i64,
    pub job_id: Option<i64>,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

/// Signal cast by a candidate on a job posting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CandidateSwipe {
    pub id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

/// Result of casting a signal. A repeated cast is a no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeOutcome {
    Recorded,
    Duplicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    pub direction: Direction,
    #[serde(default)]
    pub job_id: Option<i64>,
}

/// A candidate's swipe relayed by the admin tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSwipeRequest {
    pub candidate_id: i64,
    pub job_id: i64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSwipeReceipt {
    pub outcome: SwipeOutcome,
    pub swipe: CandidateSwipe,
}

/// A recent interested swipe with the candidate's display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SwipeActivity {
    pub id: i64,
    pub candidate_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub headline: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What the company gets back after swiping.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeResult {
    pub outcome: SwipeOutcome,
    pub swipe: CompanySwipe,
    pub is_match: bool,
    pub matched_job: Option<JobSummary>,
}

/// A deck card opened on its own, with the company's earlier decision if any.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    pub candidate: Candidate,
    pub swipe: Option<Direction>,
    pub is_match: bool,
}
