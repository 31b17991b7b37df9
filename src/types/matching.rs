// src/types/matching.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::candidate::Candidate;
use super::job::JobSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Both sides are interested.
    Matched,
    /// The company is interested, the candidate has not reciprocated yet.
    Awaiting,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
    pub candidate: Candidate,
    pub status: MatchStatus,
    pub matched_job: Option<JobSummary>,
    pub swiped_at: DateTime<Utc>,
}

impl MatchEntry {
    pub fn is_match(&self) -> bool {
        self.status == MatchStatus::Matched
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub awaiting: usize,
}

/// Every interested signal of one company, classified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchBoard {
    pub entries: Vec<MatchEntry>,
    pub stats: MatchStats,
}

impl MatchBoard {
    /// Sorts matched pairs first, then newest company signal first.
    pub fn new(mut entries: Vec<MatchEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.is_match()
                .cmp(&a.is_match())
                .then_with(|| b.swiped_at.cmp(&a.swiped_at))
                .then_with(|| a.candidate.id.cmp(&b.candidate.id))
        });

        let matched = entries.iter().filter(|e| e.is_match()).count();
        let stats = MatchStats {
            total: entries.len(),
            matched,
            awaiting: entries.len() - matched,
        };

        Self { entries, stats }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
