// src/services/match_detector.rs
//! Mutual-interest detection.
//!
//! A (company, candidate) pair is a match when the company swiped right on
//! the candidate and the candidate swiped right on at least one posting the
//! company ever published. Nothing is stored: the board is recomputed from the
//! signals on every read.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, error};

use crate::error::HireResult;
use crate::realtime::{ChangeFeed, ChangeFilter, ChangeKind, Subscription, Table};
use crate::repository::{CandidateRepository, JobRepository, SwipeRepository};
use crate::types::{CandidateSwipe, JobSummary, MatchBoard, MatchEntry, MatchStatus};

pub struct MatchDetector<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MatchDetector<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Classify every interested signal the company cast. Any failed fetch aborts.
    pub async fn compute(&self, company_id: i64) -> HireResult<MatchBoard> {
        let swipes = SwipeRepository::new(self.pool);

        let outbound = swipes.company_interested(company_id).await?;
        if outbound.is_empty() {
            return Ok(MatchBoard::empty());
        }

        let candidate_ids: Vec<i64> = outbound.iter().map(|s| s.candidate_id).collect();
        let mut candidates: HashMap<i64, _> = CandidateRepository::new(self.pool)
            .find_many(&candidate_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let jobs = JobRepository::new(self.pool);
        let posting_ids = jobs.ids_for_company(company_id).await?;

        let mut matched_job_ids: HashMap<i64, i64> = HashMap::new();
        for swipe in &outbound {
            let reciprocal = swipes
                .candidate_interested_in(swipe.candidate_id, &posting_ids)
                .await?;
            if let Some(job_id) = pick_matched_job(&reciprocal) {
                matched_job_ids.insert(swipe.candidate_id, job_id);
            }
        }

        let summary_ids: Vec<i64> = matched_job_ids.values().copied().collect();
        let summaries: HashMap<i64, JobSummary> = jobs
            .summaries(&summary_ids)
            .await?
            .into_iter()
            .map(|j| (j.id, j))
            .collect();

        let entries = outbound
            .into_iter()
            .filter_map(|swipe| {
                // Signals on a removed candidate have nothing to show.
                let candidate = candidates.remove(&swipe.candidate_id)?;
                let matched_job = matched_job_ids
                    .get(&swipe.candidate_id)
                    .and_then(|job_id| summaries.get(job_id).cloned());
                let status = if matched_job_ids.contains_key(&swipe.candidate_id) {
                    MatchStatus::Matched
                } else {
                    MatchStatus::Awaiting
                };
                Some(MatchEntry {
                    candidate,
                    status,
                    matched_job,
                    swiped_at: swipe.created_at,
                })
            })
            .collect();

        let board = MatchBoard::new(entries);
        debug!(
            "Match board for company {}: {} matched, {} awaiting",
            company_id, board.stats.matched, board.stats.awaiting
        );
        Ok(board)
    }

    /// Board for a live view. A failed recompute shows as empty rather than stale.
    pub async fn snapshot(&self, company_id: i64) -> MatchBoard {
        match self.compute(company_id).await {
            Ok(board) => board,
            Err(e) => {
                error!("Failed to compute matches for company {}: {}", company_id, e);
                MatchBoard::empty()
            }
        }
    }

    /// The posting through which the pair matched, if they did.
    pub async fn match_for(
        &self,
        company_id: i64,
        candidate_id: i64,
    ) -> HireResult<Option<JobSummary>> {
        let swipes = SwipeRepository::new(self.pool);

        let interested = swipes
            .company_swipe_for(company_id, candidate_id)
            .await?
            .map(|s| s.direction.is_interested())
            .unwrap_or(false);
        if !interested {
            return Ok(None);
        }

        let jobs = JobRepository::new(self.pool);
        let posting_ids = jobs.ids_for_company(company_id).await?;
        let reciprocal = swipes
            .candidate_interested_in(candidate_id, &posting_ids)
            .await?;

        match pick_matched_job(&reciprocal) {
            Some(job_id) => Ok(jobs.summaries(&[job_id]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    pub async fn is_match(&self, company_id: i64, candidate_id: i64) -> HireResult<bool> {
        Ok(self.match_for(company_id, candidate_id).await?.is_some())
    }
}

/// Earliest reciprocal signal wins; ties go to the lowest posting id.
fn pick_matched_job(reciprocal: &[CandidateSwipe]) -> Option<i64> {
    reciprocal
        .iter()
        .filter(|s| s.direction.is_interested())
        .min_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.job_id.cmp(&b.job_id))
        })
        .map(|s| s.job_id)
}

/// New signals that can change the company's board. Candidate swipes carry
/// the owning company of the posting as a key.
pub fn watch_signals(feed: &ChangeFeed, company_id: i64) -> Subscription {
    feed.subscribe([
        ChangeFilter::table(Table::CompanySwipes)
            .kind(ChangeKind::Insert)
            .eq("company_id", company_id),
        ChangeFilter::table(Table::CandidateSwipes)
            .kind(ChangeKind::Insert)
            .eq("company_id", company_id),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::Fixture;
    use crate::types::Direction;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_match_requires_both_directions() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;

        let detector = MatchDetector::new(fx.pool());
        assert!(!detector.is_match(company.id, alice.id).await.unwrap());

        fx.company_swipe(company.id, alice.id, Direction::Right).await;
        assert!(!detector.is_match(company.id, alice.id).await.unwrap());

        fx.candidate_swipe(alice.id, job.id, Direction::Right).await;
        let matched = detector.match_for(company.id, alice.id).await.unwrap();
        assert_eq!(matched.map(|j| j.id), Some(job.id));
    }

    #[tokio::test]
    async fn test_order_of_casting_does_not_matter() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;

        fx.candidate_swipe(alice.id, job.id, Direction::Right).await;
        assert!(!MatchDetector::new(fx.pool())
            .is_match(company.id, alice.id)
            .await
            .unwrap());

        fx.company_swipe(company.id, alice.id, Direction::Right).await;
        assert!(MatchDetector::new(fx.pool())
            .is_match(company.id, alice.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_left_swipes_never_match() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;
        let bob = fx.candidate("Bob").await;

        fx.company_swipe(company.id, alice.id, Direction::Left).await;
        fx.candidate_swipe(alice.id, job.id, Direction::Right).await;
        fx.company_swipe(company.id, bob.id, Direction::Right).await;
        fx.candidate_swipe(bob.id, job.id, Direction::Left).await;

        let board = MatchDetector::new(fx.pool()).compute(company.id).await.unwrap();
        assert_eq!(board.stats.total, 1);
        assert_eq!(board.stats.matched, 0);
        assert_eq!(board.entries[0].candidate.id, bob.id);
    }

    #[tokio::test]
    async fn test_interest_in_another_company_is_not_a_match() {
        let fx = Fixture::new().await;
        let acme = fx.company("acme@example.com").await;
        let globex = fx.company("globex@example.com").await;
        let globex_job = fx.job(globex.id, "Designer").await;
        let alice = fx.candidate("Alice").await;

        fx.company_swipe(acme.id, alice.id, Direction::Right).await;
        fx.candidate_swipe(alice.id, globex_job.id, Direction::Right).await;

        let detector = MatchDetector::new(fx.pool());
        assert!(!detector.is_match(acme.id, alice.id).await.unwrap());
        assert!(!detector.is_match(globex.id, alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_signals_do_not_duplicate_matches() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;

        for _ in 0..2 {
            fx.company_swipe(company.id, alice.id, Direction::Right).await;
            fx.candidate_swipe(alice.id, job.id, Direction::Right).await;
        }

        let company_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM company_swipes WHERE candidate_id = ?")
                .bind(alice.id)
                .fetch_one(fx.pool())
                .await
                .unwrap();
        let candidate_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM candidate_swipes WHERE candidate_id = ?")
                .bind(alice.id)
                .fetch_one(fx.pool())
                .await
                .unwrap();
        assert_eq!(company_rows, 1);
        assert_eq!(candidate_rows, 1);

        let board = MatchDetector::new(fx.pool()).compute(company.id).await.unwrap();
        assert_eq!(board.stats.matched, 1);
        assert_eq!(board.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_board_puts_reciprocated_first() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let a = fx.candidate("Ada").await;
        let b = fx.candidate("Bea").await;
        let c = fx.candidate("Cid").await;

        let base = Utc::now() - Duration::hours(1);
        fx.company_swipe_at(company.id, a.id, base).await;
        fx.company_swipe_at(company.id, b.id, base + Duration::minutes(1)).await;
        fx.company_swipe_at(company.id, c.id, base + Duration::minutes(2)).await;
        fx.candidate_swipe(b.id, job.id, Direction::Right).await;

        let board = MatchDetector::new(fx.pool()).compute(company.id).await.unwrap();
        let summary: Vec<(i64, MatchStatus)> = board
            .entries
            .iter()
            .map(|e| (e.candidate.id, e.status))
            .collect();

        assert_eq!(
            summary,
            vec![
                (b.id, MatchStatus::Matched),
                (c.id, MatchStatus::Awaiting),
                (a.id, MatchStatus::Awaiting),
            ]
        );
        assert_eq!(board.entries[0].matched_job.as_ref().map(|j| j.id), Some(job.id));
        assert_eq!(board.stats.matched, 1);
        assert_eq!(board.stats.awaiting, 2);
    }

    #[tokio::test]
    async fn test_earliest_reciprocal_posting_is_surfaced() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let first = fx.job(company.id, "Backend Engineer").await;
        let second = fx.job(company.id, "Platform Engineer").await;
        let alice = fx.candidate("Alice").await;

        let base = Utc::now() - Duration::hours(1);
        fx.candidate_swipe_at(alice.id, second.id, base).await;
        fx.candidate_swipe_at(alice.id, first.id, base + Duration::minutes(5)).await;
        fx.company_swipe(company.id, alice.id, Direction::Right).await;

        let matched = MatchDetector::new(fx.pool())
            .match_for(company.id, alice.id)
            .await
            .unwrap();
        assert_eq!(matched.map(|j| j.id), Some(second.id));
    }

    #[tokio::test]
    async fn test_archived_posting_keeps_match() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;

        fx.company_swipe(company.id, alice.id, Direction::Right).await;
        fx.candidate_swipe(alice.id, job.id, Direction::Right).await;

        let archived = JobRepository::new(fx.pool())
            .archive_owned(job.id, company.id)
            .await
            .unwrap();
        assert!(archived.is_some());

        let board = MatchDetector::new(fx.pool()).compute(company.id).await.unwrap();
        assert_eq!(board.stats.matched, 1);
        assert_eq!(board.entries[0].matched_job.as_ref().map(|j| j.id), Some(job.id));
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_company_is_empty() {
        let fx = Fixture::new().await;
        let board = MatchDetector::new(fx.pool()).snapshot(999).await;
        assert!(board.entries.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_surfaces_empty_board_on_failure() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let alice = fx.candidate("Alice").await;
        fx.company_swipe(company.id, alice.id, Direction::Right).await;

        fx.pool().close().await;

        let detector = MatchDetector::new(fx.pool());
        assert!(detector.compute(company.id).await.is_err());
        assert!(detector.snapshot(company.id).await.entries.is_empty());
    }

    #[tokio::test]
    async fn test_watch_signals_only_sees_own_company() {
        use crate::services::CandidateService;
        use crate::types::SwipeRequest;
        use std::time::Duration as StdDuration;

        let fx = Fixture::new().await;
        let acme = fx.company("acme@example.com").await;
        let globex = fx.company("globex@example.com").await;
        let acme_job = fx.job(acme.id, "Rust Engineer").await;
        let globex_job = fx.job(globex.id, "Go Engineer").await;
        let alice = fx.candidate("Alice").await;

        let mut signals = watch_signals(&fx.feed, acme.id);
        let service = CandidateService::new(fx.pool(), &fx.feed);

        service
            .candidate_swipe(alice.id, globex_job.id, Direction::Right)
            .await
            .unwrap();
        let quiet = tokio::time::timeout(StdDuration::from_millis(50), signals.next()).await;
        assert!(quiet.is_err());

        service
            .swipe(
                acme.id,
                alice.id,
                SwipeRequest {
                    direction: Direction::Right,
                    job_id: None,
                },
            )
            .await
            .unwrap();
        let event = signals.next().await.unwrap();
        assert_eq!(event.table, Table::CompanySwipes);

        service
            .candidate_swipe(alice.id, acme_job.id, Direction::Right)
            .await
            .unwrap();
        let event = signals.next().await.unwrap();
        assert_eq!(event.table, Table::CandidateSwipes);
        assert_eq!(event.keys.get("company_id"), Some(&acme.id));

        let board = MatchDetector::new(fx.pool()).compute(acme.id).await.unwrap();
        assert_eq!(board.stats.matched, 1);
    }
}
