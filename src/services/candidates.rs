// src/services/candidates.rs
//! The swipe deck and the signals cast from both sides.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{HireError, HireResult};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind, Table};
use crate::repository::{CandidateRepository, JobRepository, SwipeRepository};
use crate::services::MatchDetector;
use crate::types::{
    Candidate, CandidateDetail, CandidateSwipe, Direction, SwipeOutcome, SwipeRequest, SwipeResult,
};

pub struct CandidateService<'a> {
    pool: &'a SqlitePool,
    feed: &'a ChangeFeed,
}

impl<'a> CandidateService<'a> {
    pub fn new(pool: &'a SqlitePool, feed: &'a ChangeFeed) -> Self {
        Self { pool, feed }
    }

    pub async fn deck(&self, company_id: i64, limit: i64) -> HireResult<Vec<Candidate>> {
        CandidateRepository::new(self.pool)
            .deck(company_id, limit)
            .await
    }

    pub async fn detail(&self, candidate_id: i64, company_id: i64) -> HireResult<CandidateDetail> {
        let candidate = CandidateRepository::new(self.pool)
            .find(candidate_id)
            .await?
            .ok_or(HireError::NotFound("Candidate"))?;

        let swipe = SwipeRepository::new(self.pool)
            .company_swipe_for(company_id, candidate_id)
            .await?
            .map(|s| s.direction);
        let is_match = match swipe {
            Some(Direction::Right) => {
                MatchDetector::new(self.pool)
                    .is_match(company_id, candidate_id)
                    .await?
            }
            _ => false,
        };

        Ok(CandidateDetail {
            candidate,
            swipe,
            is_match,
        })
    }

    /// Record the company's decision on a candidate and report a fresh match.
    pub async fn swipe(
        &self,
        company_id: i64,
        candidate_id: i64,
        request: SwipeRequest,
    ) -> HireResult<SwipeResult> {
        CandidateRepository::new(self.pool)
            .find(candidate_id)
            .await?
            .ok_or(HireError::NotFound("Candidate"))?;

        if let Some(job_id) = request.job_id {
            JobRepository::new(self.pool)
                .find_owned(job_id, company_id)
                .await?
                .ok_or(HireError::NotFound("Job"))?;
        }

        let (outcome, swipe) = SwipeRepository::new(self.pool)
            .record_company_swipe(company_id, candidate_id, request.job_id, request.direction)
            .await?;

        if outcome == SwipeOutcome::Recorded {
            info!(
                "Company {} swiped {} on candidate {}",
                company_id,
                swipe.direction.as_str(),
                candidate_id
            );
            self.feed.publish(
                ChangeEvent::new(Table::CompanySwipes, ChangeKind::Insert, &swipe)
                    .key("company_id", company_id)
                    .key("candidate_id", candidate_id),
            );
        }

        let matched_job = if swipe.direction.is_interested() {
            MatchDetector::new(self.pool)
                .match_for(company_id, candidate_id)
                .await?
        } else {
            None
        };
        if let Some(job) = &matched_job {
            info!(
                "It's a match: company {} and candidate {} on job {}",
                company_id, candidate_id, job.id
            );
        }

        Ok(SwipeResult {
            outcome,
            swipe,
            is_match: matched_job.is_some(),
            matched_job,
        })
    }

    /// A candidate's decision on a posting. Archived postings cannot be swiped.
    pub async fn candidate_swipe(
        &self,
        candidate_id: i64,
        job_id: i64,
        direction: Direction,
    ) -> HireResult<(SwipeOutcome, CandidateSwipe)> {
        CandidateRepository::new(self.pool)
            .find(candidate_id)
            .await?
            .ok_or(HireError::NotFound("Candidate"))?;

        let job = JobRepository::new(self.pool)
            .find(job_id)
            .await?
            .filter(|job| job.deleted_at.is_none())
            .ok_or(HireError::NotFound("Job"))?;
        if !job.is_active {
            return Err(HireError::validation("Job is not accepting applications"));
        }

        let (outcome, swipe) = SwipeRepository::new(self.pool)
            .record_candidate_swipe(candidate_id, job_id, direction)
            .await?;

        if outcome == SwipeOutcome::Recorded {
            info!(
                "Candidate {} swiped {} on job {}",
                candidate_id,
                swipe.direction.as_str(),
                job_id
            );
            self.feed.publish(
                ChangeEvent::new(Table::CandidateSwipes, ChangeKind::Insert, &swipe)
                    .key("candidate_id", candidate_id)
                    .key("job_id", job_id)
                    .key("company_id", job.company_id),
            );
        }

        Ok((outcome, swipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::ChangeFilter;
    use crate::services::fixtures::Fixture;

    fn right(job_id: Option<i64>) -> SwipeRequest {
        SwipeRequest {
            direction: Direction::Right,
            job_id,
        }
    }

    #[tokio::test]
    async fn test_deck_hides_swiped_and_inactive() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let alice = fx.candidate("Alice").await;
        let bob = fx.candidate("Bob").await;
        let carol = fx.candidate("Carol").await;
        CandidateRepository::new(fx.pool())
            .set_active(carol.id, false)
            .await
            .unwrap();

        let service = CandidateService::new(fx.pool(), &fx.feed);
        service.swipe(company.id, alice.id, right(None)).await.unwrap();

        let deck = service.deck(company.id, 20).await.unwrap();
        let ids: Vec<i64> = deck.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![bob.id]);
    }

    #[tokio::test]
    async fn test_swipe_reports_match_once_reciprocated() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;
        let service = CandidateService::new(fx.pool(), &fx.feed);

        let (outcome, _) = service
            .candidate_swipe(alice.id, job.id, Direction::Right)
            .await
            .unwrap();
        assert_eq!(outcome, SwipeOutcome::Recorded);

        let result = service
            .swipe(company.id, alice.id, right(Some(job.id)))
            .await
            .unwrap();
        assert!(result.is_match);
        assert_eq!(result.matched_job.map(|j| j.id), Some(job.id));

        let detail = service.detail(alice.id, company.id).await.unwrap();
        assert_eq!(detail.swipe, Some(Direction::Right));
        assert!(detail.is_match);
    }

    #[tokio::test]
    async fn test_repeated_swipe_is_duplicate_and_first_wins() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let alice = fx.candidate("Alice").await;
        let service = CandidateService::new(fx.pool(), &fx.feed);

        let first = service.swipe(company.id, alice.id, right(None)).await.unwrap();
        let second = service
            .swipe(
                company.id,
                alice.id,
                SwipeRequest {
                    direction: Direction::Left,
                    job_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(first.outcome, SwipeOutcome::Recorded);
        assert_eq!(second.outcome, SwipeOutcome::Duplicate);
        assert_eq!(second.swipe.id, first.swipe.id);
        assert_eq!(second.swipe.direction, Direction::Right);
    }

    #[tokio::test]
    async fn test_swipe_unknown_targets() {
        let fx = Fixture::new().await;
        let acme = fx.company("acme@example.com").await;
        let globex = fx.company("globex@example.com").await;
        let globex_job = fx.job(globex.id, "Designer").await;
        let alice = fx.candidate("Alice").await;
        let service = CandidateService::new(fx.pool(), &fx.feed);

        assert!(matches!(
            service.swipe(acme.id, 999, right(None)).await,
            Err(HireError::NotFound("Candidate"))
        ));
        assert!(matches!(
            service.swipe(acme.id, alice.id, right(Some(globex_job.id))).await,
            Err(HireError::NotFound("Job"))
        ));
    }

    #[tokio::test]
    async fn test_candidate_cannot_swipe_paused_or_archived_job() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let paused = fx.job(company.id, "Paused").await;
        let archived = fx.job(company.id, "Archived").await;
        let alice = fx.candidate("Alice").await;
        let jobs = JobRepository::new(fx.pool());
        jobs.set_active_owned(paused.id, company.id, false).await.unwrap();
        jobs.archive_owned(archived.id, company.id).await.unwrap();

        let service = CandidateService::new(fx.pool(), &fx.feed);
        assert!(matches!(
            service.candidate_swipe(alice.id, paused.id, Direction::Right).await,
            Err(HireError::Validation(_))
        ));
        assert!(matches!(
            service.candidate_swipe(alice.id, archived.id, Direction::Right).await,
            Err(HireError::NotFound("Job"))
        ));
    }

    #[tokio::test]
    async fn test_recorded_swipes_are_published() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let job = fx.job(company.id, "Backend Engineer").await;
        let alice = fx.candidate("Alice").await;
        let mut events = fx.feed.subscribe([
            ChangeFilter::table(Table::CompanySwipes),
            ChangeFilter::table(Table::CandidateSwipes),
        ]);

        let service = CandidateService::new(fx.pool(), &fx.feed);
        service.swipe(company.id, alice.id, right(None)).await.unwrap();
        service.swipe(company.id, alice.id, right(None)).await.unwrap();
        service
            .candidate_swipe(alice.id, job.id, Direction::Right)
            .await
            .unwrap();

        assert_eq!(events.next().await.unwrap().table, Table::CompanySwipes);
        // The duplicate published nothing.
        assert_eq!(events.next().await.unwrap().table, Table::CandidateSwipes);
    }
}
