// src/services/jobs.rs
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{HireError, HireResult};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeFilter, ChangeKind, Subscription, Table};
use crate::repository::JobRepository;
use crate::types::{Job, JobInput};

pub struct JobService<'a> {
    pool: &'a SqlitePool,
    feed: &'a ChangeFeed,
}

impl<'a> JobService<'a> {
    pub fn new(pool: &'a SqlitePool, feed: &'a ChangeFeed) -> Self {
        Self { pool, feed }
    }

    fn publish(&self, kind: ChangeKind, job: &Job) {
        self.feed.publish(
            ChangeEvent::new(Table::Jobs, kind, job)
                .key("company_id", job.company_id)
                .key("id", job.id),
        );
    }

    pub async fn create(&self, company_id: i64, input: JobInput) -> HireResult<Job> {
        let valid = input.validate()?;
        let job = JobRepository::new(self.pool)
            .create(company_id, &valid)
            .await?;

        info!("Job {} '{}' created by company {}", job.id, job.title, company_id);
        self.publish(ChangeKind::Insert, &job);
        Ok(job)
    }

    pub async fn list(&self, company_id: i64) -> HireResult<Vec<Job>> {
        JobRepository::new(self.pool)
            .list_for_company(company_id)
            .await
    }

    pub async fn get(&self, id: i64, company_id: i64) -> HireResult<Job> {
        JobRepository::new(self.pool)
            .find_owned(id, company_id)
            .await?
            .ok_or(HireError::NotFound("Job"))
    }

    pub async fn update(&self, id: i64, company_id: i64, input: JobInput) -> HireResult<Job> {
        let valid = input.validate()?;
        let job = JobRepository::new(self.pool)
            .update_owned(id, company_id, &valid)
            .await?
            .ok_or(HireError::NotFound("Job"))?;

        info!("Job {} updated", job.id);
        self.publish(ChangeKind::Update, &job);
        Ok(job)
    }

    /// Flip `is_active`.
    pub async fn toggle_active(&self, id: i64, company_id: i64) -> HireResult<Job> {
        let repo = JobRepository::new(self.pool);
        let current = repo
            .find_owned(id, company_id)
            .await?
            .ok_or(HireError::NotFound("Job"))?;

        let job = repo
            .set_active_owned(id, company_id, !current.is_active)
            .await?
            .ok_or(HireError::NotFound("Job"))?;

        info!("Job {} is now {}", job.id, if job.is_active { "active" } else { "paused" });
        self.publish(ChangeKind::Update, &job);
        Ok(job)
    }

    /// Archive the posting. It disappears from listings but keeps its swipes.
    pub async fn delete(&self, id: i64, company_id: i64) -> HireResult<Job> {
        let job = JobRepository::new(self.pool)
            .archive_owned(id, company_id)
            .await?
            .ok_or(HireError::NotFound("Job"))?;

        info!("Job {} archived", job.id);
        self.publish(ChangeKind::Delete, &job);
        Ok(job)
    }

    /// Change events for the company's postings.
    pub fn subscribe(&self, company_id: i64) -> Subscription {
        self.feed
            .subscribe([ChangeFilter::table(Table::Jobs).eq("company_id", company_id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::Fixture;
    use crate::types::SkillList;
    use std::time::Duration;

    fn input(title: &str) -> JobInput {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "description": "Own the matching pipeline",
            "location": "Paris",
            "salary_min": 55000,
            "salary_max": 75000,
            "required_skills": "Rust, SQL, ",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_list_and_get() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let jobs = JobService::new(fx.pool(), &fx.feed);

        let job = jobs.create(company.id, input("Backend Engineer")).await.unwrap();
        assert!(job.is_active);
        assert_eq!(job.required_skills, vec!["Rust", "SQL"]);

        let listed = jobs.list(company.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(jobs.get(job.id, company.id).await.unwrap().title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_invalid_posting_is_rejected() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let jobs = JobService::new(fx.pool(), &fx.feed);

        let mut bad = input("Backend Engineer");
        bad.salary_min = Some(90_000);
        bad.required_skills = SkillList::List(vec![]);

        assert!(matches!(
            jobs.create(company.id, bad).await,
            Err(HireError::Validation(_))
        ));
        assert!(jobs.list(company.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_company_sees_not_found() {
        let fx = Fixture::new().await;
        let acme = fx.company("acme@example.com").await;
        let globex = fx.company("globex@example.com").await;
        let jobs = JobService::new(fx.pool(), &fx.feed);
        let job = jobs.create(acme.id, input("Backend Engineer")).await.unwrap();

        assert!(matches!(jobs.get(job.id, globex.id).await, Err(HireError::NotFound(_))));
        assert!(matches!(
            jobs.update(job.id, globex.id, input("Hijacked")).await,
            Err(HireError::NotFound(_))
        ));
        assert!(matches!(
            jobs.toggle_active(job.id, globex.id).await,
            Err(HireError::NotFound(_))
        ));
        assert!(matches!(jobs.delete(job.id, globex.id).await, Err(HireError::NotFound(_))));
        assert_eq!(jobs.get(job.id, acme.id).await.unwrap().title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_toggle_and_archive() {
        let fx = Fixture::new().await;
        let company = fx.company("acme@example.com").await;
        let jobs = JobService::new(fx.pool(), &fx.feed);
        let job = jobs.create(company.id, input("Backend Engineer")).await.unwrap();

        assert!(!jobs.toggle_active(job.id, company.id).await.unwrap().is_active);
        assert!(jobs.toggle_active(job.id, company.id).await.unwrap().is_active);

        let archived = jobs.delete(job.id, company.id).await.unwrap();
        assert!(archived.deleted_at.is_some());
        assert!(jobs.list(company.id).await.unwrap().is_empty());
        assert!(matches!(jobs.get(job.id, company.id).await, Err(HireError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_changes_are_published_per_company() {
        let fx = Fixture::new().await;
        let acme = fx.company("acme@example.com").await;
        let globex = fx.company("globex@example.com").await;
        let jobs = JobService::new(fx.pool(), &fx.feed);
        let mut acme_events = jobs.subscribe(acme.id);

        jobs.create(globex.id, input("Designer")).await.unwrap();
        let job = jobs.create(acme.id, input("Backend Engineer")).await.unwrap();
        jobs.delete(job.id, acme.id).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(1), acme_events.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.kind, ChangeKind::Insert);
        assert_eq!(first.row["title"], "Backend Engineer");

        let second = tokio::time::timeout(Duration::from_secs(1), acme_events.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.kind, ChangeKind::Delete);
    }
}
