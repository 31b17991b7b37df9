// src/web/handlers/job_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::core::database::Database;
use crate::realtime::ChangeFeed;
use crate::services::JobService;
use crate::types::{Job, JobInput};
use crate::web::types::{ApiResult, DataResponse};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn list_jobs_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Job>>> {
    let jobs = JobService::new(db.pool(), feed)
        .list(auth.company_id())
        .await?;

    Ok(Json(DataResponse::success(
        format!("{} job posting(s)", jobs.len()),
        jobs,
    )))
}

pub async fn create_job_handler(
    request: Json<JobInput>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    info!(
        "User {} creating job '{}' for {}",
        auth.email(),
        request.title,
        auth.company().name
    );
    let job = JobService::new(db.pool(), feed)
        .create(auth.company_id(), request.into_inner())
        .await?;

    Ok(Json(DataResponse::success("Job posting published", job)))
}

pub async fn get_job_handler(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    let job = JobService::new(db.pool(), feed)
        .get(id, auth.company_id())
        .await?;

    Ok(Json(DataResponse::success(job.title.clone(), job)))
}

pub async fn update_job_handler(
    id: i64,
    request: Json<JobInput>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    let job = JobService::new(db.pool(), feed)
        .update(id, auth.company_id(), request.into_inner())
        .await?;

    Ok(Json(DataResponse::success("Job posting updated", job)))
}

pub async fn toggle_job_handler(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    let job = JobService::new(db.pool(), feed)
        .toggle_active(id, auth.company_id())
        .await?;

    let message = if job.is_active {
        "Job posting activated"
    } else {
        "Job posting paused"
    };
    Ok(Json(DataResponse::success(message, job)))
}

pub async fn delete_job_handler(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    let job = JobService::new(db.pool(), feed)
        .delete(id, auth.company_id())
        .await?;

    Ok(Json(DataResponse::success("Job posting deleted", job)))
}
