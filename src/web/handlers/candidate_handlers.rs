// src/web/handlers/candidate_handlers.rs
use crate::auth::{AdminAccess, AuthenticatedUser};
use crate::core::database::Database;
use crate::realtime::ChangeFeed;
use crate::repository::MAX_DECK_SIZE;
use crate::services::{CandidateService, MatchDetector};
use crate::types::{
    Candidate, CandidateDetail, CandidateSwipeReceipt, CandidateSwipeRequest, MatchBoard,
    SwipeOutcome, SwipeRequest, SwipeResult,
};
use crate::web::types::{ApiResult, DataResponse};

use rocket::serde::json::Json;
use rocket::State;

const DEFAULT_DECK_SIZE: i64 = 20;

pub async fn deck_handler(
    limit: Option<i64>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Candidate>>> {
    let limit = limit.unwrap_or(DEFAULT_DECK_SIZE).clamp(1, MAX_DECK_SIZE);
    let deck = CandidateService::new(db.pool(), feed)
        .deck(auth.company_id(), limit)
        .await?;

    let message = if deck.is_empty() {
        "No more candidates to review".to_string()
    } else {
        format!("{} candidate(s) to review", deck.len())
    };
    Ok(Json(DataResponse::success(message, deck)))
}

pub async fn candidate_detail_handler(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<CandidateDetail>> {
    let detail = CandidateService::new(db.pool(), feed)
        .detail(id, auth.company_id())
        .await?;

    Ok(Json(DataResponse::success(detail.candidate.full_name(), detail)))
}

pub async fn swipe_handler(
    id: i64,
    request: Json<SwipeRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<SwipeResult>> {
    let result = CandidateService::new(db.pool(), feed)
        .swipe(auth.company_id(), id, request.into_inner())
        .await?;

    let message = match (result.outcome, result.is_match) {
        (_, true) => "It's a match!",
        (SwipeOutcome::Duplicate, false) => "Already swiped",
        (SwipeOutcome::Recorded, false) => "Swipe recorded",
    };
    Ok(Json(DataResponse::success(message, result)))
}

pub async fn matches_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<MatchBoard>> {
    let board = MatchDetector::new(db.pool())
        .compute(auth.company_id())
        .await?;

    Ok(Json(DataResponse::success(
        format!(
            "{} match(es), {} awaiting",
            board.stats.matched, board.stats.awaiting
        ),
        board,
    )))
}

/// Records a swipe from the candidate side. Goes through the server so that
/// open match streams see it.
pub async fn candidate_swipe_handler(
    request: Json<CandidateSwipeRequest>,
    _admin: AdminAccess,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<CandidateSwipeReceipt>> {
    let request = request.into_inner();
    let (outcome, swipe) = CandidateService::new(db.pool(), feed)
        .candidate_swipe(request.candidate_id, request.job_id, request.direction)
        .await?;

    let message = match outcome {
        SwipeOutcome::Recorded => "Candidate swipe recorded",
        SwipeOutcome::Duplicate => "Candidate already swiped on this job",
    };
    Ok(Json(DataResponse::success(
        message,
        CandidateSwipeReceipt { outcome, swipe },
    )))
}
