// src/web/handlers/auth_handlers.rs
use crate::auth::JwtService;
use crate::core::database::Database;
use crate::services::AccountService;
use crate::types::{LoginRequest, Session, SignupRequest};
use crate::web::types::{
    ActionResponse, ApiResult, DataResponse, ForgotPasswordRequest, ResetPasswordRequest,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn signup_handler(
    request: Json<SignupRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<Session>> {
    info!("Signup requested for {}", request.email);
    let session = AccountService::new(db.pool(), jwt)
        .signup(request.into_inner())
        .await?;

    Ok(Json(DataResponse::success(
        format!("Welcome to HireFlow, {}", session.user.full_name),
        session,
    )))
}

pub async fn login_handler(
    request: Json<LoginRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<Session>> {
    let session = AccountService::new(db.pool(), jwt)
        .login(request.into_inner())
        .await?;

    Ok(Json(DataResponse::success("Logged in", session)))
}

pub async fn forgot_password_handler(
    request: Json<ForgotPasswordRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<ActionResponse> {
    AccountService::new(db.pool(), jwt)
        .request_password_reset(&request.email)
        .await?;

    // Same answer whether or not the address is registered.
    Ok(Json(ActionResponse::success(
        "If an account exists for this email, a reset link has been sent",
        "password_reset_requested",
    )))
}

pub async fn reset_password_handler(
    request: Json<ResetPasswordRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<ActionResponse> {
    AccountService::new(db.pool(), jwt)
        .reset_password(&request.token, &request.password)
        .await?;

    Ok(Json(
        ActionResponse::success("Password updated", "password_reset")
            .with_next_actions(vec!["Log in with your new password".to_string()]),
    ))
}
