// src/web/mod.rs

pub mod handlers;
pub mod streams;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AdminAccess, AdminKey, AuthenticatedUser, JwtService, OptionalAuth};
use crate::core::database::Database;
use crate::environment::EnvironmentConfig;
use crate::realtime::ChangeFeed;
use crate::services::DashboardStats;
use crate::types::*;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{
    catchers, delete, get, options, patch, post, put, routes, Build, Request, Response, Rocket,
    State,
};
use tracing::{info, warn};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Auth

#[post("/auth/signup", data = "<request>")]
pub async fn signup(
    request: Json<SignupRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<Session>> {
    handlers::signup_handler(request, db, jwt).await
}

#[post("/auth/login", data = "<request>")]
pub async fn login(
    request: Json<LoginRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<Session>> {
    handlers::login_handler(request, db, jwt).await
}

#[post("/auth/forgot-password", data = "<request>")]
pub async fn forgot_password(
    request: Json<ForgotPasswordRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<ActionResponse> {
    handlers::forgot_password_handler(request, db, jwt).await
}

#[post("/auth/reset-password", data = "<request>")]
pub async fn reset_password(
    request: Json<ResetPasswordRequest>,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<ActionResponse> {
    handlers::reset_password_handler(request, db, jwt).await
}

// Account

#[get("/me")]
pub async fn get_current_user(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<MeData>> {
    handlers::get_current_user_handler(auth, db).await
}

#[get("/dashboard")]
pub async fn dashboard(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<DashboardStats>> {
    handlers::dashboard_handler(auth, db).await
}

#[get("/settings")]
pub async fn get_settings(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<UserSettings>> {
    handlers::get_settings_handler(auth, db).await
}

#[patch("/settings", data = "<patch>")]
pub async fn update_settings(
    patch: Json<SettingsPatch>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<UserSettings>> {
    handlers::update_settings_handler(patch, auth, db).await
}

#[put("/settings/profile", data = "<request>")]
pub async fn update_profile(
    request: Json<ProfileUpdate>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<ProfileData>> {
    handlers::update_profile_handler(request, auth, db, jwt).await
}

// Jobs

#[get("/jobs")]
pub async fn list_jobs(
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Job>>> {
    handlers::list_jobs_handler(auth, db, feed).await
}

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<JobInput>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    handlers::create_job_handler(request, auth, db, feed).await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    handlers::get_job_handler(id, auth, db, feed).await
}

#[put("/jobs/<id>", data = "<request>")]
pub async fn update_job(
    id: i64,
    request: Json<JobInput>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    handlers::update_job_handler(id, request, auth, db, feed).await
}

#[post("/jobs/<id>/toggle-active")]
pub async fn toggle_job(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    handlers::toggle_job_handler(id, auth, db, feed).await
}

#[delete("/jobs/<id>")]
pub async fn delete_job(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Job>> {
    handlers::delete_job_handler(id, auth, db, feed).await
}

// Candidates and matches

#[get("/candidates?<limit>")]
pub async fn candidate_deck(
    limit: Option<i64>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Candidate>>> {
    handlers::deck_handler(limit, auth, db, feed).await
}

#[get("/candidates/<id>")]
pub async fn candidate_detail(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<CandidateDetail>> {
    handlers::candidate_detail_handler(id, auth, db, feed).await
}

#[post("/candidates/<id>/swipe", data = "<request>")]
pub async fn swipe_candidate(
    id: i64,
    request: Json<SwipeRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<SwipeResult>> {
    handlers::swipe_handler(id, request, auth, db, feed).await
}

#[post("/candidate-swipes", data = "<request>")]
pub async fn candidate_swipe(
    request: Json<CandidateSwipeRequest>,
    admin: AdminAccess,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<CandidateSwipeReceipt>> {
    handlers::candidate_swipe_handler(request, admin, db, feed).await
}

#[get("/matches")]
pub async fn matches(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<MatchBoard>> {
    handlers::matches_handler(auth, db).await
}

// Conversations

#[get("/conversations?<q>")]
pub async fn list_conversations(
    q: Option<String>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<ConversationSummary>>> {
    handlers::list_conversations_handler(q, auth, db, feed).await
}

#[post("/conversations", data = "<request>")]
pub async fn open_conversation(
    request: Json<OpenConversationRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Conversation>> {
    handlers::open_conversation_handler(request, auth, db, feed).await
}

#[get("/conversations/<id>/messages")]
pub async fn conversation_history(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Message>>> {
    handlers::history_handler(id, auth, db, feed).await
}

#[post("/conversations/<id>/messages", data = "<request>")]
pub async fn send_message(
    id: i64,
    request: Json<SendMessageRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Message>> {
    handlers::send_message_handler(id, request, auth, db, feed).await
}

// System

#[get("/health")]
pub async fn health(auth: OptionalAuth, db: &State<Database>) -> Json<DataResponse<HealthData>> {
    handlers::health_handler(auth, db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Authentication required".to_string(),
        "UNAUTHORIZED".to_string(),
        vec!["Log in and send the token as 'Authorization: Bearer <token>'".to_string()],
    ))
}

#[rocket::catch(403)]
pub fn forbidden() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Admin routes are disabled on this server".to_string(),
        "FORBIDDEN".to_string(),
        vec!["Set admin_token in config.yaml or HIREFLOW_ADMIN_TOKEN".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec![],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "VALIDATION_ERROR".to_string(),
        vec!["Verify field names and value types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application around already-open resources.
pub fn build_rocket(
    db: Database,
    jwt: JwtService,
    feed: ChangeFeed,
    admin: AdminKey,
) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(db)
        .manage(jwt)
        .manage(feed)
        .manage(admin)
        .register(
            "/api",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                signup,
                login,
                forgot_password,
                reset_password,
                get_current_user,
                dashboard,
                get_settings,
                update_settings,
                update_profile,
                list_jobs,
                create_job,
                streams::job_events,
                get_job,
                update_job,
                toggle_job,
                delete_job,
                candidate_deck,
                candidate_detail,
                swipe_candidate,
                candidate_swipe,
                matches,
                streams::match_events,
                list_conversations,
                open_conversation,
                conversation_history,
                send_message,
                streams::message_events,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig) -> Result<()> {
    config.ensure_directories().await?;

    let db = Database::new(&config.database_path).await?;
    let jwt = JwtService::new(&config.jwt_secret, config.token_ttl_hours);
    let feed = ChangeFeed::new();
    let admin = AdminKey::new(config.admin_token.clone());
    if config.admin_token.is_none() {
        warn!("No admin token configured, admin routes are disabled");
    }

    info!("Starting HireFlow API server on port {}", config.port);
    info!("Database: {}", config.database_path.display());

    let figment = rocket::Config::figment().merge(("port", config.port));
    let _rocket = build_rocket(db, jwt, feed, admin)
        .configure(figment)
        .launch()
        .await?;

    Ok(())
}
