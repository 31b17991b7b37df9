// src/web/handlers/system_handlers.rs
use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::core::database::Database;
use crate::repository::SettingsRepository;
use crate::services::{dashboard, DashboardStats};
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn get_current_user_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<MeData>> {
    let settings = SettingsRepository::new(db.pool())
        .get_or_default(auth.user().id)
        .await?;
    let message = format!(
        "User authenticated successfully for company: {}",
        auth.company().name
    );

    Ok(Json(DataResponse::success(
        message,
        MeData {
            user: auth.user,
            company: auth.company,
            settings,
        },
    )))
}

pub async fn dashboard_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<DashboardStats>> {
    let stats = dashboard::stats(db.pool(), auth.company_id()).await?;
    Ok(Json(DataResponse::success(
        format!("Dashboard for {}", auth.company().name),
        stats,
    )))
}

pub async fn health_handler(
    auth: OptionalAuth,
    db: &State<Database>,
) -> Json<DataResponse<HealthData>> {
    if let Some(user) = auth.user {
        info!(
            "Health check by authenticated user: {} (company: {})",
            user.email(),
            user.company().name
        );
    } else {
        info!("Health check by anonymous user");
    }

    let database = match db.health_check().await {
        Ok(()) => true,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    };

    let status = if database { "ok" } else { "degraded" };
    Json(DataResponse::success(
        format!("Service is {}", status),
        HealthData {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}
