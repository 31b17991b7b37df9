// src/web/handlers/settings_handlers.rs
use crate::auth::{AuthenticatedUser, JwtService};
use crate::core::database::Database;
use crate::repository::SettingsRepository;
use crate::services::AccountService;
use crate::types::{ProfileUpdate, SettingsPatch, UserSettings};
use crate::web::types::{ApiResult, DataResponse, ProfileData};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn get_settings_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<UserSettings>> {
    let settings = SettingsRepository::new(db.pool())
        .get_or_default(auth.user().id)
        .await?;
    Ok(Json(DataResponse::success("Settings", settings)))
}

pub async fn update_settings_handler(
    patch: Json<SettingsPatch>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> ApiResult<DataResponse<UserSettings>> {
    let repo = SettingsRepository::new(db.pool());
    let current = repo.get_or_default(auth.user().id).await?;
    let saved = repo.save(&current.apply(patch.into_inner())).await?;

    info!("Settings updated for {}", auth.email());
    Ok(Json(DataResponse::success("Settings saved", saved)))
}

pub async fn update_profile_handler(
    request: Json<ProfileUpdate>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    jwt: &State<JwtService>,
) -> ApiResult<DataResponse<ProfileData>> {
    let (user, company) = AccountService::new(db.pool(), jwt)
        .update_profile(auth.user().id, auth.company_id(), request.into_inner())
        .await?;

    info!("Profile updated for {}", user.email);
    Ok(Json(DataResponse::success(
        "Profile updated",
        ProfileData { user, company },
    )))
}
