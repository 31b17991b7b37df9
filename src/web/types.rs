// src/web/types.rs
use crate::error::HireError;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use tracing::error;

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Action,
    Error,
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message: message.into(),
            action: action.into(),
            next_actions: None,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// Error envelope plus the HTTP status it is sent with.
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub body: StandardErrorResponse,
}

impl ApiError {
    pub fn new(status: Status, error: impl Into<String>, error_code: &str) -> Self {
        Self {
            status,
            body: StandardErrorResponse::new(error.into(), error_code.to_string(), vec![]),
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.body.suggestions = suggestions;
        self
    }
}

impl From<HireError> for ApiError {
    fn from(err: HireError) -> Self {
        let status = match &err {
            HireError::Validation(_) => Status::BadRequest,
            HireError::NotFound(_) => Status::NotFound,
            HireError::Conflict(_) | HireError::NotMatched => Status::Conflict,
            HireError::InvalidCredentials | HireError::Unauthorized => Status::Unauthorized,
            HireError::Database(_) | HireError::Internal(_) => Status::InternalServerError,
        };

        // Storage details stay in the logs.
        let message = if err.is_server_error() {
            error!("Request failed: {}", err);
            "Something went wrong, please try again".to_string()
        } else {
            err.to_string()
        };

        let suggestions = match &err {
            HireError::NotMatched => {
                vec!["Both sides must swipe right before chatting".to_string()]
            }
            HireError::InvalidCredentials => vec!["Check your email and password".to_string()],
            HireError::Database(_) | HireError::Internal(_) => vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
            _ => vec![],
        };

        ApiError::new(status, message, err.code()).with_suggestions(suggestions)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(self.body)).respond_to(request)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct MeData {
    pub user: crate::types::User,
    pub company: crate::types::Company,
    pub settings: crate::types::UserSettings,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ProfileData {
    pub user: crate::types::User,
    pub company: crate::types::Company,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}
