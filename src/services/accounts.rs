// src/services/accounts.rs
//! Recruiter accounts: signup, login, password reset and profile edits.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, JwtService};
use crate::error::{is_unique_violation, HireError, HireResult};
use crate::repository::{CompanyRepository, UserRepository};
use crate::types::{
    Company, CompanyInput, LoginRequest, ProfileUpdate, Session, SignupRequest, User,
};
use crate::utils::{looks_like_email, normalize_email};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub struct AccountService<'a> {
    pool: &'a SqlitePool,
    jwt: &'a JwtService,
}

impl<'a> AccountService<'a> {
    pub fn new(pool: &'a SqlitePool, jwt: &'a JwtService) -> Self {
        Self { pool, jwt }
    }

    /// Create the user, their company and default settings in one transaction.
    pub async fn signup(&self, request: SignupRequest) -> HireResult<Session> {
        let email = normalize_email(&request.email);
        let full_name = request.full_name.trim().to_string();
        let company = request.company.normalized();

        let mut errors = Vec::new();
        if !looks_like_email(&email) {
            errors.push("A valid email is required".to_string());
        }
        if let Err(e) = check_password(&request.password) {
            errors.push(e);
        }
        if full_name.is_empty() {
            errors.push("Full name is required".to_string());
        }
        errors.extend(check_company(&company));
        if !errors.is_empty() {
            return Err(HireError::validation(errors.join("; ")));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(&full_name)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                HireError::Conflict("An account with this email already exists".to_string())
            } else {
                e.into()
            }
        })?;

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (owner_id, name, website, location, size, industry, logo_url,
                                   created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&company.name)
        .bind(&company.website)
        .bind(&company.location)
        .bind(&company.size)
        .bind(&company.industry)
        .bind(&company.logo_url)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_settings (user_id, updated_at) VALUES (?, ?)")
            .bind(user.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("New company account: {} ({})", company.name, user.email);

        self.session(user, company)
    }

    /// Wrong email and wrong password fail the same way.
    pub async fn login(&self, request: LoginRequest) -> HireResult<Session> {
        let email = normalize_email(&request.email);
        let user = UserRepository::new(self.pool)
            .find_by_email(&email)
            .await?
            .ok_or(HireError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!("Failed login attempt for {}", email);
            return Err(HireError::InvalidCredentials);
        }

        let company = CompanyRepository::new(self.pool)
            .find_by_owner(user.id)
            .await?
            .ok_or(HireError::NotFound("Company"))?;

        info!("User {} logged in", user.email);
        self.session(user, company)
    }

    fn session(&self, user: User, company: Company) -> HireResult<Session> {
        let token = self.jwt.create_token(&user, &company)?;
        Ok(Session {
            token,
            user,
            company,
        })
    }

    /// Store a single-use reset token when the address is known. Callers
    /// cannot tell known from unknown addresses apart.
    pub async fn request_password_reset(&self, email: &str) -> HireResult<Option<String>> {
        let email = normalize_email(email);
        let users = UserRepository::new(self.pool);
        let Some(user) = users.find_by_email(&email).await? else {
            info!("Password reset requested for unknown address");
            return Ok(None);
        };

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        users.create_reset(&token, user.id, expires_at).await?;

        // No mailer: the link is only logged.
        info!(
            "Password reset for {}: /reset-password?token={} (expires {})",
            user.email, token, expires_at
        );
        Ok(Some(token))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> HireResult<()> {
        check_password(new_password).map_err(HireError::Validation)?;

        let users = UserRepository::new(self.pool);
        let reset = users
            .find_reset(token.trim())
            .await?
            .filter(|reset| reset.is_usable(Utc::now()))
            .ok_or_else(|| HireError::validation("Reset link is invalid or has expired"))?;

        // The token is spent only once the new hash exists.
        let password_hash = hash_password(new_password)?;
        if !users.consume_reset(&reset.token).await? {
            return Err(HireError::validation("Reset link is invalid or has expired"));
        }

        users
            .update_password_hash(reset.user_id, &password_hash)
            .await?;
        info!("Password reset completed for user {}", reset.user_id);
        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        company_id: i64,
        update: ProfileUpdate,
    ) -> HireResult<(User, Company)> {
        let full_name = update.full_name.trim().to_string();
        let company_input = update.company.normalized();

        let mut errors = Vec::new();
        if full_name.is_empty() {
            errors.push("Full name is required".to_string());
        }
        errors.extend(check_company(&company_input));
        if !errors.is_empty() {
            return Err(HireError::validation(errors.join("; ")));
        }

        let company = CompanyRepository::new(self.pool)
            .update_for_owner(company_id, user_id, &company_input)
            .await?
            .ok_or(HireError::NotFound("Company"))?;

        let users = UserRepository::new(self.pool);
        users.update_full_name(user_id, &full_name).await?;
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or(HireError::NotFound("User"))?;

        Ok((user, company))
    }
}

fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
    } else {
        Ok(())
    }
}

fn check_company(company: &CompanyInput) -> Vec<String> {
    let mut errors = Vec::new();
    if company.name.is_empty() {
        errors.push("Company name is required".to_string());
    }
    if company.location.is_empty() {
        errors.push("Company location is required".to_string());
    }
    errors
}
