// src/auth.rs
use crate::core::database::Database;
use crate::error::{HireError, HireResult};
use crate::repository::{CompanyRepository, UserRepository};
use crate::types::{Company, User};
use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

const ISSUER: &str = "hireflow";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub company_id: i64,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Issues and checks HS256 bearer tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    pub fn create_token(&self, user: &User, company: &Company) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            company_id: company.id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Decode a token, rejecting bad signatures, other issuers and expired tokens.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> HireResult<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| HireError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against an argon2id hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// The signed-in recruiter and the company they own
pub struct AuthenticatedUser {
    pub user: User,
    pub company: Company,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn company_id(&self) -> i64 {
        self.company.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let jwt = match req.guard::<&State<JwtService>>().await {
            Outcome::Success(jwt) => jwt,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let db = match req.guard::<&State<Database>>().await {
            Outcome::Success(db) => db,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match req.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) => token.trim(),
                None => {
                    warn!("Invalid Authorization header format");
                    return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
                }
            },
            None => {
                warn!("Missing Authorization header");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        let claims = match jwt.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let Some(user_id) = claims.user_id() else {
            return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
        };

        match resolve_account(db.pool(), user_id).await {
            Ok(Some((user, company))) => {
                info!("User {} authenticated for company: {}", user.email, company.name);
                Outcome::Success(AuthenticatedUser { user, company })
            }
            Ok(None) => {
                warn!("Token for unknown account {}", user_id);
                Outcome::Error((Status::Unauthorized, AuthError::UnknownAccount))
            }
            Err(e) => {
                error!("Failed to load account {}: {}", user_id, e);
                Outcome::Error((Status::InternalServerError, AuthError::DatabaseError))
            }
        }
    }
}

async fn resolve_account(
    pool: &sqlx::SqlitePool,
    user_id: i64,
) -> HireResult<Option<(User, Company)>> {
    let Some(user) = UserRepository::new(pool).find_by_id(user_id).await? else {
        return Ok(None);
    };
    let company = CompanyRepository::new(pool).find_by_owner(user.id).await?;
    Ok(company.map(|company| (user, company)))
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    UnknownAccount,
    DatabaseError,
    AdminDisabled,
    InvalidAdminToken,
}

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Shared secret guarding the admin routes. `None` closes them.
pub struct AdminKey(Option<String>);

impl AdminKey {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|token| !token.trim().is_empty()))
    }

    fn accepts(&self, presented: &str) -> bool {
        matches!(&self.0, Some(expected) if expected == presented)
    }
}

/// Proof that the caller presented the admin token.
pub struct AdminAccess;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminAccess {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let key = match req.guard::<&State<AdminKey>>().await {
            Outcome::Success(key) => key,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::AdminDisabled))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        if key.0.is_none() {
            warn!("Admin route called but no admin token is configured");
            return Outcome::Error((Status::Forbidden, AuthError::AdminDisabled));
        }

        match req.headers().get_one(ADMIN_TOKEN_HEADER) {
            Some(presented) if key.accepts(presented.trim()) => Outcome::Success(AdminAccess),
            Some(_) => {
                warn!("Rejected admin call with a wrong token");
                Outcome::Error((Status::Unauthorized, AuthError::InvalidAdminToken))
            }
            None => Outcome::Error((Status::Unauthorized, AuthError::MissingToken)),
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account() -> (User, Company) {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "recruiter@acme.io".to_string(),
            password_hash: String::new(),
            full_name: "Ada Recruiter".to_string(),
            role: "recruiter".to_string(),
            created_at: now,
            updated_at: now,
        };
        let company = Company {
            id: 3,
            owner_id: 7,
            name: "Acme".to_string(),
            website: None,
            location: "Paris".to_string(),
            size: "1-10".to_string(),
            industry: None,
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        (user, company)
    }

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key_long_enough", 24);
        let (user, company) = account();

        let token = service.create_token(&user, &company).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.company_id, 3);
        assert_eq!(claims.email, "recruiter@acme.io");
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let (user, company) = account();
        let token = JwtService::new("first_secret_key_long", 24)
            .create_token(&user, &company)
            .unwrap();

        assert!(JwtService::new("second_secret_key_long", 24)
            .verify_token(&token)
            .is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new("test_secret_key_long_enough", -2);
        let (user, company) = account();

        let token = service.create_token(&user, &company).unwrap();
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_admin_key_matches_exact_token() {
        let key = AdminKey::new(Some("ops-secret".to_string()));
        assert!(key.accepts("ops-secret"));
        assert!(!key.accepts("ops-secret2"));
        assert!(!key.accepts(""));

        let closed = AdminKey::new(Some("   ".to_string()));
        assert!(!closed.accepts("   "));
        assert!(!AdminKey::new(None).accepts("anything"));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert_ne!(hash, "correct horse battery");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
