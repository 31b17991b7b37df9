// src/repository/users.rs
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::HireResult;
use crate::types::User;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordReset {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> HireResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> HireResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn update_full_name(&self, id: i64, full_name: &str) -> HireResult<bool> {
        let result = sqlx::query("UPDATE users SET full_name = ?, updated_at = ? WHERE id = ?")
            .bind(full_name)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password_hash(&self, id: i64, password_hash: &str) -> HireResult<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_reset(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> HireResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_resets (token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_reset(&self, token: &str) -> HireResult<Option<PasswordReset>> {
        let reset =
            sqlx::query_as::<_, PasswordReset>("SELECT * FROM password_resets WHERE token = ?")
                .bind(token)
                .fetch_optional(self.pool)
                .await?;
        Ok(reset)
    }

    /// Marks a reset token as consumed. False if it was already used.
    pub async fn consume_reset(&self, token: &str) -> HireResult<bool> {
        let result = sqlx::query(
            "UPDATE password_resets SET used_at = ? WHERE token = ? AND used_at IS NULL",
        )
        .bind(Utc::now())
        .bind(token)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
