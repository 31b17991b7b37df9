// src/repository/settings.rs
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::HireResult;
use crate::types::{Theme, UserSettings};

pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored settings, or the defaults when the user never saved any.
    pub async fn get_or_default(&self, user_id: i64) -> HireResult<UserSettings> {
        let stored =
            sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(stored.unwrap_or_else(|| UserSettings {
            user_id,
            notifications: true,
            email_alerts: true,
            theme: Theme::Light,
            updated_at: Utc::now(),
        }))
    }

    pub async fn save(&self, settings: &UserSettings) -> HireResult<UserSettings> {
        let saved = sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings (user_id, notifications, email_alerts, theme, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                notifications = excluded.notifications,
                email_alerts = excluded.email_alerts,
                theme = excluded.theme,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(settings.user_id)
        .bind(settings.notifications)
        .bind(settings.email_alerts)
        .bind(settings.theme)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;
        Ok(saved)
    }
}
