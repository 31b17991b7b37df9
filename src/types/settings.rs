// src/types/settings.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    pub user_id: i64,
    pub notifications: bool,
    pub email_alerts: bool,
    pub theme: Theme,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub notifications: Option<bool>,
    pub email_alerts: Option<bool>,
    pub theme: Option<Theme>,
}

impl UserSettings {
    pub fn apply(mut self, patch: SettingsPatch) -> Self {
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(email_alerts) = patch.email_alerts {
            self.email_alerts = email_alerts;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        self
    }
}
