// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEV_JWT_SECRET: &str = "hireflow-local-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret for the admin routes. Those routes are closed when unset.
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/hireflow.db"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            port: default_port(),
            admin_token: None,
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        let config = if config_path.exists() {
            Self::load_from_file(&config_path, &environment)?
        } else if environment == "production" {
            anyhow::bail!(
                "config.yaml not found in current directory. \
                 Production cannot start without configuration."
            );
        } else {
            warn!("config.yaml not found, using local defaults");
            Self::default()
        };

        let config = config.with_env_overrides()?;
        Ok(Self {
            database_path: Self::resolve_path(&config.database_path)?,
            ..config
        })
    }

    pub fn get_environment() -> String {
        std::env::var("HIREFLOW_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&config_content, environment)
    }

    /// Pick the section for `environment` out of a YAML document
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(path) = std::env::var("HIREFLOW_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Ok(secret) = std::env::var("HIREFLOW_JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Ok(port) = std::env::var("ROCKET_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        if let Ok(token) = std::env::var("HIREFLOW_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
        self.admin_token = self.admin_token.filter(|token| !token.trim().is_empty());
        if self.jwt_secret.len() < 16 {
            anyhow::bail!("jwt_secret must be at least 16 characters");
        }
        Ok(self)
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create database directory: {}",
                        db_parent.display()
                    )
                })?;
        }
        Ok(())
    }
}
