// src/cli.rs
use crate::auth::ADMIN_TOKEN_HEADER;
use crate::core::database::Database;
use crate::environment::EnvironmentConfig;
use crate::realtime::ChangeFeed;
use crate::repository::{CandidateRepository, CompanyRepository};
use crate::services::CandidateService;
use crate::types::{
    CandidateSwipeReceipt, CandidateSwipeRequest, Direction, NewCandidate, SwipeOutcome,
};
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "hireflow")]
#[command(about = "Swipe-to-hire recruiting backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Overrides the database path from config.yaml
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create the database and its tables
    Init,
    /// Import candidate profiles from a CSV file
    ImportCandidates { csv_file: PathBuf },
    /// Record a candidate's swipe on a job posting, through the running server
    CandidateSwipe {
        candidate_id: i64,
        job_id: i64,
        #[arg(long, default_value = "right")]
        direction: Direction,
        /// Base URL of the API (defaults to the configured local port)
        #[arg(long)]
        server: Option<String>,
    },
    /// Hide a candidate from every deck
    DeactivateCandidate { candidate_id: i64 },
    /// List registered companies
    ListCompanies,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let mut config = EnvironmentConfig::load()?;
    if let Some(path) = cli.database_path {
        config.database_path = path;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,
        command => run_admin(command, &config).await,
    }
}

async fn run_admin(command: Command, config: &EnvironmentConfig) -> Result<()> {
    let db = Database::new(&config.database_path).await?;
    let pool = db.pool();

    match command {
        Command::Serve => anyhow::bail!("serve is not an admin command"),

        Command::Init => {
            info!(
                "Database initialized at: {}",
                config.database_path.display()
            );
            info!("Usage:");
            info!("  hireflow import-candidates <file.csv>       # Seed the deck");
            info!("  hireflow candidate-swipe <candidate> <job>  # Relay a candidate's swipe");
            info!("  hireflow serve                              # Start the API");
        }

        Command::ImportCandidates { csv_file } => {
            if !csv_file.exists() {
                anyhow::bail!("CSV file not found: {}", csv_file.display());
            }
            let file = std::fs::File::open(&csv_file)
                .with_context(|| format!("Failed to open {}", csv_file.display()))?;
            let summary = import_candidates(pool, file).await?;

            info!("Import completed:");
            info!("  Imported: {}", summary.imported);
            info!("  Skipped:  {}", summary.skipped);
        }

        Command::CandidateSwipe {
            candidate_id,
            job_id,
            direction,
            server,
        } => {
            let request = CandidateSwipeRequest {
                candidate_id,
                job_id,
                direction,
            };
            let server = server.unwrap_or_else(|| format!("http://127.0.0.1:{}", config.port));
            let CandidateSwipeReceipt { outcome, swipe } = match &config.admin_token {
                Some(token) => match post_candidate_swipe(&server, token, &request).await {
                    Ok(receipt) => receipt,
                    Err(e) if is_unreachable(&e) => {
                        warn!("No server at {}, writing to the database directly", server);
                        record_candidate_swipe(pool, &request).await?
                    }
                    Err(e) => return Err(e),
                },
                None => {
                    warn!("No admin token configured, open match streams will not see this swipe");
                    record_candidate_swipe(pool, &request).await?
                }
            };
            match outcome {
                SwipeOutcome::Recorded => info!(
                    "Candidate {} swiped {} on job {}",
                    swipe.candidate_id,
                    swipe.direction.as_str(),
                    swipe.job_id
                ),
                SwipeOutcome::Duplicate => warn!(
                    "Candidate {} already swiped {} on job {}",
                    swipe.candidate_id,
                    swipe.direction.as_str(),
                    swipe.job_id
                ),
            }
        }

        Command::DeactivateCandidate { candidate_id } => {
            match CandidateRepository::new(pool)
                .set_active(candidate_id, false)
                .await
            {
                Ok(true) => info!("Candidate {} deactivated", candidate_id),
                Ok(false) => warn!("No candidate found with id {}", candidate_id),
                Err(e) => {
                    error!("Failed to deactivate candidate: {}", e);
                    return Err(e.into());
                }
            }
        }

        Command::ListCompanies => {
            let companies = CompanyRepository::new(pool).list_all().await?;
            if companies.is_empty() {
                info!("No companies registered.");
            } else {
                info!(
                    "{:<5} {:<30} {:<20} {:<10} {:<20}",
                    "ID", "Name", "Location", "Size", "Created"
                );
                info!("{}", "-".repeat(85));
                for company in companies {
                    info!(
                        "{:<5} {:<30} {:<20} {:<10} {:<20}",
                        company.id,
                        company.name,
                        company.location,
                        company.size,
                        company.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Relay a candidate swipe to the server so its change feed publishes it.
pub async fn post_candidate_swipe(
    server: &str,
    admin_token: &str,
    request: &CandidateSwipeRequest,
) -> Result<CandidateSwipeReceipt> {
    let url = format!("{}/api/candidate-swipes", server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .header(ADMIN_TOKEN_HEADER, admin_token)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let reason = response
            .json::<ErrorEnvelope>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        anyhow::bail!("Server rejected the swipe ({}): {}", status, reason);
    }

    let envelope: Envelope<CandidateSwipeReceipt> = response
        .json()
        .await
        .context("Unexpected response from the server")?;
    Ok(envelope.data)
}

/// True when no server answered at all, as opposed to a server refusing the call.
fn is_unreachable(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<reqwest::Error>()
        .is_some_and(|e| e.is_connect())
}

/// Write path for when no server is running. Nobody is subscribed then.
async fn record_candidate_swipe(
    pool: &SqlitePool,
    request: &CandidateSwipeRequest,
) -> Result<CandidateSwipeReceipt> {
    let feed = ChangeFeed::new();
    let (outcome, swipe) = CandidateService::new(pool, &feed)
        .candidate_swipe(request.candidate_id, request.job_id, request.direction)
        .await?;
    Ok(CandidateSwipeReceipt { outcome, swipe })
}

/// Read candidate rows from CSV. Bad rows are logged and skipped.
pub async fn import_candidates<R: Read>(pool: &SqlitePool, reader: R) -> Result<ImportSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let candidates = CandidateRepository::new(pool);
    let mut summary = ImportSummary::default();

    for (line, result) in reader.deserialize::<NewCandidate>().enumerate() {
        let row = line + 2;
        let candidate = match result {
            Ok(candidate) => candidate,
            Err(e) => {
                summary.skipped += 1;
                warn!("Row {}: CSV parsing error: {}", row, e);
                continue;
            }
        };

        match candidates.create(&candidate).await {
            Ok(created) => {
                summary.imported += 1;
                info!("Added: {} (id {})", created.full_name(), created.id);
            }
            Err(e) => {
                summary.skipped += 1;
                warn!("Row {}: skipped: {}", row, e);
            }
        }
    }

    Ok(summary)
}
