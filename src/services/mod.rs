// src/services/mod.rs
pub mod accounts;
pub mod candidates;
pub mod chat;
pub mod dashboard;
pub mod jobs;
pub mod match_detector;

#[cfg(test)]
pub(crate) mod fixtures;

pub use accounts::AccountService;
pub use candidates::CandidateService;
pub use chat::ChatService;
pub use dashboard::DashboardStats;
pub use jobs::JobService;
pub use match_detector::{watch_signals, MatchDetector};
