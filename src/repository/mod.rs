// src/repository/mod.rs
//! SQL access, one repository per aggregate. Repositories borrow the pool
//! and hold no state of their own.

pub mod candidates;
pub mod companies;
pub mod conversations;
pub mod jobs;
pub mod settings;
pub mod swipes;
pub mod users;

pub use candidates::{CandidateRepository, MAX_DECK_SIZE};
pub use companies::CompanyRepository;
pub use conversations::ConversationRepository;
pub use jobs::JobRepository;
pub use settings::SettingsRepository;
pub use swipes::SwipeRepository;
pub use users::{PasswordReset, UserRepository};
