pub mod auth_handlers;
pub mod candidate_handlers;
pub mod chat_handlers;
pub mod job_handlers;
pub mod settings_handlers;
pub mod system_handlers;

pub use auth_handlers::*;
pub use candidate_handlers::*;
pub use chat_handlers::*;
pub use job_handlers::*;
pub use settings_handlers::*;
pub use system_handlers::*;
