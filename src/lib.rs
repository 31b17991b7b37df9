pub mod auth;
pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod realtime;
pub mod repository;
pub mod services;
pub mod types;
pub mod utils;
pub mod web;

pub use core::database::Database;
pub use error::{HireError, HireResult};
pub use realtime::ChangeFeed;
pub use web::{build_rocket, start_web_server};
