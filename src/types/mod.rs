// src/types/mod.rs
//! Rows and payloads of the recruiting domain

pub mod account;
pub mod candidate;
pub mod conversation;
pub mod job;
pub mod matching;
pub mod settings;
pub mod swipe;

pub use account::*;
pub use candidate::*;
pub use conversation::*;
pub use job::*;
pub use matching::*;
pub use settings::*;
pub use swipe::*;
