// src/types/conversation.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SenderType {
    Company,
    Candidate,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: i64,
    pub company_id: i64,
    pub candidate_id: i64,
    pub job_id: Option<i64>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Row of the chat list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: i64,
    pub candidate_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub headline: Option<String>,
    pub avatar_url: Option<String>,
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_type: SenderType,
    pub sender_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Who is writing: one side of a matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sender {
    pub kind: SenderType,
    pub id: i64,
}

impl Sender {
    pub fn company(id: i64) -> Self {
        Self {
            kind: SenderType::Company,
            id,
        }
    }

    pub fn candidate(id: i64) -> Self {
        Self {
            kind: SenderType::Candidate,
            id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenConversationRequest {
    pub candidate_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}
