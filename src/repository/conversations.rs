// src/repository/conversations.rs
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{is_unique_violation, HireResult};
use crate::types::{Conversation, ConversationSummary, Message, Sender};

pub struct ConversationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ConversationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_for_pair(
        &self,
        company_id: i64,
        candidate_id: i64,
    ) -> HireResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE company_id = ? AND candidate_id = ?",
        )
        .bind(company_id)
        .bind(candidate_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(conversation)
    }

    pub async fn find_owned(&self, id: i64, company_id: i64) -> HireResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE id = ? AND company_id = ?",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(conversation)
    }

    /// Create the pair's thread. Returns `(conversation, created)`; a concurrent
    /// open that lost the race gets the existing row back.
    pub async fn create(
        &self,
        company_id: i64,
        candidate_id: i64,
        job_id: Option<i64>,
    ) -> HireResult<(Conversation, bool)> {
        let inserted = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (company_id, candidate_id, job_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(candidate_id)
        .bind(job_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(conversation) => Ok((conversation, true)),
            Err(e) if is_unique_violation(&e) => {
                let existing = sqlx::query_as::<_, Conversation>(
                    "SELECT * FROM conversations WHERE company_id = ? AND candidate_id = ?",
                )
                .bind(company_id)
                .bind(candidate_id)
                .fetch_one(self.pool)
                .await?;
                Ok((existing, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Chat list rows, most recent activity first. Threads without messages sort last.
    pub async fn list_for_company(&self, company_id: i64) -> HireResult<Vec<ConversationSummary>> {
        let rows = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT cv.id, cv.candidate_id, c.first_name, c.last_name, c.headline, c.avatar_url,
                   cv.job_id, j.title AS job_title, cv.last_message, cv.last_message_at
            FROM conversations cv
            JOIN candidates c ON c.id = cv.candidate_id
            LEFT JOIN jobs j ON j.id = cv.job_id
            WHERE cv.company_id = ?
            ORDER BY cv.last_message_at IS NULL, cv.last_message_at DESC,
                     cv.created_at DESC, cv.id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Store a message and move the thread's preview to it in one transaction.
    /// Either both writes land or neither does.
    pub async fn append_message(
        &self,
        conversation_id: i64,
        sender: Sender,
        content: &str,
        sent_at: DateTime<Utc>,
    ) -> HireResult<(Message, Option<Conversation>)> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_type, sender_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender.kind)
        .bind(sender.id)
        .bind(content)
        .bind(sent_at)
        .fetch_one(&mut *tx)
        .await?;

        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            UPDATE conversations SET last_message = ?, last_message_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(sent_at)
        .bind(conversation_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((message, conversation))
    }

    /// Full history in send order.
    pub async fn messages(&self, conversation_id: i64) -> HireResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(self.pool)
        .await?;
        Ok(messages)
    }
}
