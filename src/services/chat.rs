// src/services/chat.rs
//! Conversations between a company and a matched candidate.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{HireError, HireResult};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeFilter, ChangeKind, Subscription, Table};
use crate::repository::{CandidateRepository, ConversationRepository};
use crate::services::MatchDetector;
use crate::types::{Conversation, ConversationSummary, Message, Sender};
use crate::utils::matches_search;

pub struct ChatService<'a> {
    pool: &'a SqlitePool,
    feed: &'a ChangeFeed,
}

impl<'a> ChatService<'a> {
    pub fn new(pool: &'a SqlitePool, feed: &'a ChangeFeed) -> Self {
        Self { pool, feed }
    }

    /// Existing thread for the pair, or a new one if they currently match.
    pub async fn open(&self, company_id: i64, candidate_id: i64) -> HireResult<Conversation> {
        let conversations = ConversationRepository::new(self.pool);
        if let Some(existing) = conversations.find_for_pair(company_id, candidate_id).await? {
            return Ok(existing);
        }

        CandidateRepository::new(self.pool)
            .find(candidate_id)
            .await?
            .ok_or(HireError::NotFound("Candidate"))?;

        let matched_job = MatchDetector::new(self.pool)
            .match_for(company_id, candidate_id)
            .await?
            .ok_or(HireError::NotMatched)?;

        let (conversation, created) = conversations
            .create(company_id, candidate_id, Some(matched_job.id))
            .await?;

        if created {
            info!(
                "Conversation {} opened between company {} and candidate {}",
                conversation.id, company_id, candidate_id
            );
            self.feed.publish(
                ChangeEvent::new(Table::Conversations, ChangeKind::Insert, &conversation)
                    .key("company_id", company_id)
                    .key("candidate_id", candidate_id),
            );
        }

        Ok(conversation)
    }

    /// A conversation the company takes part in.
    pub async fn get_owned(
        &self,
        conversation_id: i64,
        company_id: i64,
    ) -> HireResult<Conversation> {
        ConversationRepository::new(self.pool)
            .find_owned(conversation_id, company_id)
            .await?
            .ok_or(HireError::NotFound("Conversation"))
    }

    /// Append a message and bump the thread's preview.
    pub async fn send(
        &self,
        conversation: &Conversation,
        sender: Sender,
        content: &str,
    ) -> HireResult<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(HireError::validation("Message content cannot be empty"));
        }

        let (message, updated) = ConversationRepository::new(self.pool)
            .append_message(conversation.id, sender, content, Utc::now())
            .await?;

        self.feed.publish(
            ChangeEvent::new(Table::Messages, ChangeKind::Insert, &message)
                .key("conversation_id", conversation.id),
        );
        if let Some(updated) = updated {
            self.feed.publish(
                ChangeEvent::new(Table::Conversations, ChangeKind::Update, &updated)
                    .key("company_id", updated.company_id)
                    .key("candidate_id", updated.candidate_id),
            );
        }

        Ok(message)
    }

    pub async fn send_as_company(
        &self,
        conversation_id: i64,
        company_id: i64,
        content: &str,
    ) -> HireResult<Message> {
        let conversation = self.get_owned(conversation_id, company_id).await?;
        self.send(&conversation, Sender::company(company_id), content)
            .await
    }

    pub async fn history(&self, conversation_id: i64, company_id: i64) -> HireResult<Vec<Message>> {
        let conversation = self.get_owned(conversation_id, company_id).await?;
        ConversationRepository::new(self.pool)
            .messages(conversation.id)
            .await
    }

    /// The company's threads, optionally narrowed by candidate name or job title.
    pub async fn list(
        &self,
        company_id: i64,
        search: Option<&str>,
    ) -> HireResult<Vec<ConversationSummary>> {
        let rows = ConversationRepository::new(self.pool)
            .list_for_company(company_id)
            .await?;

        Ok(match search {
            Some(query) => rows
                .into_iter()
                .filter(|row| {
                    let full_name = format!("{} {}", row.first_name, row.last_name);
                    matches_search(
                        query,
                        &[Some(full_name.as_str()), row.job_title.as_deref()],
                    )
                })
                .collect(),
            None => rows,
        })
    }

    /// New messages of one conversation, as they are sent.
    pub fn subscribe(&self, conversation_id: i64) -> Subscription {
        self.feed.subscribe([ChangeFilter::table(Table::Messages)
            .kind(ChangeKind::Insert)
            .eq("conversation_id", conversation_id)])
    }
}
