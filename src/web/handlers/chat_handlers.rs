// src/web/handlers/chat_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::core::database::Database;
use crate::realtime::ChangeFeed;
use crate::services::ChatService;
use crate::types::{
    Conversation, ConversationSummary, Message, OpenConversationRequest, SendMessageRequest,
};
use crate::web::types::{ApiResult, DataResponse};

use rocket::serde::json::Json;
use rocket::State;

pub async fn list_conversations_handler(
    q: Option<String>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<ConversationSummary>>> {
    let conversations = ChatService::new(db.pool(), feed)
        .list(auth.company_id(), q.as_deref())
        .await?;

    Ok(Json(DataResponse::success(
        format!("{} conversation(s)", conversations.len()),
        conversations,
    )))
}

pub async fn open_conversation_handler(
    request: Json<OpenConversationRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Conversation>> {
    let conversation = ChatService::new(db.pool(), feed)
        .open(auth.company_id(), request.candidate_id)
        .await?;

    Ok(Json(DataResponse::success("Conversation ready", conversation)))
}

pub async fn history_handler(
    id: i64,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Vec<Message>>> {
    let messages = ChatService::new(db.pool(), feed)
        .history(id, auth.company_id())
        .await?;

    Ok(Json(DataResponse::success(
        format!("{} message(s)", messages.len()),
        messages,
    )))
}

pub async fn send_message_handler(
    id: i64,
    request: Json<SendMessageRequest>,
    auth: AuthenticatedUser,
    db: &State<Database>,
    feed: &State<ChangeFeed>,
) -> ApiResult<DataResponse<Message>> {
    let message = ChatService::new(db.pool(), feed)
        .send_as_company(id, auth.company_id(), &request.content)
        .await?;

    Ok(Json(DataResponse::success("Message sent", message)))
}
