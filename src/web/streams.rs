// src/web/streams.rs
//! Server-sent event streams fed by the change feed.

use crate::auth::AuthenticatedUser;
use crate::core::database::Database;
use crate::realtime::ChangeFeed;
use crate::services::{watch_signals, ChatService, JobService, MatchDetector};
use crate::web::types::ApiError;

use rocket::response::stream::{Event, EventStream};
use rocket::tokio::select;
use rocket::{get, Shutdown, State};
use tracing::info;

/// Every change to the company's postings.
#[get("/jobs/stream")]
pub fn job_events(
    auth: AuthenticatedUser,
    feed: &State<ChangeFeed>,
    db: &State<Database>,
    mut end: Shutdown,
) -> EventStream![] {
    let mut subscription = JobService::new(db.pool(), feed).subscribe(auth.company_id());
    info!("Job stream opened for company {}", auth.company_id());

    EventStream! {
        loop {
            let event = select! {
                event = subscription.next() => match event {
                    Some(event) => event,
                    None => break,
                },
                _ = &mut end => break,
            };
            yield Event::json(&event).event("job");
        }
    }
}

/// The match board, pushed once on connect and again after every relevant swipe.
#[get("/matches/stream")]
pub fn match_events(
    auth: AuthenticatedUser,
    feed: &State<ChangeFeed>,
    db: &State<Database>,
    mut end: Shutdown,
) -> EventStream![] {
    let company_id = auth.company_id();
    let mut subscription = watch_signals(feed, company_id);
    let db = db.inner().clone();
    info!("Match stream opened for company {}", company_id);

    EventStream! {
        let board = MatchDetector::new(db.pool()).snapshot(company_id).await;
        yield Event::json(&board).event("matches");

        loop {
            select! {
                event = subscription.next() => if event.is_none() { break },
                _ = &mut end => break,
            };
            // No delta merge: recompute the whole board.
            let board = MatchDetector::new(db.pool()).snapshot(company_id).await;
            yield Event::json(&board).event("matches");
        }
    }
}

/// New messages of one conversation. The conversation must belong to the caller.
#[get("/conversations/<id>/stream")]
pub async fn message_events(
    id: i64,
    auth: AuthenticatedUser,
    feed: &State<ChangeFeed>,
    db: &State<Database>,
    mut end: Shutdown,
) -> Result<EventStream![], ApiError> {
    let chat = ChatService::new(db.pool(), feed);
    let conversation = chat.get_owned(id, auth.company_id()).await?;
    let mut subscription = chat.subscribe(conversation.id);

    Ok(EventStream! {
        loop {
            let event = select! {
                event = subscription.next() => match event {
                    Some(event) => event,
                    None => break,
                },
                _ = &mut end => break,
            };
            yield Event::json(&event.row).event("message");
        }
    })
}
