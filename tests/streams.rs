mod common;

use common::*;

use rocket::http::{ContentType, Status};
use rocket::tokio::io::{AsyncRead, AsyncReadExt};
use rocket::tokio::time::{timeout, Duration};
use serde_json::json;

/// Read server-sent frames until `needle` shows up, returning everything read.
async fn read_until<R: AsyncRead + Unpin>(reader: &mut R, needle: &str) -> String {
    let mut seen = String::new();
    let mut chunk = [0u8; 4096];
    while !seen.contains(needle) {
        let n = timeout(Duration::from_secs(5), reader.read(&mut chunk))
            .await
            .expect("event within five seconds")
            .expect("readable stream");
        assert!(n > 0, "stream ended before {:?}, got: {}", needle, seen);
        seen.push_str(&String::from_utf8_lossy(&chunk[..n]));
    }
    seen
}

#[rocket::async_test]
async fn match_stream_pushes_board_then_recomputes_on_candidate_swipe() {
    let client = client().await;
    let (token, _) = signup(&client, "jane@acme.test", "Acme").await;
    let job_id = create_job(&client, &token, "Rust Engineer").await;
    let candidate_id = seed_candidate(&client, "Alice").await;
    company_likes(&client, &token, candidate_id).await;

    let response = client
        .get("/api/matches/stream")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let mut stream = Box::pin(response);

    // The first board goes out before any write, so it never competes for the pool.
    let initial = read_until(&mut stream, "\"awaiting\":1").await;
    assert!(initial.contains("\"matched\":0"));

    candidate_likes(&client, candidate_id, job_id).await;

    let recomputed = read_until(&mut stream, "\"matched\":1").await;
    assert!(recomputed.contains("\"awaiting\":0"));
    assert!(recomputed.contains(&format!("\"id\":{}", job_id)));
}

#[rocket::async_test]
async fn match_stream_ignores_other_companies() {
    let client = client().await;
    let (acme, _) = signup(&client, "jane@acme.test", "Acme").await;
    let (globex, _) = signup(&client, "hank@globex.test", "Globex").await;
    let globex_job = create_job(&client, &globex, "Go Engineer").await;
    let candidate_id = seed_candidate(&client, "Alice").await;
    company_likes(&client, &acme, candidate_id).await;

    let response = client
        .get("/api/matches/stream")
        .header(bearer(&acme))
        .dispatch()
        .await;
    let mut stream = Box::pin(response);
    read_until(&mut stream, "\"awaiting\":1").await;

    // Interest in Globex's posting does not concern Acme's board.
    candidate_likes(&client, candidate_id, globex_job).await;
    let quiet = timeout(
        Duration::from_millis(200),
        read_until(&mut stream, "\"matched\":1"),
    )
    .await;
    assert!(quiet.is_err());
}

#[rocket::async_test]
async fn conversation_stream_delivers_sent_messages() {
    let client = client().await;
    let (token, _) = signup(&client, "jane@acme.test", "Acme").await;
    let job_id = create_job(&client, &token, "Rust Engineer").await;
    let candidate_id = seed_candidate(&client, "Alice").await;
    company_likes(&client, &token, candidate_id).await;
    candidate_likes(&client, candidate_id, job_id).await;
    let conversation_id = open_conversation(&client, &token, candidate_id).await;

    let response = client
        .get(format!("/api/conversations/{}/stream", conversation_id))
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let mut stream = Box::pin(response);

    let sent = client
        .post(format!("/api/conversations/{}/messages", conversation_id))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "content": "  Welcome aboard  " }).to_string())
        .dispatch()
        .await;
    assert_eq!(sent.status(), Status::Ok);

    let frame = read_until(&mut stream, "Welcome aboard").await;
    assert!(frame.contains(&format!("\"conversation_id\":{}", conversation_id)));
    assert!(!frame.contains("  Welcome aboard  "));
}

#[rocket::async_test]
async fn conversation_stream_of_another_company_is_not_found() {
    let client = client().await;
    let (acme, _) = signup(&client, "jane@acme.test", "Acme").await;
    let (globex, _) = signup(&client, "hank@globex.test", "Globex").await;
    let job_id = create_job(&client, &acme, "Rust Engineer").await;
    let candidate_id = seed_candidate(&client, "Alice").await;
    company_likes(&client, &acme, candidate_id).await;
    candidate_likes(&client, candidate_id, job_id).await;
    let conversation_id = open_conversation(&client, &acme, candidate_id).await;

    let response = client
        .get(format!("/api/conversations/{}/stream", conversation_id))
        .header(bearer(&globex))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .get("/api/conversations/9999/stream")
        .header(bearer(&acme))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn job_stream_only_carries_own_postings() {
    let client = client().await;
    let (acme, _) = signup(&client, "jane@acme.test", "Acme").await;
    let (globex, _) = signup(&client, "hank@globex.test", "Globex").await;

    let response = client
        .get("/api/jobs/stream")
        .header(bearer(&acme))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let mut stream = Box::pin(response);

    create_job(&client, &globex, "Go Engineer").await;
    create_job(&client, &acme, "Data Engineer").await;

    let frames = read_until(&mut stream, "Data Engineer").await;
    assert!(frames.contains("\"INSERT\""));
    assert!(!frames.contains("Go Engineer"));
}

#[rocket::async_test]
async fn streams_require_a_token() {
    let client = client().await;

    for path in ["/api/matches/stream", "/api/jobs/stream", "/api/conversations/1/stream"] {
        let response = client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized, "{}", path);
    }
}
