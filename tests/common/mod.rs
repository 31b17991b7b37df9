#![allow(dead_code)]

use hireflow::auth::{AdminKey, JwtService, ADMIN_TOKEN_HEADER};
use hireflow::repository::CandidateRepository;
use hireflow::types::NewCandidate;
use hireflow::{build_rocket, ChangeFeed, Database};

use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

pub const ADMIN_TOKEN: &str = "integration-admin-token";

pub async fn client_with(admin: AdminKey) -> Client {
    let db = Database::in_memory().await.expect("in-memory database");
    let jwt = JwtService::new("integration-secret", 1);
    Client::tracked(build_rocket(db, jwt, ChangeFeed::new(), admin))
        .await
        .expect("valid rocket instance")
}

pub async fn client() -> Client {
    client_with(AdminKey::new(Some(ADMIN_TOKEN.to_string()))).await
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token))
}

pub fn admin(token: &str) -> Header<'static> {
    Header::new(ADMIN_TOKEN_HEADER, token.to_string())
}

pub async fn signup(client: &Client, email: &str, company: &str) -> (String, i64) {
    let response = client
        .post("/api/auth/signup")
        .header(ContentType::JSON)
        .body(
            json!({
                "email": email,
                "password": "correct-horse",
                "full_name": "Jane Recruiter",
                "company": { "name": company, "location": "Paris" }
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.expect("json body");
    let token = body["data"]["token"].as_str().expect("token").to_string();
    let company_id = body["data"]["company"]["id"].as_i64().expect("company id");
    (token, company_id)
}

pub async fn create_job(client: &Client, token: &str, title: &str) -> i64 {
    let response = client
        .post("/api/jobs")
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(
            json!({
                "title": title,
                "description": "Build the matching pipeline",
                "location": "Lyon",
                "salary_min": 50000,
                "salary_max": 65000,
                "required_skills": ["Rust", "SQL"]
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.expect("json body");
    body["data"]["id"].as_i64().expect("job id")
}

pub async fn seed_candidate(client: &Client, first_name: &str) -> i64 {
    let db = client.rocket().state::<Database>().expect("managed database");
    let candidate = NewCandidate {
        first_name: first_name.to_string(),
        last_name: "Martin".to_string(),
        email: None,
        headline: Some("Backend engineer".to_string()),
        location: None,
        bio: None,
        avatar_url: None,
        skills: "Rust, SQL".to_string(),
        experience_years: Some(4),
        seniority: None,
    };
    CandidateRepository::new(db.pool())
        .create(&candidate)
        .await
        .expect("candidate created")
        .id
}

pub async fn company_likes(client: &Client, token: &str, candidate_id: i64) {
    let response = client
        .post(format!("/api/candidates/{}/swipe", candidate_id))
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(json!({ "direction": "right" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

/// Relay a candidate's right swipe the way the admin CLI does.
pub async fn candidate_likes(client: &Client, candidate_id: i64, job_id: i64) {
    let response = client
        .post("/api/candidate-swipes")
        .header(ContentType::JSON)
        .header(admin(ADMIN_TOKEN))
        .body(
            json!({ "candidate_id": candidate_id, "job_id": job_id, "direction": "right" })
                .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

pub async fn open_conversation(client: &Client, token: &str, candidate_id: i64) -> i64 {
    let response = client
        .post("/api/conversations")
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(json!({ "candidate_id": candidate_id }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().await.expect("json body");
    body["data"]["id"].as_i64().expect("conversation id")
}
