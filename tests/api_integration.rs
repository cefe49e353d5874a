use std::sync::Arc;

use applypilot::config::AppConfig;
use applypilot::server::{build_router, build_state};
use axum::http::{StatusCode, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};

fn server(demo_data: bool) -> TestServer {
    let mut config = AppConfig::load_from_args(["applypilot"]).expect("default config");
    config.seed.demo_data = demo_data;
    config.resilience.rate_limit_enabled = false;
    let state = build_state(Arc::new(config), None).expect("state");
    TestServer::new(build_router(state)).expect("test server")
}

async fn register(server: &TestServer, username: &str) -> String {
    server
        .post("/api/accounts/register/")
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "s3cret-pass",
            "first_name": "Asha",
            "last_name": "Rao",
            "college": "IIT Madras",
            "graduation_year": 2025
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let token: Value = server
        .post("/api/accounts/token/")
        .json(&json!({ "username": username, "password": "s3cret-pass" }))
        .await
        .json();
    token["access"].as_str().expect("access token").to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server(true);
    let body: Value = server.get("/healthz").await.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["accounts"], 1);
}

#[tokio::test]
async fn register_login_and_read_profile() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let response = server
        .get("/api/accounts/profile/")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "asha");
    assert!(body.get("password_hash").is_none());
    assert!(body["profile"]["education"].is_array());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let server = server(false);
    register(&server, "asha").await;

    server
        .post("/api/accounts/register/")
        .json(&json!({
            "username": "ASHA",
            "email": "other@example.com",
            "password": "another-pass",
            "first_name": "A",
            "last_name": "R"
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let server = server(false);
    register(&server, "asha").await;

    server
        .post("/api/accounts/token/")
        .json(&json!({ "username": "asha", "password": "nope-nope" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let server = server(true);
    server
        .get("/api/jobs/my-applications/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/automation/sessions/")
        .authorization_bearer("not-a-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_job_board_lists_listings_and_companies() {
    let server = server(true);

    let listings: Vec<Value> = server.get("/api/jobs/listings/").await.json();
    assert!(!listings.is_empty());
    assert!(listings.iter().all(|l| l["is_active"] == true));

    let first = listings[0]["id"].as_u64().expect("listing id");
    let detail: Value = server.get(&format!("/api/jobs/listings/{first}/")).await.json();
    assert_eq!(detail["id"], first);
    assert!(detail["company"]["name"].is_string());

    server
        .get("/api/jobs/listings/999999/")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let companies: Vec<Value> = server.get("/api/jobs/companies/").await.json();
    assert!(!companies.is_empty());
}

#[tokio::test]
async fn applying_twice_conflicts() {
    let server = server(true);
    let token = register(&server, "asha").await;
    let listings: Vec<Value> = server.get("/api/jobs/listings/").await.json();
    let job = listings[0]["id"].as_u64().expect("listing id");

    let response = server
        .post("/api/jobs/applications/")
        .authorization_bearer(&token)
        .json(&json!({ "job": job, "cover_letter": "Hello" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let view: Value = response.json();
    assert_eq!(view["status"], "pending");

    server
        .post("/api/jobs/applications/")
        .authorization_bearer(&token)
        .json(&json!({ "job": job }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let mine: Vec<Value> = server
        .get("/api/jobs/my-applications/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn automation_session_lifecycle() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .post("/api/automation/sessions/start/")
        .authorization_bearer(&token)
        .json(&json!({ "platform_ids": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/automation/sessions/start/")
        .authorization_bearer(&token)
        .json(&json!({ "platform_ids": ["linkedin"] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/automation/sessions/start/")
        .authorization_bearer(&token)
        .json(&json!({ "platform_ids": ["internshala", "naukri"], "max_applications_per_day": 5 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let session: Value = response.json();
    assert_eq!(session["status"], "running");
    let id = session["id"].as_u64().expect("session id");

    let stopped: Value = server
        .post(&format!("/api/automation/sessions/{id}/stop/"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(stopped["status"], "paused");

    server
        .post(&format!("/api/automation/sessions/{id}/stop/"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::CONFLICT);

    let resumed: Value = server
        .post(&format!("/api/automation/sessions/{id}/resume/"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(resumed["status"], "running");

    server
        .get(&format!("/api/automation/sessions/{id}/stats/"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn credentials_never_expose_passwords() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let response = server
        .post("/api/automation/credentials/")
        .authorization_bearer(&token)
        .json(&json!({ "platform": "naukri", "email": "asha@example.com", "password": "hunter22" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let credential: Value = response.json();
    assert_ne!(credential["password"], "hunter22");
    let id = credential["id"].as_str().expect("credential id").to_string();

    server
        .post("/api/automation/credentials/")
        .authorization_bearer(&token)
        .json(&json!({ "platform": "naukri", "email": "asha@example.com", "password": "again" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let toggled: Value = server
        .post(&format!("/api/automation/credentials/{id}/toggle/"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(toggled["is_active"], false);

    server
        .post(&format!("/api/automation/credentials/{id}/test/"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let listed = server
        .get("/api/automation/credentials/")
        .authorization_bearer(&token)
        .await
        .text();
    assert!(!listed.contains("hunter22"));

    server
        .delete(&format!("/api/automation/credentials/{id}/"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn profile_sections_are_editable() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let response = server
        .post("/api/profile/education/")
        .authorization_bearer(&token)
        .json(&json!({ "institution": "IIT Madras", "degree": "btech", "field_of_study": "CSE" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let record: Value = response.json();
    let id = record["id"].as_str().expect("record id").to_string();
    assert_eq!(record["institution"], "IIT Madras");

    let updated: Value = server
        .patch(&format!("/api/profile/education/{id}/"))
        .authorization_bearer(&token)
        .json(&json!({ "field": "degree", "value": "mtech" }))
        .await
        .json();
    assert_eq!(updated["degree"], "mtech");

    let listed: Vec<Value> = server
        .get("/api/profile/education/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listed.len(), 1);

    server
        .delete(&format!("/api/profile/education/{id}/"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/profile/hobbies/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn skills_are_deduplicated_by_name() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .post("/api/profile/skills/")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Rust", "level": "advanced" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/profile/skills/")
        .authorization_bearer(&token)
        .json(&json!({ "name": "rust" }))
        .await
        .assert_status_ok();

    let skills: Vec<Value> = server
        .get("/api/profile/skills/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(skills.len(), 1);
}

#[tokio::test]
async fn password_change_requires_matching_confirmation() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .post("/api/accounts/password/")
        .authorization_bearer(&token)
        .json(&json!({
            "current_password": "s3cret-pass",
            "new_password": "brand-new-pass",
            "confirm_password": "different-pass"
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/accounts/password/")
        .authorization_bearer(&token)
        .json(&json!({
            "current_password": "s3cret-pass",
            "new_password": "brand-new-pass",
            "confirm_password": "brand-new-pass"
        }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/api/accounts/token/")
        .json(&json!({ "username": "asha", "password": "brand-new-pass" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn export_as_yaml_is_an_attachment() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let response = server
        .get("/api/accounts/export/")
        .add_query_param("format", "yaml")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let disposition = response.header(header::CONTENT_DISPOSITION);
    assert!(disposition.to_str().unwrap_or_default().contains(".yaml"));
    assert!(response.text().contains("username: asha"));
}

#[tokio::test]
async fn deleting_the_account_removes_it() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .delete("/api/accounts/profile/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/api/accounts/token/")
        .json(&json!({ "username": "asha", "password": "s3cret-pass" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tokens_of_deleted_accounts_are_rejected() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .delete("/api/accounts/profile/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post("/api/automation/sessions/start/")
        .authorization_bearer(&token)
        .json(&json!({ "platform_ids": ["internshala"] }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .post("/api/automation/credentials/")
        .authorization_bearer(&token)
        .json(&json!({ "platform": "naukri", "email": "asha@example.com", "password": "hunter22" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/automation/sessions/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

fn profile_with_education(education: Vec<Value>) -> Value {
    json!({
        "profile": {
            "education": education,
            "preferences": {
                "preferred_roles": "Backend Developer",
                "preferred_locations": "Remote"
            }
        }
    })
}

#[tokio::test]
async fn patched_profile_records_keep_distinct_ids() {
    let server = server(false);
    let token = register(&server, "asha").await;
    let record = |institution: &str| {
        json!({
            "id": "5",
            "institution": institution,
            "degree": "btech",
            "field_of_study": "CSE",
            "start_year": 2021,
            "end_year": 2025
        })
    };

    server
        .patch("/api/accounts/profile/")
        .authorization_bearer(&token)
        .json(&profile_with_education(vec![record("A"), record("B")]))
        .await
        .assert_status_ok();

    server
        .delete("/api/profile/education/5/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let listed: Vec<Value> = server
        .get("/api/profile/education/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["institution"], "B");
    assert_ne!(listed[0]["id"], "5");
}

#[tokio::test]
async fn largest_record_id_does_not_break_adding() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .patch("/api/accounts/profile/")
        .authorization_bearer(&token)
        .json(&profile_with_education(vec![json!({
            "id": u64::MAX.to_string(),
            "institution": "Edge",
            "field_of_study": "CSE",
            "start_year": 2021,
            "end_year": 2025
        })]))
        .await
        .assert_status_ok();

    server
        .post("/api/profile/education/")
        .authorization_bearer(&token)
        .json(&json!({ "institution": "Next" }))
        .await
        .assert_status(StatusCode::CREATED);

    let listed: Vec<Value> = server
        .get("/api/profile/education/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(listed.len(), 2);
    assert_ne!(listed[0]["id"], listed[1]["id"]);
}

fn resume_form(name: &str, mime: &str, bytes: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part("resume", Part::bytes(bytes).file_name(name).mime_type(mime))
}

#[tokio::test]
async fn resume_upload_download_and_remove() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let uploaded = server
        .post("/api/accounts/resume/")
        .authorization_bearer(&token)
        .multipart(resume_form("Asha_Rao.pdf", "application/pdf", b"%PDF-1.7 resume"))
        .await;
    uploaded.assert_status(StatusCode::CREATED);
    let info: Value = uploaded.json();
    assert_eq!(info["filename"], "Asha_Rao.pdf");
    assert_eq!(info["size_bytes"], 15);

    let download = server.get("/api/accounts/resume/").authorization_bearer(&token).await;
    download.assert_status_ok();
    assert_eq!(download.header(header::CONTENT_TYPE), "application/pdf");
    assert_eq!(download.as_bytes().as_ref(), b"%PDF-1.7 resume");
    assert!(
        download
            .header(header::CONTENT_DISPOSITION)
            .to_str()
            .unwrap()
            .contains("Asha_Rao.pdf")
    );

    let export: Value = server.get("/api/accounts/export/").authorization_bearer(&token).await.json();
    assert_eq!(export["resume"]["filename"], "Asha_Rao.pdf");

    server
        .delete("/api/accounts/resume/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get("/api/accounts/resume/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resume_must_be_a_document() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let image = server
        .post("/api/accounts/resume/")
        .authorization_bearer(&token)
        .multipart(resume_form("photo.png", "image/png", b"\x89PNG"))
        .await;
    image.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = image.json();
    assert_eq!(body["fields"][0]["field"], "resume");

    let wrong_field = server
        .post("/api/accounts/resume/")
        .authorization_bearer(&token)
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;
    wrong_field.assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/accounts/resume/")
        .multipart(resume_form("cv.pdf", "application/pdf", b"%PDF"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn import_restores_an_edited_export() {
    let server = server(false);
    let token = register(&server, "asha").await;

    let mut export: Value = server.get("/api/accounts/export/").authorization_bearer(&token).await.json();
    export["profile"]["personal"]["location"] = json!("Pune");
    export["profile"]["preferences"]["preferred_roles"] = json!("Backend Developer");
    export["profile"]["preferences"]["preferred_locations"] = json!("Remote");
    export["notifications"]["frequency"]["weekly_report_day"] = json!("friday");

    let summary: Value = server
        .post("/api/accounts/import/")
        .authorization_bearer(&token)
        .json(&export)
        .await
        .json();
    assert_eq!(summary, json!({ "profile": true, "notifications": true }));

    let me: Value = server.get("/api/accounts/profile/").authorization_bearer(&token).await.json();
    assert_eq!(me["profile"]["personal"]["location"], "Pune");
    let settings: Value = server
        .get("/api/accounts/notifications/")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(settings["frequency"]["weekly_report_day"], "friday");
}

#[tokio::test]
async fn invalid_imports_change_nothing() {
    let server = server(false);
    let token = register(&server, "asha").await;

    server
        .post("/api/accounts/import/")
        .authorization_bearer(&token)
        .json(&json!({ "applications": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let rejected = server
        .post("/api/accounts/import/")
        .authorization_bearer(&token)
        .json(&json!({
            "profile": {"personal": {"location": "Pune"}},
            "notifications": {"frequency": {"daily_summary_time": "25:99"}}
        }))
        .await;
    rejected.assert_status(StatusCode::BAD_REQUEST);

    let me: Value = server.get("/api/accounts/profile/").authorization_bearer(&token).await.json();
    assert_eq!(me["profile"]["personal"]["location"], "");
}
