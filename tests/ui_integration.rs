use std::sync::Arc;

use applypilot::config::AppConfig;
use applypilot::server::{build_router, build_state};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::json;

fn router(demo_data: bool) -> axum::Router {
    let mut config = AppConfig::load_from_args(["applypilot"]).expect("default config");
    config.seed.demo_data = demo_data;
    config.resilience.rate_limit_enabled = false;
    build_router(build_state(Arc::new(config), None).expect("state"))
}

fn server() -> TestServer {
    TestServer::new(router(true)).expect("test server")
}

/// Keeps the workspace and token cookies between requests.
fn browser() -> TestServer {
    TestServer::builder()
        .save_cookies()
        .build(router(true))
        .expect("test server")
}

/// A browser signed in to the seeded demo account.
async fn signed_in_demo() -> TestServer {
    let server = browser();
    server
        .post("/login")
        .form(&[("username", "demo"), ("password", "demo-password")])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    server
}

fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn pages_render_for_the_demo_account() {
    let server = server();

    let dashboard = server.get("/").await;
    dashboard.assert_status_ok();
    let html = dashboard.text();
    assert!(html.contains("Welcome back, Demo!"));
    assert!(html.contains("Demo mode"));

    for (path, marker) in [
        ("/profile", "Personal"),
        ("/automation", "Automation Control"),
        ("/analytics", "Platform Performance"),
        ("/settings", "Platform Credentials"),
        ("/settings?tab=data", "Danger Zone"),
    ] {
        let response = server.get(path).await;
        response.assert_status_ok();
        assert!(response.text().contains(marker), "{path} should mention {marker}");
    }
}

#[tokio::test]
async fn first_visit_sets_a_workspace_cookie() {
    let server = server();
    let response = server.get("/automation").await;
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("applypilot_ws=")));
}

#[tokio::test]
async fn unknown_tab_reports_inline_error() {
    let server = server();
    let response = server.get("/ui/settings/tab/billing").await;
    response.assert_status_ok();
    assert_eq!(response.header("HX-Retarget"), "#flash");
}

#[tokio::test]
async fn without_demo_data_pages_redirect_to_login() {
    let server = TestServer::new(router(false)).expect("test server");

    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");

    let fragment = server
        .get("/ui/dashboard/stats")
        .add_header(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"))
        .await;
    assert_eq!(fragment.header("HX-Redirect"), "/login");

    server.get("/login").await.assert_status_ok();
}

#[tokio::test]
async fn starting_without_platforms_shows_a_message() {
    let server = signed_in_demo().await;
    let response = server.post("/ui/automation/start").await;
    response.assert_status_ok();
    assert_eq!(response.header("HX-Retarget"), "#flash");
    assert!(response.text().contains("Please select at least one platform"));
}

#[tokio::test]
async fn coming_soon_platforms_cannot_be_selected() {
    let server = server();
    let response = server.post("/ui/automation/platforms/linkedin").await;
    assert_eq!(response.header("HX-Retarget"), "#flash");
}

#[tokio::test]
async fn selected_platforms_start_a_session() {
    let server = signed_in_demo().await;
    server.get("/automation").await.assert_status_ok();

    let selector = server.post("/ui/automation/platforms/internshala").await;
    selector.assert_status_ok();
    assert!(selector.text().contains("Selected"));

    let started = server.post("/ui/automation/start").await;
    started.assert_status_ok();
    let html = started.text();
    assert!(html.contains("Automation started on Internshala"));
    assert!(html.contains(r#"hx-swap-oob="true""#));

    // The selection is cleared once the session starts.
    let again = server.post("/ui/automation/start").await;
    assert!(again.text().contains("Please select at least one platform"));
}

#[tokio::test]
async fn login_form_sets_token_cookie() {
    let server = server();

    let failed = server
        .post("/login")
        .form(&[("username", "demo"), ("password", "wrong-password")])
        .await;
    assert_eq!(failed.header("HX-Retarget"), "#flash");

    let response = server
        .post("/login")
        .form(&[("username", "demo"), ("password", "demo-password")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("applypilot_token=")));
}

#[tokio::test]
async fn demo_visitors_cannot_change_the_password() {
    let server = server();
    let response = server
        .post("/ui/settings/password")
        .form(&[
            ("current_password", "demo-password"),
            ("new_password", "another-pass"),
            ("confirm_password", "another-pass"),
        ])
        .await;
    assert_eq!(response.header("HX-Retarget"), "#flash");
    assert!(response.text().contains("Sign in to change your password"));
}

#[tokio::test]
async fn signed_in_user_can_add_credentials_from_settings() {
    let server = browser();
    server
        .post("/register")
        .form(&[
            ("username", "asha"),
            ("email", "asha@example.com"),
            ("password", "s3cret-pass"),
            ("first_name", "Asha"),
            ("last_name", "Rao"),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let dashboard = server.get("/").await.text();
    assert!(dashboard.contains("Welcome back, Asha!"));

    let panel = server
        .post("/ui/settings/credentials")
        .form(&[("platform", "naukri"), ("login", "asha@example.com"), ("password", "hunter22")])
        .await;
    panel.assert_status_ok();
    let html = panel.text();
    assert!(html.contains("Naukri.com credentials saved"));
    assert!(!html.contains("hunter22"));
}

#[tokio::test]
async fn notification_toggles_flip_and_reject_unknown_keys() {
    let server = signed_in_demo().await;

    let panel = server.post("/ui/settings/notifications/toggle/email.weekly_report").await;
    panel.assert_status_ok();
    assert!(panel.text().contains("Weekly report"));

    let unknown = server.post("/ui/settings/notifications/toggle/sms.everything").await;
    assert_eq!(unknown.header("HX-Retarget"), "#flash");

    let bad_time = server
        .post("/ui/settings/notifications/frequency")
        .form(&[("daily_summary_time", "25:99"), ("weekly_report_day", "sunday")])
        .await;
    assert_eq!(bad_time.header("HX-Retarget"), "#flash");
}

#[tokio::test]
async fn demo_visitors_cannot_write_to_the_demo_account() {
    let server = browser();
    server.get("/automation").await.assert_status_ok();
    let before = server.get("/ui/automation/sessions").await.text();

    // Draft edits stay in the visitor's workspace and remain allowed.
    server
        .post("/ui/automation/platforms/internshala")
        .await
        .assert_status_ok();

    for (path, message) in [
        ("/ui/automation/start", "Sign in to start automation"),
        ("/ui/profile/save", "Sign in to save your profile"),
        ("/ui/settings/notifications/toggle/email.weekly_report", "Sign in to change notifications"),
        ("/ui/automation/sessions/1/stop", "Sign in to manage sessions"),
    ] {
        let response = server.post(path).await;
        assert_eq!(response.header("HX-Retarget"), "#flash", "{path}");
        assert!(response.text().contains(message), "{path} should say {message}");
    }

    let credential = server
        .post("/ui/settings/credentials")
        .form(&[("platform", "naukri"), ("login", "demo@example.com"), ("password", "hunter22")])
        .await;
    assert!(credential.text().contains("Sign in to save credentials"));

    assert_eq!(server.get("/ui/automation/sessions").await.text(), before);
}

#[tokio::test]
async fn record_ids_with_slashes_stay_addressable() {
    let server = signed_in_demo().await;
    server
        .patch("/api/accounts/profile/")
        .json(&json!({
            "profile": {
                "education": [{
                    "id": "a/b",
                    "institution": "Delhi University",
                    "degree": "btech",
                    "field_of_study": "CSE",
                    "start_year": 2021,
                    "end_year": 2025
                }],
                "preferences": {
                    "preferred_roles": "Backend Developer",
                    "preferred_locations": "Remote"
                }
            }
        }))
        .await
        .assert_status_ok();

    let panel = server.get("/ui/profile/tab/education").await.text();
    assert!(panel.contains(r#"hx-delete="/ui/profile/records/education/a%2Fb""#));
    assert!(panel.contains("/ui/profile/records/education/a%2Fb/institution"));

    let removed = server.delete("/ui/profile/records/education/a%2Fb").await;
    removed.assert_status_ok();
    assert!(removed.headers().get("HX-Retarget").is_none());
    assert!(!removed.text().contains("Delhi University"));
}

#[tokio::test]
async fn resume_card_uploads_and_removes() {
    let server = signed_in_demo().await;
    assert!(server.get("/profile").await.text().contains("No resume uploaded yet."));

    let form = MultipartForm::new().add_part(
        "resume",
        Part::bytes(&b"%PDF-1.7"[..]).file_name("demo-cv.pdf").mime_type("application/pdf"),
    );
    let card = server.post("/ui/profile/resume").multipart(form).await;
    card.assert_status_ok();
    let html = card.text();
    assert!(html.contains("demo-cv.pdf"));
    assert!(html.contains("Resume uploaded"));

    let file = server.get("/ui/profile/resume").await;
    assert_eq!(file.header(header::CONTENT_TYPE), "application/pdf");

    let removed = server.delete("/ui/profile/resume").await.text();
    assert!(removed.contains("No resume uploaded yet."));
}

#[tokio::test]
async fn settings_import_restores_notifications() {
    let server = signed_in_demo().await;
    let file = br#"{"notifications": {"frequency": {"daily_summary_time": "07:45", "weekly_report_day": "monday"}}}"#;
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(&file[..]).file_name("applypilot-export.json").mime_type("application/json"),
    );

    let panel = server.post("/ui/settings/import").multipart(form).await;
    panel.assert_status_ok();
    assert!(panel.text().contains("Imported notification settings"));

    let notifications = server.get("/ui/settings/tab/notifications").await.text();
    assert!(notifications.contains("07:45"));

    let broken = MultipartForm::new().add_part("file", Part::bytes(&b"{oops"[..]).file_name("export.json"));
    let response = server.post("/ui/settings/import").multipart(broken).await;
    assert_eq!(response.header("HX-Retarget"), "#flash");
    assert!(response.text().contains("invalid JSON"));
}

#[tokio::test]
async fn demo_visitors_cannot_upload_files() {
    let server = browser();
    let resume = MultipartForm::new().add_part(
        "resume",
        Part::bytes(&b"%PDF"[..]).file_name("cv.pdf").mime_type("application/pdf"),
    );
    let response = server.post("/ui/profile/resume").multipart(resume).await;
    assert!(response.text().contains("Sign in to upload a resume"));

    let import = MultipartForm::new().add_part("file", Part::bytes(&b"{}"[..]).file_name("export.json"));
    let response = server.post("/ui/settings/import").multipart(import).await;
    assert!(response.text().contains("Sign in to import data"));
}
