use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::{Html, Response},
};
use serde::Deserialize;
use tracing::info;

use super::shell::auth_shell;
use super::{UiResult, cookie_header, redirect, removal_header};
use crate::AppState;
use crate::api::accounts;
use crate::domain::account::{LoginRequest, RegisterRequest};
use crate::domain::profile::parse_opt;
use crate::security::middleware::TOKEN_COOKIE;

fn field(label: &str, name: &str, kind: &str, required: bool) -> String {
    let required = if required { " required" } else { "" };
    format!(
        r#"<label class="field"><span>{label}</span><input type="{kind}" name="{name}" autocomplete="{name}"{required}></label>"#
    )
}

/// Redirect home and hand the browser its access token cookie.
fn signed_in(headers: &HeaderMap, token: String) -> Response {
    let mut response = redirect(headers, "/");
    if let Some(cookie) = cookie_header(TOKEN_COOKIE, token) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

/// GET /login
pub async fn login_page() -> Html<String> {
    let form = format!(
        r#"<h2>Sign in</h2>
<form class="stack" hx-post="/login" hx-swap="none">
    {username}
    {password}
    <button type="submit" class="btn btn-primary">Sign in</button>
</form>
<p class="muted">New here? <a href="/register">Create an account</a></p>"#,
        username = field("Username", "username", "text", true),
        password = field("Password", "password", "password", true),
    );
    Html(auth_shell("Sign in", &form))
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginRequest>,
) -> UiResult<Response> {
    let (_, token) = accounts::login(&state, &form)?;
    Ok(signed_in(&headers, token.access))
}

/// POST /logout
pub async fn logout(headers: HeaderMap) -> Response {
    let mut response = redirect(&headers, "/login");
    if let Some(cookie) = removal_header(TOKEN_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Registration form; every value arrives as text.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    college: String,
    #[serde(default)]
    branch: String,
    #[serde(default)]
    graduation_year: String,
}

impl RegisterForm {
    fn into_request(self) -> UiResult<RegisterRequest> {
        Ok(RegisterRequest {
            graduation_year: parse_opt("graduation_year", &self.graduation_year, "a year")?,
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            college: self.college,
            branch: self.branch,
        })
    }
}

/// GET /register
pub async fn register_page() -> Html<String> {
    let form = format!(
        r#"<h2>Create your account</h2>
<form class="stack" hx-post="/register" hx-swap="none">
    <div class="grid-2">{first}{last}</div>
    {username}
    {email}
    {password}
    <div class="grid-2">{phone}{year}</div>
    <div class="grid-2">{college}{branch}</div>
    <button type="submit" class="btn btn-primary">Create account</button>
</form>
<p class="muted">Already registered? <a href="/login">Sign in</a></p>"#,
        first = field("First name", "first_name", "text", true),
        last = field("Last name", "last_name", "text", true),
        username = field("Username", "username", "text", true),
        email = field("Email", "email", "email", true),
        password = field("Password", "password", "password", true),
        phone = field("Phone", "phone", "tel", false),
        year = field("Graduation year", "graduation_year", "number", false),
        college = field("College", "college", "text", false),
        branch = field("Branch", "branch", "text", false),
    );
    Html(auth_shell("Register", &form))
}

/// POST /register - Create the account and sign straight in.
pub async fn register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> UiResult<Response> {
    let request = form.into_request()?;
    let account = accounts::register(&state, &request)?;
    let token = state
        .tokens
        .issue(&account)
        .map_err(|e| crate::error::ApiError::Internal(e.into()))?;
    info!(name: "ui.registered", account_id = account.id, "Signed in after registration");
    Ok(signed_in(&headers, token.access))
}
