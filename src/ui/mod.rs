//! Server-rendered pages and HTMX fragments.
//!
//! Pages live at the root (`/`, `/profile`, ...) and fragments under `/ui/`.
//! Unsaved form state is kept in the caller's [`Workspace`], found through a
//! cookie set by [`workspace_middleware`].

mod analytics;
mod auth;
mod automation;
mod components;
mod dashboard;
mod profile;
mod settings;
mod shell;

use axum::{
    Router,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::AppState;
use crate::domain::account::Account;
use crate::error::ApiError;
use crate::security::UserContext;
use crate::workspace::WORKSPACE_COOKIE;

pub use components::escape;

use components::Tone;

/// Build the HTML router. Workspace resolution needs the state up front.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::page))
        .route("/ui/dashboard/stats", get(dashboard::stats_fragment))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/register", get(auth::register_page).post(auth::register_submit))
        .route("/logout", post(auth::logout))
        .route("/analytics", get(analytics::page))
        .merge(profile::router())
        .merge(automation::router())
        .merge(settings::router())
        .layer(middleware::from_fn_with_state(state, workspace_middleware))
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewer
// ─────────────────────────────────────────────────────────────────────────────

/// The account a page is rendered for.
///
/// Signed-in callers see their own account. Everyone else sees the demo
/// account when one is loaded, and is sent to the login page otherwise.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub account: Account,
    pub signed_in: bool,
}

impl Viewer {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.account.id
    }

    /// Fail for demo visitors on actions that must not touch the demo account.
    pub fn require_sign_in(&self, action: &str) -> Result<(), UiError> {
        if self.signed_in {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(format!("Sign in to {action}")).into())
        }
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("HX-Request")
}

/// Redirect to the login page, through `HX-Redirect` for fragment requests.
pub fn redirect(headers: &HeaderMap, to: &'static str) -> Response {
    if is_htmx(headers) {
        let mut out = HeaderMap::new();
        out.insert("HX-Redirect", HeaderValue::from_static(to));
        out.into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let signed_in = parts.extensions.get::<UserContext>().map(|user| user.account_id);
        signed_in
            .or(state.demo_account)
            .and_then(|id| state.store.account(id))
            .map(|account| Self {
                account,
                signed_in: signed_in.is_some(),
            })
            .ok_or_else(|| redirect(&parts.headers, "/login"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragment errors
// ─────────────────────────────────────────────────────────────────────────────

/// An error shown as an inline message in the page's `#flash` area.
#[derive(Debug)]
pub struct UiError(pub ApiError);

pub type UiResult<T = Html<String>> = Result<T, UiError>;

impl<E: Into<ApiError>> From<E> for UiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self.0 {
            warn!(name: "ui.internal_error", error = ?err, "Fragment handler failed");
        }
        // htmx only swaps 2xx responses, so the message is retargeted instead.
        let mut headers = HeaderMap::new();
        headers.insert("HX-Retarget", HeaderValue::from_static("#flash"));
        headers.insert("HX-Reswap", HeaderValue::from_static("innerHTML"));
        (headers, Html(components::alert(Tone::Red, &self.0.summary()))).into_response()
    }
}

/// Fragment plus an out-of-band success message in `#flash`.
pub fn with_flash(fragment: String, message: &str) -> Html<String> {
    Html(format!(
        r#"{fragment}<div id="flash" hx-swap-oob="true">{}</div>"#,
        components::alert(Tone::Green, message)
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cookies & workspace
// ─────────────────────────────────────────────────────────────────────────────

/// `Set-Cookie` value for an HTTP-only, site-wide cookie.
pub fn cookie_header(name: &'static str, value: String) -> Option<HeaderValue> {
    let cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// `Set-Cookie` value that clears a cookie.
pub fn removal_header(name: &'static str) -> Option<HeaderValue> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Attach the caller's workspace to the request, issuing a cookie for new ones.
pub async fn workspace_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let known = jar.get(WORKSPACE_COOKIE).map(|c| c.value().to_string());
    let workspace = state.workspaces.resolve(known.as_deref());
    let issued = (known.as_deref() != Some(workspace.id())).then(|| workspace.id().to_string());

    request.extensions_mut().insert(workspace);
    let mut response = next.run(request).await;

    if let Some(value) = issued.and_then(|id| cookie_header(WORKSPACE_COOKIE, id)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
