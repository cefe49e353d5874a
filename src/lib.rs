//! ApplyPilot: job application automation dashboard.
//!
//! A single axum server with a JSON API, server-rendered HTMX views and an
//! in-memory record store.
//!
//! # Architecture
//!
//! - **Server**: Axum router with auth, rate limit, timeout and metrics layers
//! - **API**: REST endpoints under `/api` used by the SDK and external clients
//! - **UI**: HTML pages and HTMX fragments backed by per-browser workspaces
//! - **Store**: Thread-safe in-memory records, optionally seeded with demo data
//!
//! # Modules
//!
//! - [`domain`]: records, forms and analytics
//! - [`editor`]: list-editor, platform selection and submit guard
//! - [`store`]: shared record store
//! - [`workspace`]: expiring per-browser form state
//! - [`security`]: tokens, passwords, auth and rate limiting

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod security;
pub mod server;
pub mod store;
pub mod telemetry;
pub mod ui;
pub mod workspace;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::security::{AppRateLimiter, TokenService};
use crate::store::Store;
use crate::workspace::WorkspaceStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Records shared by the API and the HTML views.
    pub store: Store,
    /// Per-browser form state for the HTML views.
    pub workspaces: WorkspaceStore,
    /// Access token signing and verification.
    pub tokens: Arc<TokenService>,
    /// Global Rate Limiter
    pub rate_limiter: Arc<AppRateLimiter>,
    /// Prometheus exporter handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
    /// Account shown to signed-out visitors of the HTML views.
    pub demo_account: Option<u64>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
