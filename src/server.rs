use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppState;
use crate::api;
use crate::config::AppConfig;
use crate::security::{
    AppRateLimiter, TokenService, middleware::auth_middleware, password::hash_password,
    rate_limit::rate_limit_middleware,
};
use crate::store::{Store, seed};
use crate::telemetry;
use crate::ui;
use crate::workspace::WorkspaceStore;

/// Largest accepted request body.
const BODY_LIMIT: usize = 1024 * 1024;

/// Build shared state, seeding demo data when configured.
pub fn build_state(config: Arc<AppConfig>, metrics: Option<PrometheusHandle>) -> anyhow::Result<AppState> {
    let store = Store::new();
    let demo_account = if config.seed.demo_data {
        let hash = hash_password(seed::DEMO_PASSWORD)?;
        let id = seed::demo_data(&store, hash)?;
        info!(
            name: "store.demo_ready",
            username = seed::DEMO_USERNAME,
            account_id = id,
            "Demo account available"
        );
        Some(id)
    } else {
        None
    };

    Ok(AppState {
        store,
        workspaces: WorkspaceStore::new(),
        tokens: Arc::new(TokenService::new(
            &config.security.jwt_secret,
            config.security.token_ttl_minutes,
        )),
        rate_limiter: Arc::new(AppRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        )),
        metrics,
        demo_account,
        config,
    })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(name: "server.cors_origin_invalid", origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let mut api = api::router();
    if !config.server.cors_origins.is_empty() {
        api = api.layer(cors_layer(&config.server.cors_origins));
    }

    let mut app = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(render_metrics))
        .nest("/api", api)
        .merge(ui::router(state.clone()))
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    if state.metrics.is_some() {
        app = app.layer(middleware::from_fn(telemetry::track_metrics));
    }

    app = app
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    if !config.resilience.timeout_disabled {
        let timeout_duration = Duration::from_secs(config.resilience.request_timeout_secs.max(1));
        app = app.layer(middleware::from_fn(move |req: Request, next: Next| async move {
            match tokio::time::timeout(timeout_duration, next.run(req)).await {
                Ok(res) => res,
                Err(_) => (
                    StatusCode::REQUEST_TIMEOUT,
                    Json(json!({ "error": "Request timed out" })),
                )
                    .into_response(),
            }
        }));
    }

    app.layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

/// GET /healthz
async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "accounts": state.store.account_count(),
        "workspaces": state.workspaces.len(),
    }))
}

/// GET /metrics - Prometheus text exposition.
async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Maintenance
// ─────────────────────────────────────────────────────────────────────────────

/// What one maintenance pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub workspaces_expired: usize,
    pub sessions_pruned: usize,
}

/// Expire idle workspaces and prune sessions past the retention window.
pub fn run_maintenance(state: &AppState, now: DateTime<Utc>) -> MaintenanceReport {
    let workspace = &state.config.workspace;
    MaintenanceReport {
        workspaces_expired: state
            .workspaces
            .cleanup_expired_with_timeout(Duration::from_secs(workspace.idle_timeout_minutes * 60)),
        sessions_pruned: state
            .store
            .prune_sessions(now, chrono::Duration::days(workspace.session_retention_days)),
    }
}

/// Run [`run_maintenance`] on a fixed interval until the runtime stops.
pub fn spawn_maintenance(state: AppState) -> JoinHandle<()> {
    let period = Duration::from_secs(state.config.workspace.cleanup_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = run_maintenance(&state, Utc::now());
            if report != MaintenanceReport::default() {
                info!(
                    name: "maintenance.completed",
                    workspaces_expired = report.workspaces_expired,
                    sessions_pruned = report.sessions_pruned,
                    "Maintenance pass removed stale records"
                );
            }
        }
    })
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let metrics = if config.telemetry.metrics_enabled {
        Some(telemetry::install_metrics()?)
    } else {
        None
    };

    serve(build_state(config, metrics)?).await
}

/// Serve an already built state until Ctrl-C.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let config = Arc::clone(&state.config);
    let maintenance = spawn_maintenance(state.clone());
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!(name: "server.signal_error", "Could not listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    maintenance.abort();
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<AppConfig> {
        Arc::new(AppConfig::load_from_args(["applypilot"]).unwrap())
    }

    #[test]
    fn maintenance_prunes_only_stale_records() {
        let state = build_state(config(), None).unwrap();
        let account = state.demo_account.unwrap();
        state.workspaces.create();

        let now = Utc::now();
        assert_eq!(run_maintenance(&state, now), MaintenanceReport::default());

        let later = now + chrono::Duration::days(31);
        let report = run_maintenance(&state, later);
        assert_eq!(report.sessions_pruned, 2);
        assert!(state.store.sessions(account).is_empty());
    }
}
