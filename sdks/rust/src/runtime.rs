//! Embeddable runtime for the SDK.
//!
//! Runs the full server (JSON API, HTML pages and maintenance task) inside
//! another Rust application. Enable with `features = ["embedded"]`.

use std::sync::Arc;

use applypilot::{AppState, config::AppConfig, server};

use crate::error::{Error, Result};

/// Embeddable runtime that replicates the standalone server behavior.
///
/// # Example
///
/// ```rust,ignore
/// use applypilot_sdk::Runtime;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let runtime = Runtime::builder().config_path("config.yaml").build().await?;
///
///     // Option 1: Start the full HTTP server
///     runtime.start().await?;
///
///     // Option 2: Use the store directly
///     let accounts = runtime.state().store.account_count();
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Runtime {
    config: Arc<AppConfig>,
    state: AppState,
}

impl Runtime {
    /// Create a new runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Serve HTTP until the server shuts down.
    pub async fn start(&self) -> Result<()> {
        server::serve(self.state.clone())
            .await
            .map_err(|e| Error::Runtime(e.to_string()))
    }

    /// Get a reference to the application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared state for calling the store and services without HTTP.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for creating a Runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<String>,
    config: Option<AppConfig>,
}

impl RuntimeBuilder {
    /// Set the path to the configuration file.
    pub fn config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Provide a configuration directly (instead of loading from file).
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration and build the shared state.
    pub async fn build(self) -> Result<Runtime> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => AppConfig::load_from_args(["applypilot", "--config", path.as_str()])
                .map_err(|e| Error::Config(e.to_string()))?,
            (None, None) => AppConfig::load_from_args(["applypilot"]).map_err(|e| Error::Config(e.to_string()))?,
        };
        let config = Arc::new(config);
        let state = server::build_state(Arc::clone(&config), None).map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Runtime { config, state })
    }
}
