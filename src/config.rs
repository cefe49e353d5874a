use std::path::Path;

use clap::{Parser, ValueEnum};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Environment prefix for layered settings, e.g. `APPLYPILOT_SERVER__PORT`.
pub const ENV_PREFIX: &str = "APPLYPILOT";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Enable rate limiting
    #[arg(long, env = "RATE_LIMIT_ENABLED")]
    pub rate_limit_enabled: Option<bool>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Load the demo account and job board at startup
    #[arg(long, env = "SEED_DEMO_DATA")]
    pub demo_data: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub resilience: ResilienceConfig,
    pub workspace: WorkspaceConfig,
    pub seed: SeedConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
    /// Allowed CORS origins for the JSON API. Empty disables CORS headers.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub rate_limit_enabled: bool,
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceConfig {
    pub idle_timeout_minutes: u64,
    pub cleanup_interval_secs: u64,
    pub session_retention_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub demo_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layering, lowest to highest: defaults, config file, `APPLYPILOT_*`
    /// environment, CLI flags (and their plain env fallbacks such as `PORT`).
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("server.cors_origins", Vec::<String>::new())?
            .set_default("security.jwt_secret", "change-me-in-production")?
            .set_default("security.token_ttl_minutes", 60)?
            .set_default("resilience.rate_limit_enabled", false)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 30)?
            .set_default("resilience.requests_per_second", 20)?
            .set_default("resilience.burst_size", 40)?
            .set_default("workspace.idle_timeout_minutes", 30)?
            .set_default("workspace.cleanup_interval_secs", 60)?
            .set_default("workspace.session_retention_days", 30)?
            .set_default("seed.demo_data", true)?
            .set_default("telemetry.log_format", "compact")?
            .set_default("telemetry.metrics_enabled", true)?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::new(path, FileFormat::Yaml));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(rl) = cli.rate_limit_enabled {
            builder = builder.set_override("resilience.rate_limit_enabled", rl)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("telemetry.log_format", format.as_str())?;
        }
        if let Some(seed) = cli.demo_data {
            builder = builder.set_override("seed.demo_data", seed)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let config = AppConfig::load_from_args([
            "applypilot",
            "--port",
            "9100",
            "--log-format",
            "json",
            "--demo-data",
            "false",
        ])
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert!(!config.seed.demo_data);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(AppConfig::load_from_args(["applypilot", "--no-such-flag"]).is_err());
    }
}
