use applypilot::config::{AppConfig, LogFormat};
use serial_test::serial;
use std::env;
use std::fs;

// Environment variables that would otherwise leak into config loading
fn clear_env_vars() {
    unsafe {
        for key in [
            "CONFIG_FILE",
            "PORT",
            "RATE_LIMIT_ENABLED",
            "TIMEOUT_DISABLED",
            "LOG_FORMAT",
            "SEED_DEMO_DATA",
            "APPLYPILOT_SERVER__PORT",
            "APPLYPILOT_SERVER__CORS_ORIGINS",
            "APPLYPILOT_SECURITY__TOKEN_TTL_MINUTES",
            "APPLYPILOT_SEED__DEMO_DATA",
        ] {
            env::remove_var(key);
        }
    }
}

fn load(extra: &[&str]) -> AppConfig {
    let mut args = vec!["applypilot"];
    args.extend_from_slice(extra);
    AppConfig::load_from_args(args).expect("config should load")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.static_dir, "static");
    assert_eq!(config.security.token_ttl_minutes, 60);
    assert!(config.seed.demo_data);
    assert!(!config.resilience.rate_limit_enabled);
    assert_eq!(config.telemetry.log_format, LogFormat::Compact);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("APPLYPILOT_SERVER__PORT", "9090");
        env::set_var("APPLYPILOT_SEED__DEMO_DATA", "false");
    }

    let config = load(&[]);
    assert_eq!(config.server.port, 9090);
    assert!(!config.seed.demo_data);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cors_origins_from_env_list() {
    clear_env_vars();
    unsafe {
        env::set_var(
            "APPLYPILOT_SERVER__CORS_ORIGINS",
            "http://localhost:3000,http://localhost:5173",
        );
    }

    let config = load(&[]);
    assert_eq!(
        config.server.cors_origins,
        vec!["http://localhost:3000", "http://localhost:5173"]
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("applypilot.yaml");
    fs::write(
        &path,
        r#"
server:
  port: 7070
security:
  token_ttl_minutes: 15
"#,
    )
    .expect("write config");

    let path = path.to_string_lossy().into_owned();
    let config = load(&["--config", &path]);
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.security.token_ttl_minutes, 15);
    // Untouched keys keep their defaults
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
#[serial]
fn test_cli_beats_env_and_file() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("applypilot.yaml");
    fs::write(&path, "server:\n  port: 7070\n").expect("write config");
    unsafe {
        env::set_var("APPLYPILOT_SERVER__PORT", "9090");
    }

    let path = path.to_string_lossy().into_owned();
    let config = load(&["--config", &path, "--port", "6060", "--log-format", "json"]);
    assert_eq!(config.server.port, 6060);
    assert_eq!(config.telemetry.log_format, LogFormat::Json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["applypilot", "--config", "/nonexistent/applypilot.yaml"]);
    assert!(result.is_err());
}
