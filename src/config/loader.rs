//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{Environment, GateConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Selects the origin allow-list. Only `production` selects the
/// production list; any other value means development.
pub const ENV_APP_ENV: &str = "APP_ENV";
/// Consulted when `APP_ENV` is unset.
pub const ENV_NODE_ENV: &str = "NODE_ENV";
/// Shared secret for bearer token verification.
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_BIND_ADDRESS: &str = "GATE_BIND_ADDRESS";
pub const ENV_UPSTREAM: &str = "GATE_UPSTREAM";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GateConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Apply environment overrides to `config` and validate the result.
pub fn finalize(mut config: GateConfig) -> Result<GateConfig, ConfigError> {
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides looked up through `lookup`.
///
/// Empty values are treated as unset.
pub fn apply_overrides<F>(config: &mut GateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(env) = get(ENV_APP_ENV).or_else(|| get(ENV_NODE_ENV)) {
        config.cors.environment = Environment::from_flag(&env);
    }
    if let Some(secret) = get(ENV_JWT_SECRET) {
        config.auth.jwt_secret = secret;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(addr) = get(ENV_UPSTREAM) {
        config.upstream.address = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = GateConfig::default();
        let vars = env(&[
            (ENV_APP_ENV, "production"),
            (ENV_JWT_SECRET, "from-env"),
            (ENV_UPSTREAM, "10.0.0.5:4000"),
        ]);

        apply_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.cors.environment, Environment::Production);
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.upstream.address, "10.0.0.5:4000");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut config = GateConfig::default();
        config.auth.jwt_secret = "file-secret".into();
        let vars = env(&[(ENV_JWT_SECRET, "  ")]);

        apply_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.auth.jwt_secret, "file-secret");
    }

    #[test]
    fn test_node_env_selects_production() {
        let mut config = GateConfig::default();
        let vars = env(&[(ENV_NODE_ENV, "production")]);

        apply_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.cors.environment, Environment::Production);
    }

    #[test]
    fn test_app_env_takes_precedence_over_node_env() {
        let mut config = GateConfig::default();
        let vars = env(&[(ENV_APP_ENV, "development"), (ENV_NODE_ENV, "production")]);

        apply_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.cors.environment, Environment::Development);
    }

    #[test]
    fn test_unknown_environment_falls_back_to_development() {
        let mut config = GateConfig::default();
        config.cors.environment = Environment::Production;
        let vars = env(&[(ENV_APP_ENV, "test")]);

        apply_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.cors.environment, Environment::Development);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("api-gate-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gate.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            api_prefix = "/api"

            [rate_limit]
            tokens_per_interval = 5
            interval_secs = 10

            [auth]
            jwt_secret = "file-secret"
            excluded_routes = ["/api/get-nonce"]
            "#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.rate_limit.interval_secs, 10);
        assert_eq!(config.rate_limit.tokens_per_interval, 5);
        assert_eq!(config.auth.excluded_routes, vec!["/api/get-nonce".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/api-gate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
