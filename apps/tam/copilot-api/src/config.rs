use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_tam::GcpConfig;
use std::time::Duration;

pub use core_config::Environment;

pub const DEFAULT_AGGREGATION_CRON: &str = "0 0 2 * * *";
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub gcp: GcpConfig,
    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origin: String,
    /// Six-field cron expression (seconds first)
    pub aggregation_cron: String,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let gcp = GcpConfig::from_env()?;
        let shutdown_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            gcp,
            cors_allowed_origin: env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ALLOWED_ORIGIN),
            aggregation_cron: env_or_default("AGGREGATION_CRON", DEFAULT_AGGREGATION_CRON),
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 6] = [
        "DATABASE_URL",
        "CORS_ALLOWED_ORIGIN",
        "AGGREGATION_CRON",
        "SHUTDOWN_TIMEOUT_SECS",
        "PORT",
        "GCP_ACCESS_TOKEN",
    ];

    fn with_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = KEYS
            .iter()
            .map(|key| {
                let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_env(&[("DATABASE_URL", "postgresql://localhost/tam")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "copilot-api");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.cors_allowed_origin, DEFAULT_CORS_ALLOWED_ORIGIN);
            assert_eq!(config.aggregation_cron, DEFAULT_AGGREGATION_CRON);
            assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
            assert!(config.gcp.access_token.is_none());
        });
    }

    #[test]
    fn test_database_url_is_required() {
        with_env(&[], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[test]
    fn test_overrides() {
        with_env(
            &[
                ("DATABASE_URL", "postgresql://localhost/tam"),
                ("CORS_ALLOWED_ORIGIN", "https://tam.example.com"),
                ("AGGREGATION_CRON", "0 30 1 * * *"),
                ("SHUTDOWN_TIMEOUT_SECS", "5"),
                ("PORT", "9090"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.cors_allowed_origin, "https://tam.example.com");
                assert_eq!(config.aggregation_cron, "0 30 1 * * *");
                assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
                assert_eq!(config.server.address(), "0.0.0.0:9090");
            },
        );
    }

    #[test]
    fn test_debug_hides_access_token() {
        with_env(
            &[
                ("DATABASE_URL", "postgresql://localhost/tam"),
                ("GCP_ACCESS_TOKEN", "ya29.secret"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(!format!("{:?}", config).contains("ya29.secret"));
            },
        );
    }
}
