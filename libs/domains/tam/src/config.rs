use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use std::time::Duration;

/// Cloud API settings shared by the upstream clients.
#[derive(Clone)]
pub struct GcpConfig {
    /// Project used when a tool or job is not given one
    pub project_id: String,
    pub region: String,
    /// Organization scanned for security findings
    pub org_id: String,
    /// Bearer token for Google APIs; upstream calls report unavailable without it
    pub access_token: Option<String>,
    pub support_endpoint: String,
    /// Account whose open cases are snapshotted by the daily job
    pub customer_account_id: Option<String>,
    pub http_timeout: Duration,
}

impl std::fmt::Debug for GcpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpConfig")
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("org_id", &self.org_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("support_endpoint", &self.support_endpoint)
            .field("customer_account_id", &self.customer_account_id)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project_id: "tam-copilot-project".to_string(),
            region: "us-central1".to_string(),
            org_id: "123456789".to_string(),
            access_token: None,
            support_endpoint: "https://cloudsupport.googleapis.com".to_string(),
            customer_account_id: None,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl FromEnv for GcpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_secs: u64 = env_parse("HTTP_TIMEOUT_SECS", "30")?;

        Ok(Self {
            project_id: env_or_default("GCP_PROJECT_ID", &defaults.project_id),
            region: env_or_default("GCP_REGION", &defaults.region),
            org_id: env_or_default("GCP_ORG_ID", &defaults.org_id),
            access_token: env_optional("GCP_ACCESS_TOKEN"),
            support_endpoint: env_or_default("SUPPORT_API_ENDPOINT", &defaults.support_endpoint)
                .trim_end_matches('/')
                .to_string(),
            customer_account_id: env_optional("TAM_CUSTOMER_ACCOUNT_ID"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 7] = [
        "GCP_PROJECT_ID",
        "GCP_REGION",
        "GCP_ORG_ID",
        "GCP_ACCESS_TOKEN",
        "SUPPORT_API_ENDPOINT",
        "TAM_CUSTOMER_ACCOUNT_ID",
        "HTTP_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(KEYS, || {
            let config = GcpConfig::from_env().unwrap();
            assert_eq!(config.project_id, "tam-copilot-project");
            assert_eq!(config.region, "us-central1");
            assert_eq!(config.org_id, "123456789");
            assert!(config.access_token.is_none());
            assert!(config.customer_account_id.is_none());
            assert_eq!(config.http_timeout, Duration::from_secs(30));
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("GCP_PROJECT_ID", Some("acme-prod")),
                ("GCP_ACCESS_TOKEN", Some("ya29.token")),
                ("SUPPORT_API_ENDPOINT", Some("https://support.internal/")),
                ("TAM_CUSTOMER_ACCOUNT_ID", Some("organizations/42")),
                ("HTTP_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = GcpConfig::from_env().unwrap();
                assert_eq!(config.project_id, "acme-prod");
                assert_eq!(config.access_token.as_deref(), Some("ya29.token"));
                assert_eq!(config.support_endpoint, "https://support.internal");
                assert_eq!(config.customer_account_id.as_deref(), Some("organizations/42"));
                assert_eq!(config.http_timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_blank_token_is_unset() {
        temp_env::with_var("GCP_ACCESS_TOKEN", Some("  "), || {
            assert!(GcpConfig::from_env().unwrap().access_token.is_none());
        });
    }

    #[test]
    fn test_invalid_timeout() {
        temp_env::with_var("HTTP_TIMEOUT_SECS", Some("soon"), || {
            assert!(GcpConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GcpConfig {
            access_token: Some("secret".into()),
            ..GcpConfig::default()
        };
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
