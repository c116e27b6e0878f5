//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Environment variable overriding `target.base_url`
pub const ENV_BASE_URL: &str = "SMOKE_BASE_URL";
/// Environment variable overriding `credentials.email`
pub const ENV_EMAIL: &str = "SMOKE_EMAIL";
/// Environment variable overriding `credentials.secret`
pub const ENV_SECRET: &str = "SMOKE_SECRET";

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Backend under test
    #[serde(default)]
    pub target: TargetConfig,

    /// Login credentials for the harness
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Identity of the synthetic agent user provisioned for sales goals
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Backend location
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

/// Login credentials
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub secret: String,
}

/// Synthetic agent user
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_email")]
    pub email: String,

    #[serde(default = "default_agent_secret")]
    pub secret: String,

    #[serde(default = "default_agent_permissions")]
    pub permissions: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            email: default_agent_email(),
            secret: default_agent_secret(),
            permissions: default_agent_permissions(),
        }
    }
}

fn default_agent_name() -> String {
    "Agent Teste".to_string()
}
fn default_agent_email() -> String {
    "agent_teste@example.com".to_string()
}
fn default_agent_secret() -> String {
    "senha123".to_string()
}
fn default_agent_permissions() -> Vec<String> {
    vec!["viewDashboard".to_string(), "createOrder".to_string()]
}

/// HTTP transport settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "backend-smoke".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Apply `SMOKE_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_EMAIL).ok(),
            std::env::var(ENV_SECRET).ok(),
        );
    }

    /// Override target and credentials with any values that are present
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        email: Option<String>,
        secret: Option<String>,
    ) {
        if let Some(base_url) = base_url {
            self.target.base_url = base_url;
        }
        if let Some(email) = email {
            self.credentials.email = email;
        }
        if let Some(secret) = secret {
            self.credentials.secret = secret;
        }
    }

    /// Check that the configuration is usable for a run
    pub fn validate(&self) -> Result<()> {
        let base = self.target.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(super::Error::Config(format!(
                "target.base_url must be an http(s) URL, got '{}'",
                self.target.base_url
            )));
        }
        if self.credentials.email.is_empty() {
            return Err(super::Error::Config(format!(
                "No login email configured. Set credentials.email or {}",
                ENV_EMAIL
            )));
        }
        if self.credentials.secret.is_empty() {
            return Err(super::Error::Config(format!(
                "No login secret configured. Set credentials.secret or {}",
                ENV_SECRET
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.target.base_url, "http://localhost:8000/api");
        assert_eq!(config.agent.email, "agent_teste@example.com");
        assert_eq!(config.agent.permissions, vec!["viewDashboard", "createOrder"]);
        assert!(config.http.timeout_secs.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::parse(
            r#"
            [target]
            base_url = "https://staging.example.com/api"

            [credentials]
            email = "admin@example.com"
            secret = "hunter2"

            [http]
            timeout_secs = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.target.base_url, "https://staging.example.com/api");
        assert_eq!(config.credentials.email, "admin@example.com");
        assert_eq!(config.http.timeout_secs, Some(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[credentials]\nemail = \"a@b.c\"\nsecret = \"x\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.credentials.email, "a@b.c");
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, super::super::Error::FileRead { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::parse("[target\nbase_url = 1").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }

    #[test]
    fn test_overrides_only_replace_present_values() {
        let mut config = Config::default();
        config.credentials.email = "keep@example.com".to_string();
        config.apply_overrides(Some("http://other/api".to_string()), None, Some("s".to_string()));
        assert_eq!(config.target.base_url, "http://other/api");
        assert_eq!(config.credentials.email, "keep@example.com");
        assert_eq!(config.credentials.secret, "s");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }
}
