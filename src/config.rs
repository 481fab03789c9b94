// src/config.rs
use crate::application::{commands::auth::AuthPolicy, services::SeedDefaults};
use crate::presentation::http::routes::RouterOptions;
use std::{env, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid(format!(
                "STORAGE_BACKEND must be `postgres` or `memory`, got `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    storage_backend: StorageBackend,
    database_url: Option<String>,
    redis_url: Option<String>,
    biscuit_private_key: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    auth_code_ttl: Duration,
    auth_code_sweep_interval: Duration,
    require_client_secret: bool,
    rate_limit_enabled: bool,
    allowed_origins: Vec<String>,
    seed: Option<SeedDefaults>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".into()
}

const DEFAULT_ACCESS_TTL_SECS: u64 = 60 * 60;
const DEFAULT_REFRESH_TTL_SECS: u64 = 60 * 60 * 24 * 30;
const DEFAULT_AUTH_CODE_TTL_SECS: u64 = 600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{key} must be a boolean"))),
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid(format!(
            "{key} must be a positive number of seconds"
        ))),
    }
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let secs = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            get(key)
                .map(|value| parse_secs(key, &value))
                .unwrap_or(Ok(Duration::from_secs(default)))
        };

        let flag = |key: &'static str, default: bool| -> Result<bool, ConfigError> {
            get(key)
                .map(|value| parse_bool(key, &value))
                .unwrap_or(Ok(default))
        };

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let database_url = get("DATABASE_URL");
        let redis_url = get("REDIS_URL");

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let biscuit_private_key =
            get("BISCUIT_ROOT_PRIVATE_KEY").ok_or(ConfigError::Missing("BISCUIT_ROOT_PRIVATE_KEY"))?;
        if biscuit_private_key.len() != 64
            || !biscuit_private_key.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ConfigError::Invalid(
                "BISCUIT_ROOT_PRIVATE_KEY must be a 32-byte hex string".into(),
            ));
        }

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let seed = if flag("SEED_DEFAULTS", true)? {
            let defaults = SeedDefaults::default();
            Some(SeedDefaults {
                client_id: get("SEED_CLIENT_ID").unwrap_or(defaults.client_id),
                client_secret: get("SEED_CLIENT_SECRET").unwrap_or(defaults.client_secret),
                admin_username: get("SEED_ADMIN_USERNAME").unwrap_or(defaults.admin_username),
                admin_password: get("SEED_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
                admin_display_name: defaults.admin_display_name,
            })
        } else {
            None
        };

        Ok(Self {
            listen_addr,
            storage_backend,
            database_url,
            redis_url,
            biscuit_private_key,
            access_token_ttl: secs("ACCESS_TOKEN_TTL_SECONDS", DEFAULT_ACCESS_TTL_SECS)?,
            refresh_token_ttl: secs("REFRESH_TOKEN_TTL_SECONDS", DEFAULT_REFRESH_TTL_SECS)?,
            auth_code_ttl: secs("AUTH_CODE_TTL_SECONDS", DEFAULT_AUTH_CODE_TTL_SECS)?,
            auth_code_sweep_interval: secs(
                "AUTH_CODE_SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )?,
            require_client_secret: flag("REQUIRE_CLIENT_SECRET", false)?,
            rate_limit_enabled: flag("RATE_LIMIT_ENABLED", true)?,
            allowed_origins,
            seed,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn biscuit_private_key(&self) -> &str {
        &self.biscuit_private_key
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn auth_code_ttl(&self) -> Duration {
        self.auth_code_ttl
    }

    pub fn auth_code_sweep_interval(&self) -> Duration {
        self.auth_code_sweep_interval
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            require_client_secret: self.require_client_secret,
        }
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            rate_limit_enabled: self.rate_limit_enabled,
            allowed_origins: self.allowed_origins.clone(),
        }
    }

    /// `None` when seeding is disabled.
    pub fn seed_defaults(&self) -> Option<&SeedDefaults> {
        self.seed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = load(&[("BISCUIT_ROOT_PRIVATE_KEY", KEY)]).unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:5000");
        assert_eq!(config.storage_backend(), StorageBackend::Memory);
        assert_eq!(config.access_token_ttl(), Duration::from_secs(3600));
        assert_eq!(config.refresh_token_ttl(), Duration::from_secs(2_592_000));
        assert_eq!(config.auth_code_ttl(), Duration::from_secs(600));
        assert!(!config.auth_policy().require_client_secret);
        assert!(config.router_options().rate_limit_enabled);

        let seed = config.seed_defaults().unwrap();
        assert_eq!(seed.client_id, "clientID1");
        assert_eq!(seed.admin_username, "secretuser");
    }

    #[test]
    fn private_key_is_required_and_must_be_hex() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::Missing("BISCUIT_ROOT_PRIVATE_KEY"))
        ));
        assert!(matches!(
            load(&[("BISCUIT_ROOT_PRIVATE_KEY", "zz")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn database_url_selects_postgres() {
        let config = load(&[
            ("BISCUIT_ROOT_PRIVATE_KEY", KEY),
            ("DATABASE_URL", "postgres://localhost/auth"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Postgres);

        let err = load(&[
            ("BISCUIT_ROOT_PRIVATE_KEY", KEY),
            ("STORAGE_BACKEND", "postgres"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn seeding_can_be_disabled() {
        let config = load(&[
            ("BISCUIT_ROOT_PRIVATE_KEY", KEY),
            ("SEED_DEFAULTS", "false"),
        ])
        .unwrap();
        assert!(config.seed_defaults().is_none());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = load(&[
            ("BISCUIT_ROOT_PRIVATE_KEY", KEY),
            ("AUTH_CODE_TTL_SECONDS", "ten"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = load(&[
            ("BISCUIT_ROOT_PRIVATE_KEY", KEY),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test,,"),
        ])
        .unwrap();
        assert_eq!(
            config.router_options().allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
