//! Server configuration parsing.
//!
//! Centralises the environment-driven settings so they are validated
//! consistently and can be tested in isolation.

use chrono::Duration;
use mockable::Env;
use tracing::warn;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const BIND_ADDR_DEFAULT: &str = "0.0.0.0:8080";
const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
const TOKEN_TTL_DEFAULT_SECS: i64 = 3600;

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: String,
    /// Lifetime of issued bearer tokens.
    pub token_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: BIND_ADDR_DEFAULT.to_owned(),
            token_ttl: Duration::seconds(TOKEN_TTL_DEFAULT_SECS),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults with a warning when a value is absent or unparseable.
    pub fn from_env<E: Env>(env: &E) -> Self {
        let bind_addr = env
            .string(BIND_ADDR_ENV)
            .unwrap_or_else(|| BIND_ADDR_DEFAULT.to_owned());

        let token_ttl = match env.string(TOKEN_TTL_ENV) {
            Some(value) => match value.parse::<i64>() {
                Ok(secs) if secs > 0 => Duration::seconds(secs),
                _ => {
                    warn!(value = %value, "invalid TOKEN_TTL_SECS; using default");
                    Duration::seconds(TOKEN_TTL_DEFAULT_SECS)
                }
            },
            None => Duration::seconds(TOKEN_TTL_DEFAULT_SECS),
        };

        Self {
            bind_addr,
            token_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use mockable::{DefaultEnv, MockEnv};
    use rstest::rstest;

    use super::*;

    fn env_with(bind: Option<&str>, ttl: Option<&str>) -> MockEnv {
        let bind = bind.map(str::to_owned);
        let ttl = ttl.map(str::to_owned);
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| match name {
            BIND_ADDR_ENV => bind.clone(),
            TOKEN_TTL_ENV => ttl.clone(),
            _ => None,
        });
        env
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let config = ServerConfig::from_env(&env_with(None, None));
        assert_eq!(config, ServerConfig::default());
    }

    #[rstest]
    fn explicit_values_are_honoured() {
        let config = ServerConfig::from_env(&env_with(Some("127.0.0.1:9999"), Some("120")));
        assert_eq!(config.bind_addr, "127.0.0.1:9999");
        assert_eq!(config.token_ttl, Duration::seconds(120));
    }

    #[rstest]
    fn the_process_environment_yields_a_usable_config() {
        let config = ServerConfig::from_env(&DefaultEnv::new());
        assert!(!config.bind_addr.is_empty());
        assert!(config.token_ttl > Duration::zero());
    }

    #[rstest]
    #[case("not-a-number")]
    #[case("-5")]
    #[case("0")]
    fn invalid_ttls_fall_back_to_the_default(#[case] ttl: &str) {
        let config = ServerConfig::from_env(&env_with(None, Some(ttl)));
        assert_eq!(config.token_ttl, Duration::seconds(TOKEN_TTL_DEFAULT_SECS));
    }
}
