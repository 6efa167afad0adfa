use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
pub const DEFAULT_SECRET_KEY: &str = "supersecretkey";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a socket address: {0}")]
    BindAddr(String),

    #[error("BCRYPT_COST must be an integer between 4 and 31, got {0}")]
    BcryptCost(String),
}

// Runtime settings read from the environment (and `.env`, loaded by main)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub bind_addr: SocketAddr,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to the
    /// defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let secret_key = lookup("SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("SECRET_KEY not set, using the built-in development key");
            DEFAULT_SECRET_KEY.to_string()
        });

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::BindAddr(bind_addr))?;

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::BcryptCost(raw)),
            },
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Config {
            database_url,
            secret_key,
            bind_addr,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.secret_key, DEFAULT_SECRET_KEY);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("SECRET_KEY", "s3cret"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let err = Config::from_lookup(lookup_from(&[("BCRYPT_COST", "2")])).unwrap_err();
        assert!(matches!(err, ConfigError::BcryptCost(_)));
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let err = Config::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::BindAddr(_)));
    }
}
