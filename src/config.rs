// Runtime configuration for the CLI, read from the environment (and `.env`).

use crate::core::records::RecordError;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_MAX_CONNECTIONS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// e.g. `sqlite://data/database.db`
    pub database_url: String,
    /// Pool size. One connection matches the single-handle deployment.
    pub max_connections: u32,
    /// Prefix used for servers without a stored one.
    pub default_prefix: String,
}

impl StoreConfig {
    /// Build the config from a key lookup, usually `std::env::var` after
    /// `dotenv::dotenv()`. Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`
    /// and `DEFAULT_PREFIX`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RecordError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| RecordError::Config("DATABASE_URL is not set".to_string()))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(RecordError::Config(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"
                    )))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let default_prefix = lookup("DEFAULT_PREFIX")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            database_url,
            max_connections,
            default_prefix,
        })
    }

    /// `DATABASE_URL` as an sqlx connection string. Bare paths get the
    /// `sqlite://` scheme.
    pub fn connection_string(&self) -> String {
        if self.database_url.starts_with("sqlite:") {
            self.database_url.clone()
        } else {
            format!("sqlite://{}", self.database_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite://bot.db")])).unwrap();
        assert_eq!(config.database_url, "sqlite://bot.db");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.default_prefix, "!");
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DEFAULT_PREFIX", "?"),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.default_prefix, "?");
    }

    #[test]
    fn test_connection_string() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "data/bot.db")])).unwrap();
        assert_eq!(config.connection_string(), "sqlite://data/bot.db");

        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.connection_string(), "sqlite::memory:");
    }

    #[test]
    fn test_missing_url() {
        let err = StoreConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, RecordError::Config(_)));
    }

    #[test]
    fn test_bad_pool_size() {
        for raw in ["0", "lots"] {
            let err = StoreConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "sqlite://bot.db"),
                ("DATABASE_MAX_CONNECTIONS", raw),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
        }
    }
}
