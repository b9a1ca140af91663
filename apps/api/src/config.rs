//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rookery_shared_config::{parse_env, CommonConfig, DatabaseConfig, Environment, StorageBackend};

use crate::graphql::guards::DEFAULT_MAX_DEPTH;
use crate::graphql::LoaderConfig;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Deepest allowed field nesting, root fields at 0 (default: 5)
    pub max_query_depth: usize,

    /// Batching knobs for the per-request loaders
    pub loaders: LoaderConfig,

    /// Serve the GraphQL Playground on `GET /graphql`
    pub playground: bool,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode with the PostgreSQL backend, `DATABASE_URL` must be
    /// set explicitly. The playground defaults to off in production.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if is_production && common.storage.is_postgres() {
            Self::validate_database_url()?;
        }

        let max_query_depth: usize = parse_env("MAX_QUERY_DEPTH", DEFAULT_MAX_DEPTH)?;
        let delay_ms: u64 = parse_env("LOADER_DELAY_MS", 1)?;
        let max_batch_size: usize = parse_env("LOADER_MAX_BATCH_SIZE", 1000)?;
        if max_batch_size == 0 {
            bail!("LOADER_MAX_BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            max_query_depth,

            loaders: LoaderConfig {
                delay: Duration::from_millis(delay_ms),
                max_batch_size,
            },

            playground: parse_env("GRAPHQL_PLAYGROUND", !is_production)?,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get the configured storage backend
    pub fn storage(&self) -> StorageBackend {
        self.common.storage
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEARED: [(&str, Option<&str>); 9] = [
        ("ENVIRONMENT", None),
        ("STORAGE_BACKEND", None),
        ("DATABASE_URL", None),
        ("PORT", None),
        ("MAX_QUERY_DEPTH", None),
        ("LOADER_DELAY_MS", None),
        ("LOADER_MAX_BATCH_SIZE", None),
        ("GRAPHQL_PLAYGROUND", None),
        ("CORS_ORIGINS", None),
    ];

    fn with_env<F: FnOnce()>(overrides: &[(&str, Option<&str>)], f: F) {
        let mut vars: Vec<(&str, Option<&str>)> = CLEARED.to_vec();
        for (key, value) in overrides {
            vars.retain(|(k, _)| k != key);
            vars.push((*key, *value));
        }
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_env(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.max_query_depth, 5);
            assert_eq!(config.loaders, LoaderConfig::default());
            assert!(config.playground);
            assert_eq!(config.storage(), StorageBackend::Postgres);
            assert!(config.cors_allowed_origins.is_none());
        });
    }

    #[test]
    fn test_database_url_required_in_production() {
        with_env(&[("ENVIRONMENT", Some("production"))], || {
            let err = Config::from_env().unwrap_err().to_string();
            assert!(err.contains("DATABASE_URL"));
            assert!(err.contains("required in production"));
        });
    }

    #[test]
    fn test_memory_backend_needs_no_database_in_production() {
        with_env(
            &[
                ("ENVIRONMENT", Some("production")),
                ("STORAGE_BACKEND", Some("memory")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage(), StorageBackend::Memory);
                assert!(!config.playground);
            },
        );
    }

    #[test]
    fn test_loader_and_depth_overrides() {
        with_env(
            &[
                ("MAX_QUERY_DEPTH", Some("8")),
                ("LOADER_DELAY_MS", Some("0")),
                ("LOADER_MAX_BATCH_SIZE", Some("50")),
                ("GRAPHQL_PLAYGROUND", Some("false")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.max_query_depth, 8);
                assert_eq!(config.loaders.delay, Duration::ZERO);
                assert_eq!(config.loaders.max_batch_size, 50);
                assert!(!config.playground);
            },
        );
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        with_env(&[("LOADER_MAX_BATCH_SIZE", Some("0"))], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_cors_origins_are_split() {
        with_env(
            &[("CORS_ORIGINS", Some("http://a.test, http://b.test,"))],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(
                    config.cors_allowed_origins,
                    Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
                );
            },
        );
    }
}
