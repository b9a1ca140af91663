//! Storage backend selection

use std::str::FromStr;

use crate::ConfigError;

/// Repository adapter the API runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// PostgreSQL through a connection pool
    #[default]
    Postgres,
    /// Process-local store seeded with reference data, lost on restart
    Memory,
}

impl StorageBackend {
    pub fn is_postgres(&self) -> bool {
        matches!(self, Self::Postgres)
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" | "mem" => Ok(Self::Memory),
            other => Err(ConfigError::ValidationError(format!(
                "unknown storage backend '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}
