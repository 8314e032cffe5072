//! Process configuration read from the environment
use super::error::{ConfigError, StoreError};
use super::storage::SledStorage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub env: Environment,
    pub db_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive for binaries embedding the crate.
    pub log_filter: String,
}

impl StorefrontConfig {
    /// Opens (creating if needed) the sled database at `db_path`.
    pub fn open_storage(&self) -> Result<(Arc<sled::Db>, SledStorage), StoreError> {
        let db = Arc::new(sled::open(&self.db_path)?);
        Ok((db.clone(), SledStorage::new(db)))
    }
}

/// Load configuration, reading a `.env` file first if one exists.
pub fn load_config() -> Result<StorefrontConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from the variables already set on the process.
pub fn load_config_from_env() -> Result<StorefrontConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

fn build_config<F>(lookup: F) -> Result<StorefrontConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;
    let db_path = PathBuf::from(or_default("STOREFRONT_DB_PATH", "./data/storefront.db"));
    let log_filter = or_default("STOREFRONT_LOG", "info");

    Ok(StorefrontConfig {
        env,
        db_path,
        log_filter,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let map = HashMap::new();
        let config = build_config(lookup_from_map(&map)).unwrap();

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.db_path, PathBuf::from("./data/storefront.db"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn reads_overrides() {
        let map = HashMap::from([
            ("STOREFRONT_ENV", "production"),
            ("STOREFRONT_DB_PATH", "/var/lib/storefront"),
            ("STOREFRONT_LOG", "storefront_cart=debug"),
        ]);
        let config = build_config(lookup_from_map(&map)).unwrap();

        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.env.to_string(), "production");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/storefront"));
        assert_eq!(config.log_filter, "storefront_cart=debug");
    }

    #[test]
    fn unknown_environment_fails() {
        let map = HashMap::from([("STOREFRONT_ENV", "staging")]);
        let err = build_config(lookup_from_map(&map)).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "STOREFRONT_ENV"));
    }

    #[test]
    fn open_storage_creates_the_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            env: Environment::Test,
            db_path: temp_dir.path().join("config_open.db"),
            log_filter: "info".into(),
        };

        let (_db, _storage) = config.open_storage().unwrap();

        assert!(config.db_path.exists());
    }
}
