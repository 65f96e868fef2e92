use crate::error::ConfigError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_JSON_STORE_PATH: &str = "data/combined_records.json";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Which `RecordStore` implementation gets wired up at startup
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Memory,
    JsonFile(PathBuf),
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    bind_addr: SocketAddr,
    sensor_feed_url: String,
    config_feed_url: String,
    fetch_timeout: Duration,
    storage: StorageConfig,
    log_level: String,
}

impl Config {
    /// Reads the process environment, a `.env` file should be loaded beforehand
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).map(|v| v.trim().to_owned());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let fetch_timeout_ms = parse_or(
            "FETCH_TIMEOUT_MS",
            var("FETCH_TIMEOUT_MS"),
            DEFAULT_FETCH_TIMEOUT_MS,
        )?;

        let backend = var("STORAGE_BACKEND").unwrap_or_else(|| "memory".to_owned());
        let storage = match backend.to_ascii_lowercase().as_str() {
            "memory" => StorageConfig::Memory,
            "json" => StorageConfig::JsonFile(PathBuf::from(
                var("JSON_STORE_PATH").unwrap_or_else(|| DEFAULT_JSON_STORE_PATH.to_owned()),
            )),
            "postgres" => StorageConfig::Postgres {
                database_url: required("DATABASE_URL")?,
                max_connections: parse_or(
                    "DB_MAX_CONNECTIONS",
                    var("DB_MAX_CONNECTIONS"),
                    DEFAULT_DB_MAX_CONNECTIONS,
                )?,
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: backend,
                })
            }
        };

        Ok(Config {
            bind_addr,
            sensor_feed_url: required("SENSOR_FEED_URL")?,
            config_feed_url: required("CONFIG_FEED_URL")?,
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            storage,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn sensor_feed_url(&self) -> &str {
        &self.sensor_feed_url
    }

    pub fn config_feed_url(&self) -> &str {
        &self.config_feed_url
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const FEEDS: [(&str, &str); 2] = [
        ("SENSOR_FEED_URL", "http://localhost:9000/sensors"),
        ("CONFIG_FEED_URL", "http://localhost:9000/configs"),
    ];

    #[test]
    fn test_defaults() {
        let config = config(&FEEDS).unwrap();

        assert_eq!("0.0.0.0:8080".parse::<SocketAddr>().unwrap(), config.bind_addr());
        assert_eq!(Duration::from_secs(10), config.fetch_timeout());
        assert_eq!(&StorageConfig::Memory, config.storage());
        assert_eq!("info", config.log_level());
        assert_eq!("http://localhost:9000/sensors", config.sensor_feed_url());
    }

    #[test]
    fn test_backends() {
        let mut vars = FEEDS.to_vec();
        vars.push(("STORAGE_BACKEND", "JSON"));
        vars.push(("JSON_STORE_PATH", "/tmp/records.json"));
        assert_eq!(
            &StorageConfig::JsonFile(PathBuf::from("/tmp/records.json")),
            config(&vars).unwrap().storage()
        );

        let mut vars = FEEDS.to_vec();
        vars.push(("STORAGE_BACKEND", "postgres"));
        assert!(matches!(
            config(&vars),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        vars.push(("DATABASE_URL", "postgres://localhost/traysync"));
        assert_eq!(
            &StorageConfig::Postgres {
                database_url: "postgres://localhost/traysync".to_owned(),
                max_connections: 5
            },
            config(&vars).unwrap().storage()
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = FEEDS.to_vec();
        vars.push(("STORAGE_BACKEND", "redis"));
        assert!(matches!(
            config(&vars),
            Err(ConfigError::Invalid { key: "STORAGE_BACKEND", .. })
        ));

        let mut vars = FEEDS.to_vec();
        vars.push(("FETCH_TIMEOUT_MS", "soon"));
        assert!(matches!(
            config(&vars),
            Err(ConfigError::Invalid { key: "FETCH_TIMEOUT_MS", .. })
        ));

        assert!(matches!(
            config(&FEEDS[..1]),
            Err(ConfigError::Missing("CONFIG_FEED_URL"))
        ));
    }
}
