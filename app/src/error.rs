use serde::Serialize;
use thiserror::Error;
use traysync_core::{error::ParseError, TrayId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{feed} feed timed out")]
    Timeout { feed: String },
    #[error("{feed} feed answered with status {status}")]
    Status { feed: String, status: u16 },
    #[error("{feed} feed unreachable: {source}")]
    Unreachable {
        feed: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed building http client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DBError),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(DBError::from(err))
    }
}

/// Discriminant the request layer maps onto its own status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fetch,
    Parse,
    Storage,
    NotFound,
}

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("No record for tray {0}")]
    NotFound(TrayId),
}

impl ObserverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ObserverError::Fetch(_) => ErrorKind::Fetch,
            ObserverError::Parse(_) => ErrorKind::Parse,
            ObserverError::Storage(_) => ErrorKind::Storage,
            ObserverError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Fetch and storage failures, everything else is a data problem
    pub fn is_internal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fetch | ErrorKind::Storage)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Couldn't bind webserver: {0}")]
    Server(#[from] warp::Error),
}
