use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("connection lock poisoned")]
    Poisoned,
    #[error("empty record for table '{0}'")]
    EmptyRecord(String),
    #[error("row from table '{0}' has no integer id")]
    MissingId(String),
}
