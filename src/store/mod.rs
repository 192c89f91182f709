mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::resource::ResourceDef;

/// A row as column name → JSON value.
pub type Record = Map<String, Value>;

/// Table access used by the resource services.
///
/// Table and column names come from validated resource definitions; values
/// are always bound as parameters.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates the table for `def` if it does not exist yet.
    async fn ensure_table(&self, def: &ResourceDef) -> Result<(), StoreError>;
    /// All rows ordered by `id`.
    async fn select_all(&self, table: &str) -> Result<Vec<Record>, StoreError>;
    async fn select_by_id(&self, table: &str, id: i64) -> Result<Option<Record>, StoreError>;
    /// Inserts `record` and returns the stored row, including its `id`.
    async fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError>;
    /// Returns the number of rows changed.
    async fn update(&self, table: &str, id: i64, record: Record) -> Result<usize, StoreError>;
    /// Returns the number of rows removed.
    async fn delete(&self, table: &str, id: i64) -> Result<usize, StoreError>;
}
