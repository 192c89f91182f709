use std::sync::Arc;

use log::info;

use crate::resource::ResourceDef;
use crate::store::{Record, Store, StoreError};

/// CRUD operations for one resource against the injected store.
pub struct ResourceService {
    def: ResourceDef,
    store: Arc<dyn Store>,
}

impl ResourceService {
    pub fn new(def: ResourceDef, store: Arc<dyn Store>) -> Self {
        Self { def, store }
    }

    pub fn def(&self) -> &ResourceDef {
        &self.def
    }

    /// Creates the backing table if it is missing.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.store.ensure_table(&self.def).await?;
        info!(
            "Resource '{}' mounted at {} (table {})",
            self.def.name, self.def.path, self.def.table
        );
        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<Record>, StoreError> {
        self.store.select_all(&self.def.table).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Record>, StoreError> {
        self.store.select_by_id(&self.def.table, id).await
    }

    pub async fn insert(&self, record: Record) -> Result<Record, StoreError> {
        self.store.insert(&self.def.table, record).await
    }

    pub async fn delete(&self, id: i64) -> Result<usize, StoreError> {
        self.store.delete(&self.def.table, id).await
    }

    pub async fn update(&self, id: i64, fields: Record) -> Result<usize, StoreError> {
        self.store.update(&self.def.table, id, fields).await
    }
}
