//! Item CRUD orchestration over the store and the read-through cache.
//!
//! The cache holds serialized item snapshots under `item_{id}` keys. Reads
//! populate it lazily; every mutation invalidates the entry for its id
//! before the caller sees a success response. The store and the cache only
//! offer atomic single-key operations, so there is no transaction spanning
//! both: between a store update and the cache delete a concurrent retrieve
//! can repopulate the pre-update snapshot. That window is accepted and
//! bounded by the entry TTL; closing it would require a transactional
//! boundary this system does not have.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::repos::{ItemsRepo, NewItemParams, RepoError, UpdateItemParams};
use crate::cache::{TtlCache, item_key};
use crate::domain::entities::ItemRecord;
use crate::domain::validate::{BLANK, FieldErrors, REQUIRED};

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("item not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ItemError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            RepoError::Duplicate { .. } => {
                let mut errors = FieldErrors::new();
                errors.push("name", "An item with this name already exists.");
                Self::Validation(errors)
            }
            other => Self::Repo(other),
        }
    }
}

/// Raw item input from the wire; absence is reported per field.
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemInput {
    fn validated(self) -> Result<(String, String), ItemError> {
        let mut errors = FieldErrors::new();

        let name = match self.name {
            None => {
                errors.push("name", REQUIRED);
                String::new()
            }
            Some(name) if name.trim().is_empty() => {
                errors.push("name", BLANK);
                name
            }
            Some(name) => name,
        };
        let description = match self.description {
            None => {
                errors.push("description", REQUIRED);
                String::new()
            }
            Some(description) if description.is_empty() => {
                errors.push("description", BLANK);
                description
            }
            Some(description) => description,
        };

        errors
            .into_result()
            .map_err(ItemError::Validation)
            .map(|()| (name, description))
    }
}

pub struct ItemService {
    items: Arc<dyn ItemsRepo>,
    cache: Arc<TtlCache>,
    item_ttl: Duration,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemsRepo>, cache: Arc<TtlCache>, item_ttl: Duration) -> Self {
        Self {
            items,
            cache,
            item_ttl,
        }
    }

    /// Always reads the store; list results are never cached.
    pub async fn list(&self) -> Result<Vec<ItemRecord>, ItemError> {
        self.items.list_items().await.map_err(ItemError::from)
    }

    /// Read-through lookup: a cached snapshot is returned verbatim even if
    /// the store has since changed outside this service's mutation path,
    /// bounded by the entry TTL. A miss reads the store and populates the
    /// cache only when the item exists.
    pub async fn retrieve(&self, id: i64) -> Result<ItemRecord, ItemError> {
        let key = item_key(id);

        if let Some(snapshot) = self.cache.get(&key) {
            match serde_json::from_slice(&snapshot) {
                Ok(item) => return Ok(item),
                Err(err) => {
                    warn!(
                        target: "curio::items",
                        key = %key,
                        error = %err,
                        "dropping undecodable cache entry"
                    );
                    self.cache.delete(&key);
                }
            }
        }

        let item = self
            .items
            .find_item(id)
            .await?
            .ok_or(ItemError::NotFound)?;

        match serde_json::to_vec(&item) {
            Ok(snapshot) => self.cache.set(key, Bytes::from(snapshot), self.item_ttl),
            Err(err) => warn!(
                target: "curio::items",
                item_id = id,
                error = %err,
                "failed to serialize item snapshot; serving uncached"
            ),
        }

        Ok(item)
    }

    /// Create never touches the cache: no entry can exist for an id the
    /// store has not assigned yet.
    pub async fn create(&self, input: ItemInput) -> Result<ItemRecord, ItemError> {
        let (name, description) = input.validated()?;
        let item = self
            .items
            .create_item(NewItemParams { name, description })
            .await?;
        info!(target: "curio::items", item_id = item.id, "created item");
        Ok(item)
    }

    /// Store write first; the cache entry is dropped only after the store
    /// confirms, and before this function returns. No caller observes a
    /// stale entry after receiving the updated item.
    pub async fn update(&self, id: i64, input: ItemInput) -> Result<ItemRecord, ItemError> {
        let (name, description) = input.validated()?;
        let item = self
            .items
            .update_item(UpdateItemParams {
                id,
                name,
                description,
            })
            .await?;

        self.cache.delete(&item_key(id));
        info!(target: "curio::items", item_id = id, "updated item");
        Ok(item)
    }

    /// Cache delete and store delete are both idempotent on absence, so
    /// either order is safe; the entry must be gone by the time the caller
    /// sees success so a later retrieve cannot resurrect the item.
    pub async fn delete(&self, id: i64) -> Result<(), ItemError> {
        self.cache.delete(&item_key(id));
        self.items.delete_item(id).await?;
        info!(target: "curio::items", item_id = id, "deleted item");
        Ok(())
    }
}
