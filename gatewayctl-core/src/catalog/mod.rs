//! Plugin catalog: the persistent plugin → route mapping.
//!
//! Rows are soft deleted. A deleted row keeps its `id` and `url`, so both
//! stay reserved by the unique constraints and cannot be registered again.

mod memory;
mod postgres;

pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a catalog backend
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A unique constraint (`id` or `url`) rejected the write
    #[error("{0}")]
    Conflict(String),

    /// No active row matched
    #[error("{0}")]
    NotFound(String),

    /// Connectivity, pool or query failure
    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CatalogError::Conflict(db.message().to_string())
            }
            sqlx::Error::RowNotFound => CatalogError::NotFound("record not found".to_string()),
            _ => CatalogError::Backend(err.to_string()),
        }
    }
}

/// Lifecycle of a catalog row. Rows only ever move from `Active` to `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Deleted,
}

impl Lifecycle {
    pub fn from_deleted(deleted: bool) -> Self {
        if deleted {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        }
    }

    pub fn is_deleted(self) -> bool {
        self == Lifecycle::Deleted
    }
}

/// Row to insert on registration
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlugin {
    pub id: String,
    /// Public route path at the gateway
    pub url: String,
    pub extra: Value,
}

/// A stored row, including soft-deleted ones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginRecord {
    pub id: String,
    pub url: String,
    pub extra: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Active plugin as returned to API callers. The creation time is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginView {
    pub id: String,
    pub url: String,
    pub extra: Value,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
}

impl From<&PluginRecord> for PluginView {
    fn from(record: &PluginRecord) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            extra: record.extra.clone(),
            updated_at: record.updated_at,
            deleted: record.lifecycle.is_deleted(),
        }
    }
}

/// Durable bookkeeping of registered plugins
#[async_trait]
pub trait PluginCatalog: Send + Sync {
    /// Insert a new row. Fails with [`CatalogError::Conflict`] if the `id` or
    /// `url` is already taken, deleted rows included.
    async fn create(&self, plugin: NewPlugin) -> Result<(), CatalogError>;

    /// Mark the active row for `id` as deleted. Matching no row is success.
    async fn soft_delete(&self, id: &str) -> Result<(), CatalogError>;

    /// The active row for `id`.
    async fn get(&self, id: &str) -> Result<PluginView, CatalogError>;

    /// Ids of all active rows, in the store's scan order.
    async fn list(&self) -> Result<Vec<String>, CatalogError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}
