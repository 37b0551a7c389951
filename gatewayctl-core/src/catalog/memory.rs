use super::{CatalogError, Lifecycle, NewPlugin, PluginCatalog, PluginRecord, PluginView};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process catalog with the same constraint semantics as the `plugin`
/// table: `id` and `url` are unique across active and deleted rows, and rows
/// are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    rows: Arc<RwLock<Vec<PluginRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored row for `id`, whatever its lifecycle.
    pub async fn record(&self, id: &str) -> Option<PluginRecord> {
        self.rows.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored rows, deleted ones included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl PluginCatalog for MemoryCatalog {
    async fn create(&self, plugin: NewPlugin) -> Result<(), CatalogError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id == plugin.id) {
            return Err(CatalogError::Conflict(
                r#"duplicate key value violates unique constraint "plugin_pkey""#.to_string(),
            ));
        }
        if rows.iter().any(|r| r.url == plugin.url) {
            return Err(CatalogError::Conflict(
                r#"duplicate key value violates unique constraint "plugin_url_key""#.to_string(),
            ));
        }

        let now = Utc::now();
        rows.push(PluginRecord {
            id: plugin.id,
            url: plugin.url,
            extra: plugin.extra,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        });
        Ok(())
    }

    async fn soft_delete(&self, id: &str) -> Result<(), CatalogError> {
        let mut rows = self.rows.write().await;
        if let Some(row) = rows
            .iter_mut()
            .find(|r| r.id == id && r.lifecycle == Lifecycle::Active)
        {
            row.lifecycle = Lifecycle::Deleted;
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<PluginView, CatalogError> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|r| r.id == id && r.lifecycle == Lifecycle::Active)
            .map(PluginView::from)
            .ok_or_else(|| CatalogError::NotFound(format!("plugin {id} not found")))
    }

    async fn list(&self) -> Result<Vec<String>, CatalogError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.lifecycle == Lifecycle::Active)
            .map(|r| r.id.clone())
            .collect())
    }
}
