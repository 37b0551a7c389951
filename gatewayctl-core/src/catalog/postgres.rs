use super::{CatalogError, NewPlugin, PluginCatalog, PluginView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatewayctl_common::PostgresConfig;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::info;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS plugin (
        id          TEXT PRIMARY KEY,
        url         TEXT NOT NULL UNIQUE,
        extra       JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        deleted     BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

#[derive(Debug, sqlx::FromRow)]
struct PluginRow {
    id: String,
    url: String,
    extra: Json<Value>,
    updated_at: DateTime<Utc>,
    deleted: bool,
}

impl From<PluginRow> for PluginView {
    fn from(row: PluginRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            extra: row.extra.0,
            updated_at: row.updated_at,
            deleted: row.deleted,
        }
    }
}

/// PostgreSQL catalog backed by the `plugin` table
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Open a connection pool sized from configuration.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_open_connections)
            .min_connections(config.min_connections())
            .max_lifetime(config.max_lifetime())
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_open_connections,
            min_connections = config.min_connections(),
            "PostgreSQL pool ready"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `plugin` table if it does not exist.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("plugin table migrated");
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PluginCatalog for PgCatalog {
    async fn create(&self, plugin: NewPlugin) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO plugin (id, url, extra, created_at, updated_at, deleted)
            VALUES ($1, $2, $3, now(), now(), FALSE)
            "#,
        )
        .bind(&plugin.id)
        .bind(&plugin.url)
        .bind(Json(&plugin.extra))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, id: &str) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            UPDATE plugin
            SET deleted = TRUE, updated_at = now()
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<PluginView, CatalogError> {
        let row = sqlx::query_as::<_, PluginRow>(
            r#"
            SELECT id, url, extra, updated_at, deleted
            FROM plugin
            WHERE id = $1 AND deleted = FALSE
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PluginView::from)
            .ok_or_else(|| CatalogError::NotFound(format!("plugin {id} not found")))
    }

    async fn list(&self) -> Result<Vec<String>, CatalogError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM plugin WHERE deleted = FALSE")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
