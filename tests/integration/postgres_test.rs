//! Registration against a real PostgreSQL catalog
//!
//! Run with `GATEWAYCTL_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use super::TestApp;
use gatewayctl_common::PostgresConfig;
use gatewayctl_core::{CatalogError, NewPlugin, PgCatalog, PluginCatalog};
use serde_json::json;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

async fn connect() -> PgCatalog {
    let url = std::env::var("GATEWAYCTL_TEST_DATABASE_URL")
        .expect("GATEWAYCTL_TEST_DATABASE_URL must be set");
    let catalog = PgCatalog::connect(&PostgresConfig {
        url,
        max_open_connections: 5,
        max_idle_connections: 1,
        ..PostgresConfig::default()
    })
    .await
    .unwrap();
    catalog.migrate().await.unwrap();
    catalog
}

fn unique_id(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_postgres_register_lifecycle() {
    let catalog = connect().await;
    let app = TestApp::spawn_with_catalog(Arc::new(catalog.clone())).await;
    let id = unique_id("svc");

    let (_, body) = app
        .post(
            "/plugins/register",
            json!({"id": id, "extra": "{\"tier\":1}"}),
        )
        .await;
    assert_eq!(body["code"], 0);

    let (_, body) = app.get(&format!("/plugins/{id}")).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["extra"], json!({"tier": 1}));

    let (_, body) = app.get("/plugins/list").await;
    assert!(body["data"].as_array().unwrap().contains(&json!(id)));

    let (_, body) = app.post("/plugins/unregister", json!({"id": id})).await;
    assert_eq!(body["code"], 0);

    let (_, body) = app.get(&format!("/plugins/{id}")).await;
    assert_eq!(body["code"], 100_001);

    catalog.close().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_postgres_unique_url() {
    let catalog = connect().await;
    let id = unique_id("dup");
    let url = format!("/plugins/{id}");

    catalog
        .create(NewPlugin {
            id: id.clone(),
            url: url.clone(),
            extra: json!({}),
        })
        .await
        .unwrap();

    let err = catalog
        .create(NewPlugin {
            id: format!("{id}-other"),
            url,
            extra: json!({}),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    catalog.soft_delete(&id).await.unwrap();
    assert!(matches!(
        catalog.get(&id).await.unwrap_err(),
        CatalogError::NotFound(_)
    ));
    // Soft delete of an already deleted row is a no-op.
    catalog.soft_delete(&id).await.unwrap();

    catalog.close().await;
}
