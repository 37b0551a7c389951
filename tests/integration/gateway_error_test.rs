//! Gateway failures surface as route errors and leave the catalog alone

use super::{apisix_config, get_free_port, MockGateway, TestApp};
use gatewayctl_core::{ApisixGateway, MemoryCatalog};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::test]
async fn test_rejected_register_is_route_error() {
    let app = TestApp::spawn().await;
    app.gateway.set_reject(true);

    let (status, body) = app
        .post("/plugins/register", json!({"id": "svc-a", "extra": ""}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 100_101);
    assert!(body["msg"]
        .as_str()
        .unwrap()
        .contains("route rejected by test"));

    let (_, body) = app.get("/plugins/list").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_rejected_unregister_keeps_plugin_active() {
    let app = TestApp::spawn().await;
    app.post("/plugins/register", json!({"id": "svc-a", "extra": ""}))
        .await;

    app.gateway.set_reject(true);
    let (_, body) = app
        .post("/plugins/unregister", json!({"id": "svc-a"}))
        .await;
    assert_eq!(body["code"], 100_101);

    let (_, body) = app.get("/plugins/svc-a").await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["deleted"], false);
}

#[tokio::test]
async fn test_unreachable_gateway_is_route_error() {
    let dead: SocketAddr = format!("127.0.0.1:{}", get_free_port()).parse().unwrap();
    let gateway = ApisixGateway::new(&apisix_config(dead)).unwrap();
    let catalog = Arc::new(MemoryCatalog::new());
    let app = TestApp::spawn_with(Arc::new(gateway), catalog.clone(), MockGateway::default()).await;

    let (status, body) = app
        .post("/plugins/register", json!({"id": "svc-a", "extra": ""}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 100_101);
    assert!(catalog.is_empty().await);
}
