use reqwest::{Client, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use wellness_engine::{Config, MemoryEntryStore, StoreBackend};
use wellness_journal_mcp::WellnessMcpHandler;
use wellness_journal_mcp::http::{ACCESS_KEY_HEADER, AppState, DEFAULT_MAX_BODY_SIZE, router};

async fn spawn_app() -> SocketAddr {
    let config = Config {
        backend: StoreBackend::Memory,
        ..Config::default()
    };
    let handler = WellnessMcpHandler::from_config(Arc::new(MemoryEntryStore::new()), &config);
    // a detached recorder; tests must not install a global one
    let metrics = PrometheusBuilder::new().build_recorder().handle();
    let state = Arc::new(AppState {
        service: handler.service().clone(),
        metrics,
        store_label: "memory",
    });
    let app = router(state, handler, DEFAULT_MAX_BODY_SIZE);

    // bind to ephemeral port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::serve(listener, app.into_make_service());
    tokio::spawn(async move {
        server.await.ok();
    });
    addr
}

#[tokio::test]
async fn e2e_health_and_metrics() {
    let addr = spawn_app().await;
    let http = Client::new();

    let res = http
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ready"], true);
    assert_eq!(body["store"], "memory");

    let res = http
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
}

#[tokio::test]
async fn e2e_store_fetch_and_analyze() {
    let addr = spawn_app().await;
    let http = Client::new();

    let res = http
        .post(format!("http://{}/entries", addr))
        .header(ACCESS_KEY_HEADER, "hunter2")
        .json(&serde_json::json!({
            "date": "2025-07-02",
            "mood": {"mood_score": 3},
            "sleep": {"hours": 4, "quality": 3},
            "mental_health": {"stress_level": 9, "anxiety_level": 5}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let stored: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stored["receipt"]["encrypted"], true);
    let id = stored["receipt"]["id"].as_str().unwrap().to_string();

    // sealed record without a key
    let res = http
        .get(format!("http://{}/entries/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = http
        .get(format!("http://{}/entries/{}", addr, id))
        .header(ACCESS_KEY_HEADER, "hunter2")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["entry"]["mood"]["mood_score"], 3);

    let res = http
        .get(format!("http://{}/entries", addr))
        .query(&[("limit", "5")])
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed["total"], 1);

    let res = http
        .post(format!("http://{}/analysis", addr))
        .json(&serde_json::json!({
            "entry": {"date": "2025-07-03", "sleep": {"hours": 3}},
            "history": []
        }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let analysis: serde_json::Value = res.json().await.unwrap();
    let kinds: Vec<_> = analysis["risks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["kind"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(kinds.iter().any(|k| k == "sleep_deprivation"));
}

#[tokio::test]
async fn e2e_unknown_entry_is_404() {
    let addr = spawn_app().await;
    let res = Client::new()
        .get(format!("http://{}/entries/WAL-1-ABCDEFGH", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
