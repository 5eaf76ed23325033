use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use v1_dashboard::device::{DeviceClient, DeviceError};
use v1_dashboard::domain::Band;

type Deleted = Arc<Mutex<Vec<String>>>;

async fn buffer() -> Json<Value> {
    Json(json!({
        "entries": [
            { "ts": 1_700_000_000, "freq": 24150, "str": "6", "dir": 1, "act": 1, "cnt": 2 },
            { "timestamp": 1_700_000_005, "frequency": 34700, "direction": 3, "active": false }
        ]
    }))
}

async fn logs() -> Json<Value> {
    Json(json!({ "files": [{ "name": "log_1.jsonl", "entries": 2, "size": 2048 }] }))
}

async fn log_file(Path(name): Path<String>) -> Result<String, StatusCode> {
    if name == "log_1.jsonl" {
        Ok("{\"ts\":1700000000,\"freq\":10525}\nnot json\n".to_string())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn delete_log(State(deleted): State<Deleted>, Path(name): Path<String>) -> StatusCode {
    if let Ok(mut deleted) = deleted.lock() {
        deleted.push(name);
    }
    StatusCode::OK
}

async fn flush() -> Json<Value> {
    Json(json!({ "message": "Flushed 2 entries" }))
}

async fn stats() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn gps_info() -> &'static str {
    "{\"hdop\": 1.2,"
}

async fn spawn_device() -> std::io::Result<(String, Deleted)> {
    let deleted = Deleted::default();
    let router = Router::new()
        .route("/api/buffer", get(buffer))
        .route("/api/logs", get(logs))
        .route("/api/logs/:filename", get(log_file).delete(delete_log))
        .route("/api/flush", post(flush))
        .route("/stats", get(stats))
        .route("/gps-info", get(gps_info))
        .with_state(Arc::clone(&deleted));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    Ok((format!("http://{addr}"), deleted))
}

#[tokio::test]
async fn buffer_accepts_both_field_spellings() -> Result<(), Box<dyn std::error::Error>> {
    let (url, _) = spawn_device().await?;
    let client = DeviceClient::new(&url, None)?;

    let entries = client.buffer().await?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].band(), Band::K);
    assert_eq!(entries[0].strength, Some(6.0));
    assert_eq!(entries[0].active, Some(true));
    assert_eq!(entries[1].band(), Band::Ka);
    assert_eq!(entries[1].timestamp, Some(1_700_000_005));
    Ok(())
}

#[tokio::test]
async fn log_listing_and_raw_file_text() -> Result<(), Box<dyn std::error::Error>> {
    let (url, _) = spawn_device().await?;
    let client = DeviceClient::new(&url, None)?;

    let files = client.log_files().await?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].entries, Some(2));
    assert!((files[0].size_kb() - 2.0).abs() < f64::EPSILON);

    let text = client.log_file("log_1.jsonl").await?;
    assert_eq!(text.lines().count(), 2);
    Ok(())
}

#[tokio::test]
async fn delete_and_flush_reach_the_device() -> Result<(), Box<dyn std::error::Error>> {
    let (url, deleted) = spawn_device().await?;
    let client = DeviceClient::new(&url, None)?;

    client.delete_log("log_1.jsonl").await?;
    let message = client.flush().await?;

    assert_eq!(message, "Flushed 2 entries");
    let deleted = deleted.lock().map_err(|e| e.to_string())?;
    assert_eq!(deleted.as_slice(), ["log_1.jsonl".to_string()]);
    Ok(())
}

#[tokio::test]
async fn error_statuses_and_bad_bodies_map_to_distinct_errors(
) -> Result<(), Box<dyn std::error::Error>> {
    let (url, _) = spawn_device().await?;
    let client = DeviceClient::new(&url, None)?;

    match client.stats().await {
        Err(DeviceError::HttpStatus { status, endpoint }) => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "/stats");
        }
        other => panic!("expected an HTTP status error, got {other:?}"),
    }

    let missing = client.log_file("missing.jsonl").await;
    assert!(matches!(missing, Err(DeviceError::HttpStatus { status: 404, .. })));

    let malformed = client.gps_info().await;
    assert!(matches!(malformed, Err(ref e @ DeviceError::MalformedResponse { .. }) if !e.is_network()));
    Ok(())
}
