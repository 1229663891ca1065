//! HTTP tests for GET /ephemeris, driven through the router with oneshot.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use orrery_engine::BatchPayload;
use orrery_server::config::ServerConfig;
use orrery_server::router::build_router;

fn app() -> axum::Router {
    build_router(ServerConfig {
        bind_addr: "127.0.0.1:0".into(),
        max_limit: 100,
    })
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn batch_has_one_record_per_day() {
    let (status, body) = get("/ephemeris?start=2451545&step=1&limit=5").await;
    assert_eq!(status, StatusCode::OK);

    let payload: BatchPayload = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload.len(), 5);

    let records = payload.records().unwrap();
    assert_eq!(records[0].day_number, 2451545.0);
    assert_eq!(records[4].day_number, 2451549.0);
    for record in &records {
        assert_eq!(record.positions.len(), 9);
        assert!(record.positions.contains_key("earth"));
    }
}

#[tokio::test]
async fn wire_format_uses_camel_case_key() {
    let (status, body) = get("/ephemeris?start=2451545&step=10&limit=2").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let days = json["planetPositionArrays"].as_object().unwrap();
    assert!(days.contains_key("2451545"));
    assert!(days.contains_key("2451555"));
    let earth = days["2451545"]["earth"].as_array().unwrap();
    assert_eq!(earth.len(), 3);
}

#[tokio::test]
async fn earth_is_about_one_au_out() {
    let (_, body) = get("/ephemeris?start=2451545&step=1&limit=1").await;
    let payload: BatchPayload = serde_json::from_slice(&body).unwrap();
    let records = payload.records().unwrap();
    let earth = records[0].positions["earth"];
    assert!((earth.length() - 1.0).abs() < 0.03, "earth at {}", earth.length());
}

#[tokio::test]
async fn limit_over_cap_is_rejected() {
    let (status, body) = get("/ephemeris?start=2451545&step=1&limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn zero_step_is_rejected() {
    let (status, _) = get("/ephemeris?start=2451545&step=0&limit=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_params_are_rejected_as_json() {
    let (status, body) = get("/ephemeris?start=2451545").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("invalid query"));
}
