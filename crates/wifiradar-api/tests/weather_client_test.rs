#![allow(clippy::unwrap_used)]
// Integration tests for `WeatherClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wifiradar_api::{Error, WeatherClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WeatherClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = WeatherClient::with_client(
        reqwest::Client::new(),
        base_url,
        "test-api-key".to_string().into(),
    );
    (server, client)
}

// ── Fetch tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_current_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", "test-api-key"))
        .and(query_param("q", "auto:ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "Somewhere" },
            "current": {
                "temp_c": 21.4,
                "humidity": 63,
                "precip_mm": 0.2,
                "wind_kph": 12.5
            }
        })))
        .mount(&server)
        .await;

    let current = client.current("auto:ip").await.unwrap();

    assert!((current.temp_c - 21.4).abs() < f64::EPSILON);
    assert!((current.humidity - 63.0).abs() < f64::EPSILON);
    assert_eq!(current.precip_mm, Some(0.2));
    assert!((current.wind_kph - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_current_without_precipitation() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temp_c": -3.0,
                "humidity": 80,
                "wind_kph": 30.1
            }
        })))
        .mount(&server)
        .await;

    let current = client.current("auto:ip").await.unwrap();
    assert_eq!(current.precip_mm, None);
}

#[tokio::test]
async fn test_current_non_2xx_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 2008, "message": "API key disabled" }
        })))
        .mount(&server)
        .await;

    let result = client.current("auto:ip").await;

    assert!(
        matches!(result, Err(Error::UnexpectedStatus { status: 403, .. })),
        "expected UnexpectedStatus error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_current_multibyte_body_near_preview_cut_is_error() {
    let (server, client) = setup().await;

    // 199 ASCII bytes, then a three-byte character straddling the
    // 200-byte mark. The error preview must not split it.
    let body = format!("{}€ and more garbage", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.current("auto:ip").await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_current_malformed_body_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let result = client.current("auto:ip").await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
