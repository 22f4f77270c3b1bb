#![allow(clippy::unwrap_used)]
// Integration tests for `GeoClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wifiradar_api::{Error, GeoClient};

async fn setup() -> (MockServer, GeoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GeoClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

#[tokio::test]
async fn test_locate_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("bssid", "aa:bb:cc:dd:ee:ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 50,
            "data": { "lon": 13.405, "lat": 52.52 }
        })))
        .mount(&server)
        .await;

    let point = client.locate("aa:bb:cc:dd:ee:ff").await.unwrap().unwrap();
    assert!((point.longitude - 13.405).abs() < f64::EPSILON);
    assert!((point.latitude - 52.52).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_locate_unknown_bssid_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 10,
            "data": null
        })))
        .mount(&server)
        .await;

    let point = client.locate("00:00:00:00:00:00").await.unwrap();
    assert_eq!(point, None);
}

#[tokio::test]
async fn test_locate_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.locate("aa:bb:cc:dd:ee:ff").await;
    assert!(
        matches!(result, Err(Error::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus error, got: {result:?}"
    );
}
