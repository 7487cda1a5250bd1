//! Geocoding and forecast clients against a wiremock server.

use citytemp_core::{
    Coordinate, ErrorKind, ForecastSource, Geocoder, NominatimClient, OpenMeteoClient,
    config::user_agent_for,
};
use reqwest::Client;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTACT: &str = "ops@example.org";

fn geocoder(server: &MockServer) -> NominatimClient {
    NominatimClient::new(
        Client::new(),
        format!("{}/search", server.uri()),
        user_agent_for(CONTACT),
    )
}

fn forecaster(server: &MockServer) -> OpenMeteoClient {
    OpenMeteoClient::new(Client::new(), format!("{}/v1/forecast", server.uri()))
}

#[tokio::test]
async fn geocoder_sends_contact_header_and_italian_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Roma"))
        .and(query_param("format", "json"))
        .and(query_param("accept-language", "it"))
        .and(query_param("countrycodes", "it"))
        .and(header("user-agent", user_agent_for(CONTACT).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "41.8933203", "lon": "12.4829321", "display_name": "Roma, Lazio, Italia" },
            { "lat": "0", "lon": "0", "display_name": "somewhere else" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let coordinate = geocoder(&server).locate("Roma").await.unwrap();
    assert_eq!(
        coordinate,
        Coordinate { latitude: 41.8933203, longitude: 12.4829321 }
    );
}

#[tokio::test]
async fn geocoder_empty_result_is_lookup_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = geocoder(&server).locate("Atlantide").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[tokio::test]
async fn geocoder_empty_body_is_lookup_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = geocoder(&server).locate("Roma").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[tokio::test]
async fn geocoder_non_success_status_is_lookup_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("blocked: missing user agent"))
        .mount(&server)
        .await;

    let err = geocoder(&server).locate("Roma").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn geocoder_first_match_without_coordinates_is_lookup_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "display_name": "Roma" }
        ])))
        .mount(&server)
        .await;

    let err = geocoder(&server).locate("Roma").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[tokio::test]
async fn geocoder_unreachable_server_is_lookup_error() {
    let server = MockServer::start().await;
    let client = geocoder(&server);
    drop(server);

    let err = client.locate("Roma").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[tokio::test]
async fn forecast_requests_current_hourly_and_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "45.07"))
        .and(query_param("longitude", "7.68"))
        .and(query_param("current_weather", "true"))
        .and(query_param("timezone", "Europe/Rome"))
        .and(query_param("past_days", "2"))
        .and(query_param("hourly", "temperature_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": { "temperature": 6.5 },
            "hourly": { "time": ["2025-01-01T00:00"], "temperature_2m": [5.0] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = forecaster(&server)
        .forecast(Coordinate { latitude: 45.07, longitude: 7.68 }, 2)
        .await
        .unwrap();

    assert_eq!(payload.current_temperature().unwrap(), 6.5);
    assert_eq!(payload.hourly_series().unwrap().len(), 1);
}

#[tokio::test]
async fn forecast_error_status_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Parameter 'past_days' must be between 0 and 92"
        })))
        .mount(&server)
        .await;

    let err = forecaster(&server)
        .forecast(Coordinate { latitude: 45.07, longitude: 7.68 }, 500)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

#[tokio::test]
async fn forecast_non_json_body_is_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = forecaster(&server)
        .forecast(Coordinate { latitude: 45.07, longitude: 7.68 }, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}
