use std::collections::HashMap;

use policy_sync::{
    DecodeError, FetchError, FetchEvent, FetchProvider, FetchedData, FetcherConfig,
    FetcherRegister, HttpFetcherConfig,
};
use policy_sync_http::{register_provider, HttpFetchProvider};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event_for(server: &MockServer, route: &str) -> FetchEvent {
    FetchEvent::new(format!("{}{route}", server.uri()))
}

fn event_with_config(server: &MockServer, route: &str, config: HttpFetcherConfig) -> FetchEvent {
    FetchEvent::with_config(
        format!("{}{route}", server.uri()),
        FetcherConfig::HttpGet(config),
    )
}

#[tokio::test]
async fn fetches_and_parses_json_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/policy-data/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"alice": {"role": "admin"}}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let provider = HttpFetchProvider::new(event_for(&server, "/policy-data/users"));
    let data = provider.retrieve().await.unwrap();

    assert_eq!(data.as_json().unwrap()["alice"]["role"], "admin");
}

#[tokio::test]
async fn forwards_configured_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/policy-data"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let mut headers = HashMap::new();
    headers.insert("authorization".to_owned(), "Bearer secret".to_owned());

    let provider = HttpFetchProvider::new(event_with_config(
        &server,
        "/policy-data",
        HttpFetcherConfig {
            headers: Some(headers),
            ..HttpFetcherConfig::default()
        },
    ));

    // The mock only matches when the header arrives; an unmatched request
    // would come back as a 404 body that fails JSON parsing.
    let data = provider.retrieve().await.unwrap();
    assert!(data.as_json().unwrap().as_object().unwrap().is_empty());
}

#[tokio::test]
async fn decodes_text_when_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/banner"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text body"))
        .mount(&server)
        .await;

    let provider = HttpFetchProvider::new(event_with_config(
        &server,
        "/banner",
        HttpFetcherConfig {
            is_json: false,
            ..HttpFetcherConfig::default()
        },
    ));

    let data = provider.retrieve().await.unwrap();
    assert_eq!(data.as_text(), Some("plain text body"));
}

#[tokio::test]
async fn raw_mode_exposes_status_instead_of_failing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let provider = HttpFetchProvider::new(event_with_config(
        &server,
        "/flaky",
        HttpFetcherConfig {
            process_data: false,
            ..HttpFetcherConfig::default()
        },
    ));

    let data = provider.retrieve().await.unwrap();
    match data {
        FetchedData::Raw(document) => {
            assert_eq!(document.status, Some(503));
            assert_eq!(document.body, b"upstream down");
        }
        other => panic!("expected raw document, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_surfaces_as_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let provider = HttpFetchProvider::new(event_for(&server, "/broken"));
    let result = provider.retrieve().await;

    assert!(matches!(
        result,
        Err(FetchError::Decode(DecodeError::Json(_)))
    ));
}

#[tokio::test]
async fn unreachable_server_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let provider = HttpFetchProvider::new(FetchEvent::new(format!("{uri}/gone")));
    let result = provider.retrieve().await;

    assert!(matches!(result, Err(FetchError::Transport { .. })));
}

#[tokio::test]
async fn registry_builds_the_http_provider_for_events() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/policy-data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"count": 7}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let mut fetchers = FetcherRegister::new();
    register_provider(&mut fetchers);

    let provider = fetchers.build(event_for(&server, "/policy-data")).unwrap();
    let data = provider.retrieve().await.unwrap();

    assert_eq!(data.as_json().unwrap()["count"], 7);
}
