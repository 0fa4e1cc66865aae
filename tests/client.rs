mod common;

use std::time::Duration;

use porkbun::{Client, Credentials, Error};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use self::common::{body_of, client, error, keys, success};

#[tokio::test]
async fn ping_returns_public_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .and(body_json(json!({ "apikey": "pk1_test", "secretapikey": "sk1_test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({ "yourIp": "198.51.100.23" }))))
        .expect(1)
        .mount(&server)
        .await;

    let addr = client(&server).ping(None).await.unwrap();
    assert_eq!(addr.to_string(), "198.51.100.23");
}

#[tokio::test]
async fn requests_without_any_credentials_are_sent_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error("All HTTP request must contain API key and secret API key.")))
        .mount(&server)
        .await;

    let mut client = Client::new().unwrap();
    client.set_base_url(server.uri());
    let err = client.ping(None).await.unwrap_err();

    assert_eq!(err.api_message(), Some("All HTTP request must contain API key and secret API key."));
    let body = body_of(&server.received_requests().await.unwrap()[0]);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn new_default_credentials_apply_to_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({ "yourIp": "198.51.100.23" }))))
        .mount(&server)
        .await;

    let mut client = client(&server);
    client.ping(None).await.unwrap();
    client.set_credentials(Credentials::new("pk1_rotated", "sk1_rotated"));
    client.ping(None).await.unwrap();
    client.ping(Some(&keys())).await.unwrap();

    let keys_sent: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| body_of(req)["apikey"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys_sent, ["pk1_test", "pk1_rotated", "pk1_test"]);
}

#[tokio::test]
async fn success_with_wrong_shape_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({ "yourIp": "not an address" }))))
        .mount(&server)
        .await;

    let err = client(&server).ping(None).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Nothing listens on port 1.
    let mut client = Client::with_credentials(keys()).unwrap();
    client.set_base_url("http://127.0.0.1:1");
    let err = client.ping(None).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn cancelled_request_leaves_client_usable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dns/retrieve/slow.example"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success(json!({ "records": [] })))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({ "yourIp": "198.51.100.23" }))))
        .mount(&server)
        .await;

    let client = client(&server);
    let slow = client.get_all_records("slow.example", None);
    assert!(tokio::time::timeout(Duration::from_millis(100), slow).await.is_err());

    assert_eq!(client.ping(None).await.unwrap().to_string(), "198.51.100.23");
    assert_eq!(client.credentials(), Some(&keys()));
}
