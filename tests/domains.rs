mod common;

use porkbun::{Error, ForwardType, UpdateNameServerOptions, UrlForwardOptions, YesNo};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use self::common::{body_of, client, error, success};

fn domains(offset: usize, count: usize) -> Value {
    let domains: Vec<_> = (offset..offset + count)
        .map(|i| {
            json!({
                "domain": format!("domain-{i}.com"),
                "status": "ACTIVE",
                "tld": "com",
                "createDate": "2021-03-04 05:06:07",
                "expireDate": "2026-03-04 05:06:07",
                "securityLock": "1",
                "whoisPrivacy": "1",
                "autoRenew": "0",
                "notLocal": 0,
            })
        })
        .collect();
    success(json!({ "domains": domains }))
}

async fn mount_page(server: &MockServer, start: usize, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/domain/listAll"))
        .and(body_partial_json(json!({ "start": start })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn get_all_domains_walks_pages_until_empty() {
    let server = MockServer::start().await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(domains(0, 1000))).await;
    mount_page(&server, 1000, ResponseTemplate::new(200).set_body_json(domains(1000, 1000))).await;
    mount_page(&server, 2000, ResponseTemplate::new(200).set_body_json(domains(2000, 437))).await;
    mount_page(&server, 3000, ResponseTemplate::new(200).set_body_json(domains(3000, 0))).await;

    let all = client(&server).get_all_domains(None).await.unwrap();

    assert_eq!(all.len(), 2437);
    assert_eq!(all[0].domain, "domain-0.com");
    assert_eq!(all[2436].domain, "domain-2436.com");

    let offsets: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| body_of(req)["start"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, [0, 1000, 2000, 3000]);
}

#[tokio::test]
async fn get_all_domains_keeps_partial_results_on_failure() {
    let server = MockServer::start().await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(domains(0, 1000))).await;
    mount_page(&server, 1000, ResponseTemplate::new(503).set_body_json(error("Service unavailable"))).await;

    let err = client(&server).get_all_domains(None).await.unwrap_err();

    assert_eq!(err.offset, 1000);
    assert_eq!(err.domains.len(), 1000);
    assert_eq!(err.source.to_string(), "Service unavailable");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn get_all_domains_with_empty_account() {
    let server = MockServer::start().await;
    mount_page(&server, 0, ResponseTemplate::new(200).set_body_json(domains(0, 0))).await;

    let all = client(&server).get_all_domains(None).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn pricing_is_an_unauthenticated_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pricing/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "pricing": {
                "com": { "registration": "9.68", "renewal": "9.68", "transfer": "9.68" },
                "dev": { "registration": "10.81", "renewal": "10.81", "transfer": "10.81" },
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let pricing = client(&server).get_domain_pricing().await.unwrap();

    assert_eq!(pricing.len(), 2);
    assert_eq!(pricing["dev"].registration, "10.81");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn update_name_servers_sends_ns_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domain/updateNs/example.com"))
        .and(body_json(json!({
            "apikey": "pk1_test",
            "secretapikey": "sk1_test",
            "ns": ["ns1.example.net", "ns2.example.net"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let options = UpdateNameServerOptions::new("example.com", ["ns1.example.net", "ns2.example.net"]);
    client(&server).update_name_servers(&options).await.unwrap();
}

#[tokio::test]
async fn get_name_servers_returns_list_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domain/getNs/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "ns": ["curitiba.ns.porkbun.com", "fortaleza.ns.porkbun.com", "maceio.ns.porkbun.com"]
        }))))
        .mount(&server)
        .await;

    let ns = client(&server).get_name_servers("example.com", None).await.unwrap();
    assert_eq!(ns, ["curitiba.ns.porkbun.com", "fortaleza.ns.porkbun.com", "maceio.ns.porkbun.com"]);
}

#[tokio::test]
async fn url_forward_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/domain/addUrlForward/example.com"))
        .and(body_partial_json(json!({
            "subdomain": "blog",
            "location": "https://blog.example.net",
            "type": "permanent",
            "includePath": "yes",
            "wildcard": "no",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domain/getUrlForwarding/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "forwards": [{
                "id": "22049209",
                "subdomain": "blog",
                "location": "https://blog.example.net",
                "type": "permanent",
                "includePath": "yes",
                "wildcard": "no",
            }]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domain/deleteUrlForward/example.com/22049209"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let options = UrlForwardOptions::new("example.com", "https://blog.example.net", ForwardType::Permanent)
        .subdomain("blog")
        .include_path(true);
    client.create_url_forward(&options).await.unwrap();

    let forwards = client.get_url_forwards("example.com", None).await.unwrap();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].forward_type, ForwardType::Permanent);
    assert_eq!(forwards[0].include_path, YesNo::Yes);
    assert!(!bool::from(forwards[0].wildcard));

    client.delete_url_forward("example.com", &forwards[0].id, None).await.unwrap();
}

#[tokio::test]
async fn unexpected_error_page_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).get_name_servers("example.com", None).await.unwrap_err();

    match err {
        Error::UnexpectedResponse { http_status, body } => {
            assert_eq!(http_status.as_u16(), 502);
            assert_eq!(body, "Bad Gateway");
        },
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
}
