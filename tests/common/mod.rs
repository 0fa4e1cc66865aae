#![allow(dead_code)]

use porkbun::{Client, Credentials};
use serde_json::{Value, json};
use wiremock::{MockServer, Request};

pub const API_KEY: &str = "pk1_test";
pub const SECRET_KEY: &str = "sk1_test";

pub fn keys() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY)
}

/// A client with default credentials, pointed at the given mock server.
pub fn client(server: &MockServer) -> Client {
    let mut client = Client::with_credentials(keys()).expect("http client");
    client.set_base_url(server.uri());
    client
}

/// A `{"status":"SUCCESS", ...}` body with the given extra fields.
pub fn success(fields: Value) -> Value {
    let mut body = json!({ "status": "SUCCESS" });
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), fields) {
        body.extend(fields);
    }
    body
}

pub fn error(message: &str) -> Value {
    json!({ "status": "ERROR", "message": message })
}

pub fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}

pub fn record(id: u64, name: &str, typ: &str, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "type": typ,
        "content": content,
        "ttl": "600",
        "prio": "0",
        "notes": "",
    })
}
