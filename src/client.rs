use std::fmt;
use std::net::IpAddr;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{ApiError, Error, Result};
use crate::model::PingResponse;
use crate::{API_HOST, API_HOST_V4, API_PATH};

type JsonObject = JsonMap<String, JsonValue>;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// An API key and secret key pair, as generated on Porkbun's account settings page.
///
/// Keys are sent in the body of every authenticated request as `apikey` and `secretapikey`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(rename = "apikey")]
    api_key: String,
    #[serde(rename = "secretapikey")]
    secret_api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    /// The public half of the pair, usually starting with `pk1_`.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The secret half of the pair, usually starting with `sk1_`.
    pub fn secret_api_key(&self) -> &str {
        &self.secret_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_api_key", &"<redacted>")
            .finish()
    }
}

/// The access point to the Porkbun API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    use_ipv4: bool,
    credentials: Option<Credentials>,
}

impl Client {
    /// Creates a client for the default (dual-stack) API host with no default credentials.
    pub fn new() -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .default_headers(HeaderMap::from_iter([(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )]))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::from_http(http))
    }

    /// Creates a client whose requests default to the given credentials.
    pub fn with_credentials(credentials: Credentials) -> Result<Self> {
        let mut client = Self::new()?;
        client.set_credentials(credentials);
        Ok(client)
    }

    /// Wraps an already-configured [`reqwest::Client`].
    pub fn from_http(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: api_url(false),
            use_ipv4: false,
            credentials: None,
        }
    }

    /// Replaces the credentials used by requests that don't supply their own.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Switches between the dual-stack API host and the IPv4-only one.
    ///
    /// The base URL is recomputed immediately, discarding any URL set through [`set_base_url`][Self::set_base_url].
    pub fn set_use_ipv4(&mut self, use_ipv4: bool) {
        self.use_ipv4 = use_ipv4;
        self.base_url = api_url(use_ipv4);
    }

    /// Points the client at a different API root, such as a local mock server. The URL should not end with a slash.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn use_ipv4(&self) -> bool {
        self.use_ipv4
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Determines the caller's public IP address using Porkbun's `/ping` endpoint.
    ///
    /// Doubles as a credential check, since the endpoint rejects bad keys. With IPv4 mode enabled the address is
    /// always an IPv4 one.
    pub async fn ping(&self, credentials: Option<&Credentials>) -> Result<IpAddr> {
        let res = self.post_authenticated::<PingResponse>("/ping", credentials).await?;
        Ok(res.your_ip)
    }

    /// Makes a POST request whose body is `payload` plus credentials, and parses the response as `R`.
    pub(crate) async fn post<P, R>(&self, path: &str, payload: &P, credentials: Option<&Credentials>) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.request_body(payload, credentials)?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Makes a POST request whose body holds nothing but credentials.
    pub(crate) async fn post_authenticated<R>(&self, path: &str, credentials: Option<&Credentials>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.post(path, &JsonObject::new(), credentials).await
    }

    /// Makes an unauthenticated GET request.
    pub(crate) async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.execute(Method::GET, path, None).await
    }

    /// Serializes `payload` into a JSON object and adds credentials to it: the given ones if present, otherwise the
    /// client's default. Without either, the body is sent unauthenticated and Porkbun will reject it.
    pub(crate) fn request_body<P>(&self, payload: &P, credentials: Option<&Credentials>) -> Result<JsonObject>
    where
        P: Serialize + ?Sized,
    {
        let mut body = match serde_json::to_value(payload).map_err(Error::Encode)? {
            JsonValue::Object(map) => map,
            JsonValue::Null => JsonObject::new(),
            other => {
                let msg = format!("payload must be a JSON object, got `{other}`");
                return Err(Error::Encode(serde::ser::Error::custom(msg)));
            },
        };

        if let Some(keys) = credentials.or(self.credentials.as_ref()) {
            body.insert("apikey".to_string(), JsonValue::from(keys.api_key()));
            body.insert("secretapikey".to_string(), JsonValue::from(keys.secret_api_key()));
        }

        Ok(body)
    }

    /// Sends a request to `path` (relative to the base URL) and parses the result.
    async fn execute<R>(&self, method: Method, path: &str, body: Option<JsonObject>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        log::debug!("{method} {path}");

        let url = format!("{}{path}", self.base_url);
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }

        // Read the body as text before parsing it ourselves; error bodies need a different shape than successes.
        let res = req.send().await?;
        let http_status = res.status();
        let text = res.text().await?;
        log::trace!("{path} responded with HTTP {http_status} ({} bytes)", text.len());

        parse_response(http_status, &text)
    }
}

/// Builds the API root for either host.
fn api_url(use_ipv4: bool) -> String {
    let host = if use_ipv4 { API_HOST_V4 } else { API_HOST };
    format!("https://{host}{API_PATH}")
}

/// Turns an HTTP status and raw body into either the requested payload or an [`Error`].
///
/// Every Porkbun response is an object with a `status` field. On success (`HTTP 200` and `"SUCCESS"`) the status is
/// removed and the remaining fields are parsed as `R`. Anything else is parsed as an [`ApiError`].
fn parse_response<R>(http_status: StatusCode, text: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    let unexpected = || Error::UnexpectedResponse {
        http_status,
        body: text.to_string(),
    };

    if http_status != StatusCode::OK {
        return match serde_json::from_str::<ApiError>(text) {
            Ok(err) => Err(err.into()),
            Err(_) => Err(unexpected()),
        };
    }

    match serde_json::from_str::<JsonValue>(text).map_err(Error::MalformedResponse)? {
        JsonValue::Object(mut map) if map.get_str("status") == Some("SUCCESS") => {
            map.remove("status");
            serde_json::from_value(JsonValue::Object(map)).map_err(Error::MalformedResponse)
        },
        json => match serde_json::from_value::<ApiError>(json) {
            Ok(err) => Err(err.into()),
            Err(_) => Err(unexpected()),
        },
    }
}

trait JsonObjectExt {
    /// Combines [`JsonMap::get`] and [`JsonValue::as_str`] into one method that only returns the value if it both
    /// exists and is a string.
    fn get_str(&self, key: &str) -> Option<&str>;
}

impl JsonObjectExt for JsonObject {
    #[inline]
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }
}
