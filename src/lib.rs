//! A typed async client for the [Porkbun](https://porkbun.com) domain registrar API.
//!
//! Every operation maps one method call onto one request against Porkbun's JSON API (v3). Requests go through a
//! single [`Client`], which owns the HTTP transport, the base URL and an optional set of default [`Credentials`].
//! Operations that accept credentials use the per-call value when one is given and fall back to the client's default
//! otherwise.
//!
//! ```no_run
//! # async fn run() -> porkbun::Result<()> {
//! use porkbun::{Client, Credentials, RecordOptions, RecordType};
//!
//! let client = Client::with_credentials(Credentials::new("pk1_...", "sk1_..."))?;
//!
//! let options = RecordOptions::new("example.com", RecordType::A).name("www").content("203.0.113.7");
//! let id = client.create_record(&options).await?;
//!
//! let record = client.get_record_by_id("example.com", id, None).await?;
//! assert_eq!(record.content, "203.0.113.7");
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! Nothing in this crate spawns tasks or retries. Dropping the future returned by an operation (for example through
//! `tokio::time::timeout`) abandons the request; the client itself is never modified by a request, so it is always
//! safe to keep using it afterwards.
//!
//! # Configuration and concurrency
//!
//! Requests borrow the client immutably while the setters ([`Client::set_credentials`], [`Client::set_use_ipv4`],
//! [`Client::set_base_url`]) need `&mut Client`. A configuration change can therefore never race with a request made
//! through the same client; applications that share a client across tasks decide themselves how to serialize changes.

mod client;
mod domains;
mod error;
mod model;
mod records;
mod ssl;

pub use self::client::{Client, Credentials};
pub use self::domains::{
    Domain, ForwardType, ParseForwardTypeError, Pricing, UpdateNameServerOptions, UrlForward, UrlForwardOptions, YesNo,
};
pub use self::error::{ApiError, Error, ListDomainsError, Result};
pub use self::records::{ParseRecordTypeError, Record, RecordOptions, RecordType};
pub use self::ssl::SslBundle;

/// Hostname of Porkbun's API, reachable over both IPv4 and IPv6.
pub const API_HOST: &str = "porkbun.com";

/// Hostname of Porkbun's API that only resolves to IPv4 addresses.
pub const API_HOST_V4: &str = "api-ipv4.porkbun.com";

/// Path under which version 3 of the JSON API lives on either host.
pub const API_PATH: &str = "/api/json/v3";

/// Smallest TTL, in seconds, that Porkbun accepts for a DNS record. It is also the default when no TTL is sent.
pub const MIN_TTL: u32 = 600;
