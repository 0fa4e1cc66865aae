use reqwest::StatusCode;
use serde::Deserialize;

use crate::domains::Domain;

/// Shorthand for results returned by [`Client`][crate::Client] operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The body Porkbun sends back when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Almost always `"ERROR"`.
    pub status: String,
    /// Human-readable description of what went wrong.
    pub message: String,
}

/// Everything that can go wrong while talking to Porkbun.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never completed: connection, TLS or body read failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Porkbun rejected the request and explained why.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Porkbun answered with something that is neither a success nor its usual error body.
    #[error("Porkbun API returned an invalid/unexpected response (HTTP {http_status})")]
    UnexpectedResponse { http_status: StatusCode, body: String },

    /// The request succeeded but its payload did not have the expected shape.
    #[error("failed to parse Porkbun API response")]
    MalformedResponse(#[source] serde_json::Error),

    /// A request payload could not be turned into a JSON object.
    #[error("failed to encode request payload")]
    Encode(#[source] serde_json::Error),

    /// A lookup for a single record came back empty.
    #[error("no record with ID {id} exists for {domain}")]
    NotFound { domain: String, id: String },

    /// An operation that addresses a record by ID was given options without one.
    #[error("record options for {domain} are missing a record ID")]
    MissingRecordId { domain: String },
}

impl Error {
    /// The message Porkbun attached to its error response, if this error came from one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api(err) => Some(&err.message),
            _ => None,
        }
    }
}

/// Failure partway through listing every domain on an account.
///
/// Domains from the pages that were retrieved before the failure are kept in [`domains`][Self::domains].
#[derive(Debug, thiserror::Error)]
#[error("failed to list domains starting at offset {offset}")]
pub struct ListDomainsError {
    pub domains: Vec<Domain>,
    pub offset: usize,
    #[source]
    pub source: Error,
}

impl ListDomainsError {
    /// Splits this error into the domains retrieved so far and the error that stopped retrieval.
    pub fn into_parts(self) -> (Vec<Domain>, Error) {
        (self.domains, self.source)
    }
}
