//! DNS record management: `/dns/*` endpoints.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::{Client, Credentials};
use crate::error::{Error, Result};
use crate::model::{Ack, number_or_string, primitive_as_string};

/// Types of DNS record Porkbun can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    MX,
    CNAME,
    ALIAS,
    TXT,
    NS,
    AAAA,
    SRV,
    TLSA,
    CAA,
}

impl RecordType {
    pub const ALL: [RecordType; 10] = [
        RecordType::A,
        RecordType::MX,
        RecordType::CNAME,
        RecordType::ALIAS,
        RecordType::TXT,
        RecordType::NS,
        RecordType::AAAA,
        RecordType::SRV,
        RecordType::TLSA,
        RecordType::CAA,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::MX => "MX",
            RecordType::CNAME => "CNAME",
            RecordType::ALIAS => "ALIAS",
            RecordType::TXT => "TXT",
            RecordType::NS => "NS",
            RecordType::AAAA => "AAAA",
            RecordType::SRV => "SRV",
            RecordType::TLSA => "TLSA",
            RecordType::CAA => "CAA",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`RecordType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown DNS record type `{0}`")]
pub struct ParseRecordTypeError(String);

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    /// Parses a record type, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|typ| typ.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRecordTypeError(s.to_string()))
    }
}

/// Describes a record to create or edit, or a set of records to select by subdomain and type.
///
/// Fields that are empty or `None` are left out of request bodies, letting Porkbun apply its defaults (for example a
/// TTL of [`MIN_TTL`][crate::MIN_TTL]).
#[derive(Debug, Clone, Serialize)]
pub struct RecordOptions {
    /// Credentials for this request only. Falls back to the client's default when `None`.
    #[serde(skip)]
    pub credentials: Option<Credentials>,

    /// Second-level domain the record lives under, e.g. `example.com`.
    #[serde(skip)]
    pub domain: String,

    /// ID of an existing record, for operations that address one by ID.
    #[serde(skip)]
    pub id: Option<String>,

    /// The subdomain, not including the domain itself. Empty means the root; `*` is a wildcard.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Answer content for the record.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Time to live in seconds. Porkbun rejects anything under [`MIN_TTL`][crate::MIN_TTL].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Priority, for the record types that support one.
    #[serde(rename = "prio", skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecordOptions {
    pub fn new(domain: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            credentials: None,
            domain: domain.into(),
            id: None,
            name: String::new(),
            record_type,
            content: String::new(),
            ttl: None,
            priority: None,
            notes: None,
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn id(mut self, id: impl Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Sets the subdomain. `@` is accepted as an alias for the root of the domain.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name == "@" { String::new() } else { name };
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Path for the `…ByNameType` endpoints: `{prefix}/{domain}/{type}`, followed by `/{name}` when a name is set.
    fn name_type_path(&self, prefix: &str) -> String {
        let mut path = format!("{prefix}/{}/{}", self.domain, self.record_type);
        if !self.name.is_empty() {
            path.push('/');
            path.push_str(&self.name);
        }
        path
    }

    /// Body for edits addressed by name and type: both already appear in the path, so neither is sent.
    fn content_body(&self) -> ContentBody<'_> {
        ContentBody {
            content: &self.content,
            ttl: self.ttl,
            priority: self.priority,
            notes: self.notes.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ContentBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(rename = "prio", skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

/// A single DNS record, as returned by Porkbun.
///
/// Every field is kept as the string Porkbun sends, including TTL and priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(with = "primitive_as_string")]
    pub id: String,
    /// Fully-qualified name, e.g. `www.example.com`.
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub content: String,
    #[serde(with = "primitive_as_string", default)]
    pub ttl: String,
    #[serde(rename = "prio", with = "primitive_as_string", default)]
    pub priority: String,
    #[serde(with = "primitive_as_string", default)]
    pub notes: String,
}

impl Record {
    /// This record's type, if it is one of the variants of [`RecordType`].
    pub fn record_type(&self) -> Option<RecordType> {
        self.typ.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(with = "number_or_string")]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    records: Vec<Record>,
}

impl Client {
    /// Creates a DNS record, returning the ID Porkbun assigned to it.
    pub async fn create_record(&self, options: &RecordOptions) -> Result<u64> {
        let path = format!("/dns/create/{}", options.domain);
        let res: CreateResponse = self.post(&path, options, options.credentials.as_ref()).await?;
        Ok(res.id)
    }

    /// Edits the record identified by [`options.id`][RecordOptions::id].
    pub async fn edit_record_by_id(&self, options: &RecordOptions) -> Result<()> {
        let Some(id) = options.id.as_deref() else {
            return Err(Error::MissingRecordId {
                domain: options.domain.clone(),
            });
        };

        let path = format!("/dns/edit/{}/{id}", options.domain);
        self.post::<_, Ack>(&path, options, options.credentials.as_ref()).await?;
        Ok(())
    }

    /// Edits every record matching the options' subdomain and type, setting their content, TTL, priority and notes.
    pub async fn edit_records_by_name_and_type(&self, options: &RecordOptions) -> Result<()> {
        let path = options.name_type_path("/dns/editByNameType");
        self.post::<_, Ack>(&path, &options.content_body(), options.credentials.as_ref()).await?;
        Ok(())
    }

    pub async fn delete_record_by_id(
        &self,
        domain: &str,
        id: impl Display,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        let path = format!("/dns/delete/{domain}/{id}");
        self.post_authenticated::<Ack>(&path, credentials).await?;
        Ok(())
    }

    /// Deletes every record matching the options' subdomain and type. With an empty name, every record of that type
    /// on the domain is deleted.
    pub async fn delete_records_by_name_and_type(&self, options: &RecordOptions) -> Result<()> {
        let path = options.name_type_path("/dns/deleteByNameType");
        self.post_authenticated::<Ack>(&path, options.credentials.as_ref()).await?;
        Ok(())
    }

    /// Gets all the existing records for the given domain name.
    pub async fn get_all_records(&self, domain: &str, credentials: Option<&Credentials>) -> Result<Vec<Record>> {
        let path = format!("/dns/retrieve/{domain}");
        let res: RetrieveResponse = self.post_authenticated(&path, credentials).await?;
        Ok(res.records)
    }

    /// Gets a single record by ID, failing with [`Error::NotFound`] if Porkbun has no such record.
    pub async fn get_record_by_id(
        &self,
        domain: &str,
        id: impl Display,
        credentials: Option<&Credentials>,
    ) -> Result<Record> {
        let path = format!("/dns/retrieve/{domain}/{id}");
        let res: RetrieveResponse = self.post_authenticated(&path, credentials).await?;
        res.records.into_iter().next().ok_or_else(|| Error::NotFound {
            domain: domain.to_string(),
            id: id.to_string(),
        })
    }

    /// Gets the records matching the options' subdomain and type (every record of that type when the name is empty).
    pub async fn get_records_by_name_and_type(&self, options: &RecordOptions) -> Result<Vec<Record>> {
        let path = options.name_type_path("/dns/retrieveByNameType");
        let res: RetrieveResponse = self.post_authenticated(&path, options.credentials.as_ref()).await?;
        Ok(res.records)
    }
}
