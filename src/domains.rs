//! Domain-level operations: pricing, nameservers, URL forwarding and account domain listing.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::client::{Client, Credentials};
use crate::error::{ListDomainsError, Result};
use crate::model::{Ack, number_or_string, primitive_as_string};

/// Maximum number of domains `/domain/listAll` returns per request.
const DOMAIN_PAGE_SIZE: usize = 1000;

/// Format of the dates Porkbun reports for domains, e.g. `2018-08-20 17:52:51`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default prices for one TLD. Prices are decimal strings in US dollars, e.g. `"9.68"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub registration: String,
    pub renewal: String,
    pub transfer: String,
}

#[derive(Debug, Deserialize)]
struct PricingResponse {
    pricing: BTreeMap<String, Pricing>,
}

/// New authoritative nameservers for a domain.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateNameServerOptions {
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    #[serde(skip)]
    pub domain: String,
    #[serde(rename = "ns")]
    pub nameservers: Vec<String>,
}

impl UpdateNameServerOptions {
    pub fn new<I, S>(domain: impl Into<String>, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            credentials: None,
            domain: domain.into(),
            nameservers: nameservers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

#[derive(Debug, Deserialize)]
struct NameServersResponse {
    #[serde(default)]
    ns: Vec<String>,
}

/// Porkbun's spelling of a boolean in URL forwarding requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

/// How a URL forward redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardType {
    /// HTTP 302.
    Temporary,
    /// HTTP 301.
    Permanent,
}

impl Display for ForwardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForwardType::Temporary => "temporary",
            ForwardType::Permanent => "permanent",
        })
    }
}

/// Error returned when parsing an unknown [`ForwardType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown forward type `{0}` (expected `temporary` or `permanent`)")]
pub struct ParseForwardTypeError(String);

impl FromStr for ForwardType {
    type Err = ParseForwardTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temporary" => Ok(ForwardType::Temporary),
            "permanent" => Ok(ForwardType::Permanent),
            _ => Err(ParseForwardTypeError(s.to_string())),
        }
    }
}

/// A URL forward to create.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlForwardOptions {
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    #[serde(skip)]
    pub domain: String,
    /// Subdomain to forward; empty forwards the root of the domain.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subdomain: String,
    /// Where requests are redirected to.
    pub location: String,
    #[serde(rename = "type")]
    pub forward_type: ForwardType,
    /// Whether the request's path is appended to the location.
    pub include_path: YesNo,
    /// Whether every subdomain is forwarded too.
    pub wildcard: YesNo,
}

impl UrlForwardOptions {
    /// A forward of the root of `domain` to `location`, without path or wildcard forwarding.
    pub fn new(domain: impl Into<String>, location: impl Into<String>, forward_type: ForwardType) -> Self {
        Self {
            credentials: None,
            domain: domain.into(),
            subdomain: String::new(),
            location: location.into(),
            forward_type,
            include_path: YesNo::No,
            wildcard: YesNo::No,
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    pub fn include_path(mut self, include_path: bool) -> Self {
        self.include_path = include_path.into();
        self
    }

    pub fn wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard.into();
        self
    }
}

/// An existing URL forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlForward {
    #[serde(with = "primitive_as_string")]
    pub id: String,
    #[serde(with = "primitive_as_string", default)]
    pub subdomain: String,
    pub location: String,
    #[serde(rename = "type")]
    pub forward_type: ForwardType,
    pub include_path: YesNo,
    pub wildcard: YesNo,
}

#[derive(Debug, Deserialize)]
struct UrlForwardsResponse {
    #[serde(default)]
    forwards: Vec<UrlForward>,
}

/// A domain registered on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub domain: String,
    pub status: String,
    pub tld: String,
    pub create_date: String,
    pub expire_date: String,
    /// `"1"` when the domain is locked against transfers.
    #[serde(with = "primitive_as_string", default)]
    pub security_lock: String,
    /// `"1"` when WHOIS privacy is enabled.
    #[serde(with = "primitive_as_string", default)]
    pub whois_privacy: String,
    /// Numeric flag, sent by Porkbun as either a number or a string.
    #[serde(with = "primitive_as_string", default)]
    pub auto_renew: String,
    /// Non-zero for domains registered elsewhere but managed through Porkbun.
    #[serde(with = "number_or_string", default)]
    pub not_local: u64,
}

impl Domain {
    pub fn created_at(&self) -> chrono::ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.create_date, DATE_FORMAT)
    }

    pub fn expires_at(&self) -> chrono::ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.expire_date, DATE_FORMAT)
    }

    pub fn is_security_locked(&self) -> bool {
        flag(&self.security_lock)
    }

    pub fn has_whois_privacy(&self) -> bool {
        flag(&self.whois_privacy)
    }

    pub fn auto_renews(&self) -> bool {
        flag(&self.auto_renew)
    }
}

/// Porkbun flags are `"1"`/`"0"`, occasionally `"true"`/`"false"`. Anything else counts as off.
fn flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}

#[derive(Debug, Serialize)]
struct ListAllRequest {
    start: usize,
}

#[derive(Debug, Deserialize)]
struct ListAllResponse {
    #[serde(default)]
    domains: Vec<Domain>,
}

impl Client {
    /// Gets Porkbun's default pricing for every supported TLD, keyed by TLD (without the leading dot).
    ///
    /// This endpoint is public, so no credentials are sent.
    pub async fn get_domain_pricing(&self) -> Result<BTreeMap<String, Pricing>> {
        let res: PricingResponse = self.get("/pricing/get").await?;
        Ok(res.pricing)
    }

    /// Replaces the authoritative nameservers of a domain.
    pub async fn update_name_servers(&self, options: &UpdateNameServerOptions) -> Result<()> {
        let path = format!("/domain/updateNs/{}", options.domain);
        self.post::<_, Ack>(&path, options, options.credentials.as_ref()).await?;
        Ok(())
    }

    /// Gets the authoritative nameservers listed at the registry for a domain.
    pub async fn get_name_servers(&self, domain: &str, credentials: Option<&Credentials>) -> Result<Vec<String>> {
        let path = format!("/domain/getNs/{domain}");
        let res: NameServersResponse = self.post_authenticated(&path, credentials).await?;
        Ok(res.ns)
    }

    pub async fn create_url_forward(&self, options: &UrlForwardOptions) -> Result<()> {
        let path = format!("/domain/addUrlForward/{}", options.domain);
        self.post::<_, Ack>(&path, options, options.credentials.as_ref()).await?;
        Ok(())
    }

    pub async fn get_url_forwards(&self, domain: &str, credentials: Option<&Credentials>) -> Result<Vec<UrlForward>> {
        let path = format!("/domain/getUrlForwarding/{domain}");
        let res: UrlForwardsResponse = self.post_authenticated(&path, credentials).await?;
        Ok(res.forwards)
    }

    pub async fn delete_url_forward(
        &self,
        domain: &str,
        forward_id: &str,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        let path = format!("/domain/deleteUrlForward/{domain}/{forward_id}");
        self.post_authenticated::<Ack>(&path, credentials).await?;
        Ok(())
    }

    /// Gets every domain on the account.
    ///
    /// Porkbun returns at most 1000 domains per request, so pages are requested at offsets 0, 1000, 2000, … until one
    /// comes back empty. If a page fails, the error carries the domains collected up to that point.
    pub async fn get_all_domains(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<Domain>, ListDomainsError> {
        let mut domains = Vec::new();
        let mut start = 0;

        loop {
            let page: Result<ListAllResponse> =
                self.post("/domain/listAll", &ListAllRequest { start }, credentials).await;

            let page = match page {
                Ok(page) => page.domains,
                Err(source) => {
                    log::debug!("domain listing failed at offset {start} after {} domains", domains.len());
                    return Err(ListDomainsError {
                        domains,
                        offset: start,
                        source,
                    });
                },
            };

            log::debug!("retrieved {} domains at offset {start}", page.len());
            if page.is_empty() {
                return Ok(domains);
            }

            domains.extend(page);
            start += DOMAIN_PAGE_SIZE;
        }
    }
}
