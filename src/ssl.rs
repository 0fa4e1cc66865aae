use serde::{Deserialize, Serialize};

use crate::client::{Client, Credentials};
use crate::error::Result;

/// The free SSL certificate bundle Porkbun generates for a domain. All fields are PEM-encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslBundle {
    #[serde(rename = "intermediatecertificate")]
    pub intermediate_certificate: String,
    #[serde(rename = "certificatechain")]
    pub certificate_chain: String,
    #[serde(rename = "privatekey")]
    pub private_key: String,
    #[serde(rename = "publickey")]
    pub public_key: String,
}

impl std::fmt::Debug for SslBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SslBundle")
            .field("intermediate_certificate", &self.intermediate_certificate)
            .field("certificate_chain", &self.certificate_chain)
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Client {
    /// Retrieves the SSL certificate bundle for a domain.
    pub async fn get_ssl_bundle(&self, domain: &str, credentials: Option<&Credentials>) -> Result<SslBundle> {
        let path = format!("/ssl/retrieve/{domain}");
        self.post_authenticated(&path, credentials).await
    }
}
