//! HTTPS client capability descriptor.
//!
//! Holds the TLS-related settings consumed by the transport layer: client
//! certificate material for mutual TLS and the server descriptors the agent
//! can connect to. Client construction itself lives with the transport; this
//! module only carries and normalizes the settings.

use serde::Deserialize;
use tracing::warn;

/// Client certificate material for mutual TLS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HttpsClient {
    /// Path to the client certificate.
    pub certificate: String,
    /// Path to the client private key.
    pub key: String,
}

impl HttpsClient {
    /// Validate the client certificate settings.
    ///
    /// A half-configured pair is almost certainly a mistake, but it is not
    /// fatal: the client bundle is simply not surfaced to the transport
    /// layer. This never fails the overall configuration load.
    pub fn validate(&mut self) {
        if self.certificate.is_empty() != self.key.is_empty() {
            warn!(
                certificate = %self.certificate,
                key = %self.key,
                "Both Certificate and Key must be set for mutual TLS; ignoring the one given"
            );
        }
    }

    /// Whether both certificate and key are present.
    pub fn is_complete(&self) -> bool {
        !self.certificate.is_empty() && !self.key.is_empty()
    }
}

/// One server the agent can connect to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerConfig {
    /// Base URL of the server.
    #[serde(rename = "ServerURL")]
    pub server_url: String,
}

/// Configuration consumed by the HTTP transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpsConfig {
    /// Path to the server SSL certificate.
    pub server_cert: String,
    /// Whether the client protocol is HTTPS.
    pub is_https: bool,
    /// Client certificate bundle, present only when both certificate and key
    /// are configured.
    pub client: Option<HttpsClient>,
    /// Skip server certificate verification.
    pub no_verify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete_requires_both_fields() {
        let mut client = HttpsClient::default();
        assert!(!client.is_complete());

        client.certificate = "/etc/shellgate/cert.pem".to_string();
        assert!(!client.is_complete());

        client.key = "/etc/shellgate/key.pem".to_string();
        assert!(client.is_complete());
    }

    #[test]
    fn test_validate_never_clears_fields() {
        let mut client = HttpsClient {
            certificate: "/etc/shellgate/cert.pem".to_string(),
            key: String::new(),
        };
        client.validate();
        assert_eq!(client.certificate, "/etc/shellgate/cert.pem");
        assert!(client.key.is_empty());
    }
}
