//! Security token carrier handed from the transport layer to authentication

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::headers::HeaderBag;
use crate::resource::FileResource;

/// Header holding the credential on the HTTP binding
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Header holding the credential on the CoAP binding
pub const COAP_AUTHORIZATION_HEADER: &str = "Coap-Authorization";

/// Token type label used when the CoAP binding embeds the credential in a
/// structured payload instead of a header
pub const COAP_TOKEN_VALUE: &str = "CoapToken";

/// Transport binding a credential was delivered over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Ordinary HTTP headers
    Http,
    /// CoAP header options
    Coap,
}

impl Transport {
    /// All bindings, in the order credentials are looked for
    pub const ALL: [Transport; 2] = [Transport::Http, Transport::Coap];

    /// Header carrying the credential on this binding
    pub fn credential_header(&self) -> &'static str {
        match self {
            Transport::Http => AUTHORIZATION_HEADER,
            Transport::Coap => COAP_AUTHORIZATION_HEADER,
        }
    }

    /// Token type label for payload-embedded credentials, if the binding has one
    pub fn token_type(&self) -> Option<&'static str> {
        match self {
            Transport::Http => None,
            Transport::Coap => Some(COAP_TOKEN_VALUE),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Http => write!(f, "http"),
            Transport::Coap => write!(f, "coap"),
        }
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "https" => Ok(Transport::Http),
            "coap" | "coaps" => Ok(Transport::Coap),
            _ => Err(format!("Unknown transport: {}", s)),
        }
    }
}

/// Security token used to authenticate a controller for a tenant
///
/// Built once per inbound request by the transport layer: tenant, controller
/// id and the requested file are fixed at construction, headers are filled in
/// afterwards with [`set_headers`](Self::set_headers). After that the carrier
/// is only read.
///
/// The carrier does not check that tenant or controller id are non-empty.
/// Resolvers treat a blank identity as an authentication failure.
///
/// Headers are never part of the wire form. They come from the live transport
/// request only, so a client cannot inject trusted header values through the
/// serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSecurityToken {
    #[serde(default, deserialize_with = "null_as_empty")]
    tenant: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    controller_id: String,

    #[serde(skip)]
    headers: HeaderBag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_resource: Option<FileResource>,
}

/// Decode an absent or `null` identity member as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl TenantSecurityToken {
    /// Create a new security token
    ///
    /// # Arguments
    /// * `tenant` - The tenant the controller belongs to
    /// * `controller_id` - The id of the controller
    /// * `file_resource` - The file to obtain, if the request is a download
    pub fn new(
        tenant: impl Into<String>,
        controller_id: impl Into<String>,
        file_resource: Option<FileResource>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            controller_id: controller_id.into(),
            headers: HeaderBag::new(),
            file_resource,
        }
    }

    /// Replace all headers with the given set
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.set_headers(headers);
        self
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    pub fn file_resource(&self) -> Option<&FileResource> {
        self.file_resource.as_ref()
    }

    pub fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    /// Replace the header bag wholesale
    ///
    /// Entries from a previous call do not survive; there is no merge.
    pub fn set_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers.into_iter().collect();
    }

    /// Get a header value, ignoring the case of `name`
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Credential header value for a specific transport binding
    pub fn credential(&self, transport: Transport) -> Option<&str> {
        self.header(transport.credential_header())
    }

    /// First credential presented on any binding, HTTP before CoAP
    pub fn presented_credential(&self) -> Option<(Transport, &str)> {
        Transport::ALL
            .into_iter()
            .find_map(|transport| self.credential(transport).map(|value| (transport, value)))
    }

    /// Whether both tenant and controller id are non-blank
    pub fn has_identity(&self) -> bool {
        !self.tenant.trim().is_empty() && !self.controller_id.trim().is_empty()
    }
}

impl fmt::Display for TenantSecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantSecurityToken [tenant={}, controllerId={}", self.tenant, self.controller_id)?;
        if let Some(resource) = &self.file_resource {
            write!(f, ", fileResource={}", resource)?;
        }
        write!(f, ", headers={}]", self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::artifact_id(1001)));

        assert_eq!(token.tenant(), "acme");
        assert_eq!(token.controller_id(), "dev-42");
        assert_eq!(token.file_resource(), Some(&FileResource::artifact_id(1001)));
        assert!(token.headers().is_empty());
        assert!(token.has_identity());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let token = TenantSecurityToken::new("acme", "dev-42", None)
            .with_headers([("Authorization", "Bearer xyz")]);

        assert_eq!(token.header("authorization"), Some("Bearer xyz"));
        assert_eq!(token.header("AUTHORIZATION"), Some("Bearer xyz"));
        assert_eq!(token.header("Authorization"), Some("Bearer xyz"));
        assert_eq!(token.header("X-Missing"), None);
    }

    #[test]
    fn test_set_headers_replaces() {
        let mut token = TenantSecurityToken::new("acme", "dev-42", None);
        token.set_headers([("Authorization", "TargetToken old"), ("X-Trace", "1")]);
        token.set_headers([("Accept", "application/octet-stream")]);

        assert_eq!(token.header("Authorization"), None);
        assert_eq!(token.header("X-Trace"), None);
        assert_eq!(token.header("accept"), Some("application/octet-stream"));
        assert_eq!(token.headers().len(), 1);
    }

    #[test]
    fn test_credential_per_transport() {
        let token = TenantSecurityToken::new("acme", "dev-42", None)
            .with_headers([("coap-authorization", "TargetToken c0ap")]);

        assert_eq!(token.credential(Transport::Http), None);
        assert_eq!(token.credential(Transport::Coap), Some("TargetToken c0ap"));
        assert_eq!(
            token.presented_credential(),
            Some((Transport::Coap, "TargetToken c0ap"))
        );
    }

    #[test]
    fn test_http_credential_preferred() {
        let token = TenantSecurityToken::new("acme", "dev-42", None).with_headers([
            ("Coap-Authorization", "TargetToken b"),
            ("Authorization", "TargetToken a"),
        ]);

        assert_eq!(
            token.presented_credential(),
            Some((Transport::Http, "TargetToken a"))
        );
    }

    #[test]
    fn test_blank_identity_is_held_not_rejected() {
        let token = TenantSecurityToken::new("", "  ", None);
        assert_eq!(token.tenant(), "");
        assert!(!token.has_identity());
    }

    #[test]
    fn test_transport_constants() {
        assert_eq!(Transport::Http.credential_header(), "Authorization");
        assert_eq!(Transport::Coap.credential_header(), "Coap-Authorization");
        assert_eq!(Transport::Coap.token_type(), Some("CoapToken"));
        assert_eq!(Transport::Http.token_type(), None);
        assert_eq!("COAP".parse::<Transport>().unwrap(), Transport::Coap);
        assert!("mqtt".parse::<Transport>().is_err());
    }

    #[test]
    fn test_display_omits_header_values() {
        let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::sha1("abc")))
            .with_headers([("Authorization", "TargetToken secret")]);
        let shown = token.to_string();

        assert!(shown.contains("tenant=acme"));
        assert!(shown.contains("fileResource=sha1=abc"));
        assert!(!shown.contains("secret"));
    }
}
