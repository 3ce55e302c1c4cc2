//! Core types for the authentication resolver

use serde::{Deserialize, Serialize};
use std::fmt;

use firmgate_core::{FileResource, TenantSecurityToken, Transport};

/// Authentication methods a resolver can try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthKind {
    /// Per-controller security token
    ControllerToken,
    /// Tenant-wide gateway token
    GatewayToken,
    /// Client certificate verified by a reverse proxy
    Certificate,
    /// Credential-free artifact download
    Anonymous,
}

impl AuthKind {
    /// Default priority order of the resolver
    pub const DEFAULT_ORDER: [AuthKind; 4] = [
        AuthKind::ControllerToken,
        AuthKind::GatewayToken,
        AuthKind::Certificate,
        AuthKind::Anonymous,
    ];
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKind::ControllerToken => write!(f, "controller-token"),
            AuthKind::GatewayToken => write!(f, "gateway-token"),
            AuthKind::Certificate => write!(f, "certificate"),
            AuthKind::Anonymous => write!(f, "anonymous"),
        }
    }
}

impl std::str::FromStr for AuthKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "controller-token" | "controller_token" | "target-token" => Ok(AuthKind::ControllerToken),
            "gateway-token" | "gateway_token" => Ok(AuthKind::GatewayToken),
            "certificate" | "cert" => Ok(AuthKind::Certificate),
            "anonymous" => Ok(AuthKind::Anonymous),
            _ => Err(format!("Unknown authentication method: {}", s)),
        }
    }
}

/// A controller request that passed authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedController {
    pub tenant: String,
    pub controller_id: String,

    /// Method that authenticated the request
    pub kind: AuthKind,

    /// Binding the credential arrived on; `None` for credential-free methods
    pub transport: Option<Transport>,

    /// The file the authorization applies to, for per-artifact policies
    pub file_resource: Option<FileResource>,
}

impl AuthenticatedController {
    /// Build from the token that was authenticated
    pub fn from_token(token: &TenantSecurityToken, kind: AuthKind, transport: Option<Transport>) -> Self {
        Self {
            tenant: token.tenant().to_string(),
            controller_id: token.controller_id().to_string(),
            kind,
            transport,
            file_resource: token.file_resource().cloned(),
        }
    }

    /// Principal identifier for audit logs
    /// Format: "{kind}:{tenant}/{controller_id}"
    pub fn principal(&self) -> String {
        format!("{}:{}/{}", self.kind, self.tenant, self.controller_id)
    }
}

/// What a single handler concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler authenticated the request
    Authenticated(AuthenticatedController),
    /// The request carries nothing this handler acts on
    NotApplicable,
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// Tenant or controller id is blank
    MalformedToken,
    /// No handler found anything to act on
    NoCredentials,
    /// The last handler that acted rejected the request
    Rejected { kind: AuthKind, reason: String },
    /// A storage lookup failed; the resolver fails closed
    StoreUnavailable(String),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MalformedToken => write!(f, "tenant or controller id missing"),
            DenyReason::NoCredentials => write!(f, "no usable credentials"),
            DenyReason::Rejected { kind, reason } => write!(f, "{} rejected: {}", kind, reason),
            DenyReason::StoreUnavailable(reason) => write!(f, "storage unavailable: {}", reason),
        }
    }
}

/// Final decision of the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Authorized(AuthenticatedController),
    Denied(DenyReason),
}

impl AuthDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthDecision::Authorized(_))
    }

    /// The authenticated controller, if authorized
    pub fn controller(&self) -> Option<&AuthenticatedController> {
        match self {
            AuthDecision::Authorized(controller) => Some(controller),
            AuthDecision::Denied(_) => None,
        }
    }
}
