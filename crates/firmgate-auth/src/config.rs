//! Resolver configuration
//!
//! Defaults suit a server behind a TLS-terminating reverse proxy that passes
//! client certificate details in `X-Ssl-*` headers. Every setting can be
//! overridden from the environment:
//!
//! | Variable | Setting |
//! |---|---|
//! | `FIRMGATE_AUTH_ORDER` | comma separated methods, e.g. `controller-token,anonymous` |
//! | `FIRMGATE_CONTROLLER_TOKEN_SCHEMES` | comma separated schemes |
//! | `FIRMGATE_GATEWAY_TOKEN_SCHEME` | gateway token scheme |
//! | `FIRMGATE_CLIENT_CN_HEADER` | header with the certificate common name |
//! | `FIRMGATE_ISSUER_HASH_HEADER_PREFIX` | prefix of the numbered issuer hash headers |
//! | `FIRMGATE_MAX_ISSUER_HASH_HEADERS` | how many issuer hash headers to read |

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AuthError, Result};
use crate::types::AuthKind;

/// Configuration for an [`AuthenticationResolver`](crate::AuthenticationResolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Methods to try, highest priority first
    #[serde(default = "default_order")]
    pub order: Vec<AuthKind>,

    /// Schemes accepted in front of a controller security token
    #[serde(default = "default_controller_token_schemes")]
    pub controller_token_schemes: Vec<String>,

    /// Scheme in front of a gateway token
    #[serde(default = "default_gateway_token_scheme")]
    pub gateway_token_scheme: String,

    /// Header carrying the client certificate common name
    #[serde(default = "default_client_cn_header")]
    pub client_cn_header: String,

    /// Prefix of the numbered issuer hash headers (`...-1`, `...-2`)
    #[serde(default = "default_issuer_hash_header_prefix")]
    pub issuer_hash_header_prefix: String,

    /// Upper bound on issuer hash headers read per request
    #[serde(default = "default_max_issuer_hash_headers")]
    pub max_issuer_hash_headers: usize,
}

fn default_order() -> Vec<AuthKind> {
    AuthKind::DEFAULT_ORDER.to_vec()
}

fn default_controller_token_schemes() -> Vec<String> {
    vec!["TargetToken".to_string(), "Bearer".to_string()]
}

fn default_gateway_token_scheme() -> String {
    "GatewayToken".to_string()
}

fn default_client_cn_header() -> String {
    "X-Ssl-Client-Cn".to_string()
}

fn default_issuer_hash_header_prefix() -> String {
    "X-Ssl-Issuer-Hash-".to_string()
}

fn default_max_issuer_hash_headers() -> usize {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            controller_token_schemes: default_controller_token_schemes(),
            gateway_token_scheme: default_gateway_token_scheme(),
            client_cn_header: default_client_cn_header(),
            issuer_hash_header_prefix: default_issuer_hash_header_prefix(),
            max_issuer_hash_headers: default_max_issuer_hash_headers(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ResolverConfig {
    /// Load configuration from `FIRMGATE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(order) = lookup("FIRMGATE_AUTH_ORDER") {
            config.order = split_list(&order)
                .iter()
                .map(|s| s.parse::<AuthKind>())
                .collect::<std::result::Result<_, _>>()
                .map_err(AuthError::Config)?;
        }
        if let Some(schemes) = lookup("FIRMGATE_CONTROLLER_TOKEN_SCHEMES") {
            config.controller_token_schemes = split_list(&schemes);
        }
        if let Some(scheme) = lookup("FIRMGATE_GATEWAY_TOKEN_SCHEME") {
            config.gateway_token_scheme = scheme.trim().to_string();
        }
        if let Some(header) = lookup("FIRMGATE_CLIENT_CN_HEADER") {
            config.client_cn_header = header.trim().to_string();
        }
        if let Some(prefix) = lookup("FIRMGATE_ISSUER_HASH_HEADER_PREFIX") {
            config.issuer_hash_header_prefix = prefix.trim().to_string();
        }
        if let Some(max) = lookup("FIRMGATE_MAX_ISSUER_HASH_HEADERS") {
            config.max_issuer_hash_headers = max.trim().parse().map_err(|_| {
                AuthError::Config(format!("FIRMGATE_MAX_ISSUER_HASH_HEADERS must be a number, got {}", max))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for contradictions
    pub fn validate(&self) -> Result<()> {
        if self.order.is_empty() {
            return Err(AuthError::Config("at least one authentication method is required".into()));
        }

        let mut seen = HashSet::new();
        for kind in &self.order {
            if !seen.insert(kind) {
                return Err(AuthError::Config(format!("{} listed more than once", kind)));
            }
        }

        if self.order.contains(&AuthKind::ControllerToken) && self.controller_token_schemes.is_empty() {
            return Err(AuthError::Config("controller token schemes must not be empty".into()));
        }
        if self.order.contains(&AuthKind::GatewayToken) && self.gateway_token_scheme.is_empty() {
            return Err(AuthError::Config("gateway token scheme must not be empty".into()));
        }
        if self.order.contains(&AuthKind::Certificate) && self.client_cn_header.is_empty() {
            return Err(AuthError::Config("client common name header must not be empty".into()));
        }

        Ok(())
    }
}
