//! Authentication handlers for the different credential kinds

pub mod anonymous;
pub mod certificate;
pub mod controller_token;
pub mod gateway_token;

pub use anonymous::AnonymousDownloadHandler;
pub use certificate::CertificateHandler;
pub use controller_token::ControllerTokenHandler;
pub use gateway_token::GatewayTokenHandler;

use subtle::ConstantTimeEq;

use firmgate_core::{TenantSecurityToken, Transport};
use firmgate_store::{TenantAuthConfig, TenantStore};

use crate::error::{AuthError, Result};

/// Split a credential header value into scheme and token
///
/// Accepts `<scheme> <token>` with any run of whitespace in between.
fn split_credential(value: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = value.trim().split_once(char::is_whitespace)?;
    let token = rest.trim();
    if scheme.is_empty() || token.is_empty() {
        return None;
    }
    Some((scheme, token))
}

/// Find a credential with one of `schemes` on any transport binding
///
/// Schemes compare ignoring case. Returns `Ok(None)` when no credential
/// header is present or none uses a matching scheme. A matching scheme
/// without a token is an error only if no other binding carries a usable
/// credential.
pub(crate) fn find_credential<'a, S: AsRef<str>>(
    token: &'a TenantSecurityToken,
    schemes: &[S],
) -> Result<Option<(Transport, &'a str)>> {
    let mut malformed = None;
    for transport in Transport::ALL {
        let Some(value) = token.credential(transport) else {
            continue;
        };
        match split_credential(value) {
            Some((scheme, secret)) => {
                if schemes.iter().any(|s| s.as_ref().eq_ignore_ascii_case(scheme)) {
                    return Ok(Some((transport, secret)));
                }
            }
            None => {
                let bare = value.trim();
                if malformed.is_none() && schemes.iter().any(|s| s.as_ref().eq_ignore_ascii_case(bare)) {
                    malformed = Some(AuthError::InvalidFormat(format!("{} header has no token", transport)));
                }
            }
        }
    }
    match malformed {
        Some(err) => Err(err),
        None => Ok(None),
    }
}

/// Compare a presented secret with a stored one in constant time
pub(crate) fn secrets_match(presented: &str, stored: &str) -> bool {
    presented.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Load the settings of the token's tenant, failing for unknown tenants
pub(crate) async fn tenant_config(
    store: &dyn TenantStore,
    token: &TenantSecurityToken,
) -> Result<TenantAuthConfig> {
    store
        .tenant_auth_config(token.tenant())
        .await?
        .ok_or_else(|| AuthError::UnknownTenant(token.tenant().to_string()))
}
