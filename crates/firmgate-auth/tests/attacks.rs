//! Attack Scenario Tests
//!
//! Request patterns that must not yield an authorization.

use std::sync::Arc;

use firmgate_auth::{
    AuthDecision, AuthKind, AuthenticationResolver, DenyReason, DownloadAuthorizer, DownloadOutcome,
    ResolverConfig,
};
use firmgate_core::codec::from_json;
use firmgate_core::{FileResource, TenantSecurityToken};
use firmgate_store::{Artifact, MemoryStore, TenantAuthConfig};

fn store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .set_tenant_config("acme", TenantAuthConfig::new().with_gateway_token("acme-gw"))
        .unwrap();
    store.set_tenant_config("globex", TenantAuthConfig::new()).unwrap();
    store.set_controller_token("acme", "dev-42", "acme-secret").unwrap();
    store.set_controller_token("globex", "dev-42", "globex-secret").unwrap();
    store
        .add_artifact(Artifact::new(1001, "acme", "deadbeef", "firmware.bin", 4096))
        .unwrap();
    store
        .add_artifact(Artifact::new(2001, "globex", "0badf00d", "globex.bin", 2048))
        .unwrap();
    store
}

fn resolver(store: Arc<MemoryStore>) -> AuthenticationResolver {
    AuthenticationResolver::from_config(&ResolverConfig::default(), store).unwrap()
}

// =============================================================================
// ATTACK: Header case evasion
// =============================================================================

/// Varying the header name case must not hide or duplicate the credential.
/// The last spelling written wins, so a second, differently cased header
/// cannot smuggle in a second credential that is checked separately.
#[tokio::test]
async fn attack_header_case_variants_collapse() {
    let token = TenantSecurityToken::new("acme", "dev-42", None).with_headers([
        ("Authorization", "TargetToken acme-secret"),
        ("AUTHORIZATION", "TargetToken guess"),
    ]);

    assert_eq!(token.headers().len(), 1);
    let decision = resolver(store()).resolve(&token).await;
    assert!(!decision.is_authorized());
}

#[tokio::test]
async fn attack_lowercase_header_still_checked() {
    let token = TenantSecurityToken::new("acme", "dev-42", None)
        .with_headers([("authorization", "targettoken guess")]);

    let decision = resolver(store()).resolve(&token).await;
    assert!(matches!(
        decision,
        AuthDecision::Denied(DenyReason::Rejected { kind: AuthKind::ControllerToken, .. })
    ));
}

// =============================================================================
// ATTACK: Header injection through the serialized carrier
// =============================================================================

#[tokio::test]
async fn attack_wire_headers_ignored() {
    let token: TenantSecurityToken = from_json(
        r#"{
            "tenant": "acme",
            "controllerId": "dev-42",
            "headers": { "Authorization": "TargetToken acme-secret" },
            "fileResource": { "artifactId": 1001 }
        }"#,
    )
    .unwrap();

    let decision = resolver(store()).resolve(&token).await;
    assert_eq!(decision, AuthDecision::Denied(DenyReason::NoCredentials));
}

// =============================================================================
// ATTACK: Cross-tenant credentials and artifacts
// =============================================================================

#[tokio::test]
async fn attack_secret_of_other_tenant_rejected() {
    // Same controller id exists in both tenants
    let token = TenantSecurityToken::new("acme", "dev-42", None)
        .with_headers([("Authorization", "TargetToken globex-secret")]);

    assert!(!resolver(store()).resolve(&token).await.is_authorized());
}

#[tokio::test]
async fn attack_gateway_token_of_other_tenant_rejected() {
    let token = TenantSecurityToken::new("globex", "dev-42", None)
        .with_headers([("Authorization", "GatewayToken acme-gw")]);

    let decision = resolver(store()).resolve(&token).await;
    assert!(matches!(
        decision,
        AuthDecision::Denied(DenyReason::Rejected { kind: AuthKind::GatewayToken, .. })
    ));
}

#[tokio::test]
async fn attack_artifact_of_other_tenant_not_found() {
    let store = store();
    let authorizer = DownloadAuthorizer::new(resolver(store.clone()), store);

    let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::artifact_id(2001)))
        .with_headers([("Authorization", "TargetToken acme-secret")]);

    assert_eq!(
        authorizer.authorize(&token).await,
        DownloadOutcome::NotFound(FileResource::artifact_id(2001))
    );
}

// =============================================================================
// ATTACK: Identity spoofing
// =============================================================================

#[tokio::test]
async fn attack_blank_controller_id_denied() {
    let token = TenantSecurityToken::new("acme", "", None)
        .with_headers([("Authorization", "GatewayToken acme-gw")]);

    assert_eq!(
        resolver(store()).resolve(&token).await,
        AuthDecision::Denied(DenyReason::MalformedToken)
    );
}

#[tokio::test]
async fn attack_null_tenant_on_wire_denied() {
    let mut token: TenantSecurityToken =
        from_json(r#"{"tenant":null,"controllerId":"dev-42"}"#).unwrap();
    token.set_headers([("Authorization", "TargetToken acme-secret")]);

    assert_eq!(
        resolver(store()).resolve(&token).await,
        AuthDecision::Denied(DenyReason::MalformedToken)
    );
}

#[tokio::test]
async fn attack_token_of_other_controller_rejected() {
    let store = store();
    store.set_controller_token("acme", "dev-43", "dev-43-secret").unwrap();

    let token = TenantSecurityToken::new("acme", "dev-42", None)
        .with_headers([("Authorization", "TargetToken dev-43-secret")]);

    assert!(!resolver(store).resolve(&token).await.is_authorized());
}

#[tokio::test]
async fn attack_certificate_headers_without_tenant_opt_in() {
    let token = TenantSecurityToken::new("acme", "dev-42", None)
        .with_headers([("X-Ssl-Client-Cn", "dev-42"), ("X-Ssl-Issuer-Hash-1", "anything")]);

    let decision = resolver(store()).resolve(&token).await;
    assert!(matches!(
        decision,
        AuthDecision::Denied(DenyReason::Rejected { kind: AuthKind::Certificate, .. })
    ));
}
