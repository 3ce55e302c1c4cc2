//! # Firmgate Core
//!
//! Value types exchanged between the transport layer and the download
//! authentication step of a device management server.
//!
//! ## Key Concepts
//!
//! - **TenantSecurityToken**: per-request carrier binding tenant, controller
//!   id, transport headers and the requested artifact
//! - **FileResource**: names the artifact to download by SHA-1, filename or
//!   numeric artifact id (exactly one of them)
//! - **HeaderBag**: header storage where every key operation ignores ASCII case
//! - **Transport**: the HTTP and CoAP bindings, which deliver the same
//!   credential under different header names
//!
//! ## Wire Form
//!
//! Carriers and descriptors serialize to JSON with camelCase member names.
//! Absent values are omitted, unknown members are ignored on decode, and the
//! header bag never appears on the wire.

pub mod codec;
pub mod error;
pub mod headers;
pub mod resource;
pub mod token;

pub use error::{CoreError, Result};
pub use headers::HeaderBag;
pub use resource::{FileResource, LookupKind};
pub use token::{
    TenantSecurityToken, Transport, AUTHORIZATION_HEADER, COAP_AUTHORIZATION_HEADER,
    COAP_TOKEN_VALUE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
