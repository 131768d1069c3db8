//! rustls configuration built from a validated bundle
//!
//! This is the shape the firmware's TLS client is expected to take: trust
//! only the bundled root CA, present the device certificate as the client
//! identity. No connection is opened here.

use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, RootCertStore};

use crate::validate::Validated;

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("root CA contains no usable trust anchor ({ignored} certificate(s) rejected)")]
    NoTrustAnchors { ignored: usize },
    #[error(transparent)]
    Rustls(#[from] rustls::Error),
}

/// Mutual TLS client configuration for the bundle's broker
pub fn client_config(
    validated: &Validated<'_>,
    provider: Arc<CryptoProvider>,
) -> Result<ClientConfig, TlsError> {
    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(validated.root_certs.iter().cloned());
    if added == 0 {
        return Err(TlsError::NoTrustAnchors { ignored });
    }
    log::debug!("trusting {added} root certificate(s)");

    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_client_auth_cert(
            validated.device_chain.clone(),
            validated.private_key.clone_key(),
        )?;
    Ok(config)
}
