//! Device key / certificate correspondence

use std::sync::Arc;

use rustls::SignatureScheme;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;

/// Schemes a device key may be used with during a TLS 1.2/1.3 handshake
const SIGNATURE_SCHEMES: &[SignatureScheme] = &[
    SignatureScheme::RSA_PKCS1_SHA256,
    SignatureScheme::RSA_PKCS1_SHA384,
    SignatureScheme::RSA_PKCS1_SHA512,
    SignatureScheme::ECDSA_NISTP256_SHA256,
    SignatureScheme::ECDSA_NISTP384_SHA384,
    SignatureScheme::ECDSA_NISTP521_SHA512,
    SignatureScheme::RSA_PSS_SHA256,
    SignatureScheme::RSA_PSS_SHA384,
    SignatureScheme::RSA_PSS_SHA512,
    SignatureScheme::ED25519,
];

#[derive(Debug, thiserror::Error)]
pub enum KeyPairError {
    #[error("private key cannot be loaded: {0}")]
    Load(rustls::Error),
    #[error("private key supports none of the TLS signature schemes")]
    NoSignatureScheme,
    #[error("signing with the private key failed: {0}")]
    Sign(rustls::Error),
    #[error("private key does not match the device certificate")]
    Mismatch,
    #[error("key pair cannot be compared: {0}")]
    Unverifiable(rustls::Error),
}

/// The crypto provider used for every check in this crate
///
/// Uses the process default when one is installed.
pub fn provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Checks that `key` belongs to the leaf of `chain` and can sign
pub fn check_pair(
    chain: &[CertificateDer<'static>],
    key: &PrivateKeyDer<'static>,
    provider: &CryptoProvider,
) -> Result<(), KeyPairError> {
    let signing_key = provider
        .key_provider
        .load_private_key(key.clone_key())
        .map_err(KeyPairError::Load)?;

    let signer = signing_key
        .choose_scheme(SIGNATURE_SCHEMES)
        .ok_or(KeyPairError::NoSignatureScheme)?;
    signer
        .sign(b"thing-secrets key pair check")
        .map_err(KeyPairError::Sign)?;
    log::debug!("device key signs with {:?}", signer.scheme());

    let certified = CertifiedKey::new(chain.to_vec(), signing_key);
    match certified.keys_match() {
        Ok(()) => Ok(()),
        Err(rustls::Error::InconsistentKeys(rustls::InconsistentKeys::KeyMismatch)) => {
            Err(KeyPairError::Mismatch)
        }
        Err(e) => Err(KeyPairError::Unverifiable(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyPairError, check_pair, provider};
    use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

    fn device() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
        let key = rcgen::KeyPair::generate().unwrap();
        let cert = rcgen::CertificateParams::new(vec!["kitchen-sensor-01".to_string()])
            .unwrap()
            .self_signed(&key)
            .unwrap();
        (
            cert.der().clone(),
            PrivatePkcs8KeyDer::from(key.serialize_der()).into(),
        )
    }

    #[test]
    fn matching_pair() {
        let (cert, key) = device();
        check_pair(&[cert], &key, &provider()).unwrap();
    }

    #[test]
    fn swapped_keys() {
        let (cert_a, _) = device();
        let (_, key_b) = device();
        assert!(matches!(
            check_pair(&[cert_a], &key_b, &provider()),
            Err(KeyPairError::Mismatch)
        ));
    }

    #[test]
    fn garbage_key() {
        let (cert, _) = device();
        let key: PrivateKeyDer<'static> = PrivatePkcs8KeyDer::from(vec![0x30, 0x03, 0x02, 0x01, 0x00]).into();
        assert!(matches!(
            check_pair(&[cert], &key, &provider()),
            Err(KeyPairError::Load(_))
        ));
    }
}
