use data_encoding::HEXLOWER;
use rustls::pki_types::CertificateDer;
use sha2::{Digest, Sha256};

/// AWS IoT certificate id: lowercase hex SHA-256 of the DER certificate
pub fn certificate_id(cert: &CertificateDer<'_>) -> String {
    HEXLOWER.encode(&Sha256::digest(cert.as_ref()))
}

#[cfg(test)]
mod tests {
    use rustls::pki_types::CertificateDer;

    #[test]
    fn sha256_hex() {
        let cert = CertificateDer::from(b"abc".to_vec());
        assert_eq!(
            super::certificate_id(&cert),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
