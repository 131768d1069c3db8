//! Structural checks of a populated bundle

use std::fmt;

use rustls::RootCertStore;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use thing_secrets::{DeviceCredentialBundle, Field};

use crate::keys;
use crate::pem;
use crate::report::{Problem, Report};

const SSID_MAX: usize = 32;
const PASSPHRASE_MIN: usize = 8;
const PASSPHRASE_MAX: usize = 63;
const THING_NAME_MAX: usize = 128;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const KEY_LABELS: [&str; 3] = ["PRIVATE KEY", "RSA PRIVATE KEY", "EC PRIVATE KEY"];
const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// A bundle that passed every check, with its PEM material decoded
pub struct Validated<'a> {
    pub bundle: DeviceCredentialBundle<'a>,
    pub server_name: ServerName<'static>,
    pub root_certs: Vec<CertificateDer<'static>>,
    /// Leaf first
    pub device_chain: Vec<CertificateDer<'static>>,
    pub private_key: PrivateKeyDer<'static>,
}

impl Validated<'_> {
    pub fn device_certificate(&self) -> &CertificateDer<'static> {
        // validation guarantees at least one certificate
        &self.device_chain[0]
    }
}

impl fmt::Debug for Validated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validated")
            .field("bundle", &self.bundle)
            .field("server_name", &self.server_name)
            .field("root_certs", &self.root_certs.len())
            .field("device_chain", &self.device_chain.len())
            .finish_non_exhaustive()
    }
}

/// Validates with the default crypto provider
pub fn validate<'a>(bundle: &DeviceCredentialBundle<'a>) -> Result<Validated<'a>, Report> {
    validate_with(bundle, &keys::provider())
}

/// Checks every field of `bundle` and reports all violations at once
pub fn validate_with<'a>(
    bundle: &DeviceCredentialBundle<'a>,
    provider: &CryptoProvider,
) -> Result<Validated<'a>, Report> {
    let mut report = Report::default();

    for field in bundle.placeholders() {
        log::warn!("{field} still holds the template placeholder");
    }

    let server_name = check_endpoint(bundle.iot_endpoint_host(), &mut report);
    check_thing_name(bundle.thing_name(), &mut report);
    check_ssid(bundle.wifi_ssid(), &mut report);
    check_passphrase(bundle.wifi_passphrase(), &mut report);
    let root_certs = check_certificates(Field::RootCaPem, bundle.root_ca_pem(), &mut report);
    let device_chain = check_certificates(
        Field::DeviceCertificatePem,
        bundle.device_certificate_pem(),
        &mut report,
    );
    let private_key = check_private_key(bundle.device_private_key_pem(), &mut report);

    if let (Some(chain), Some(key)) = (&device_chain, &private_key) {
        if let Err(e) = keys::check_pair(chain, key, provider) {
            report.push(Field::DevicePrivateKeyPem, e);
        }
    }

    match (server_name, root_certs, device_chain, private_key) {
        (Some(server_name), Some(root_certs), Some(device_chain), Some(private_key))
            if report.is_empty() =>
        {
            log::debug!("bundle for {} is valid", bundle.thing_name());
            Ok(Validated {
                bundle: *bundle,
                server_name,
                root_certs,
                device_chain,
                private_key,
            })
        }
        _ => Err(report),
    }
}

fn check_endpoint(host: &str, report: &mut Report) -> Option<ServerName<'static>> {
    let field = Field::IotEndpointHost;
    if host.is_empty() {
        report.push(field, Problem::Empty);
        return None;
    }
    if host.contains("://") || host.contains('/') {
        report.push(field, Problem::NotBareHost);
        return None;
    }
    match ServerName::try_from(host) {
        Ok(name) => Some(name.to_owned()),
        Err(_) => {
            let problem = match host.rsplit_once(':') {
                Some((_, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
                    Problem::NotBareHost
                }
                _ => Problem::InvalidHost(host.to_string()),
            };
            report.push(field, problem);
            None
        }
    }
}

fn check_thing_name(name: &str, report: &mut Report) {
    let field = Field::ThingName;
    if name.is_empty() {
        report.push(field, Problem::Empty);
        return;
    }
    if name.len() > THING_NAME_MAX {
        report.push(
            field,
            Problem::TooLong {
                len: name.len(),
                max: THING_NAME_MAX,
            },
        );
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-')))
    {
        report.push(field, Problem::InvalidCharacter(c));
    }
}

fn check_ssid(ssid: &str, report: &mut Report) {
    if ssid.is_empty() {
        report.push(Field::WifiSsid, Problem::Empty);
    } else if ssid.len() > SSID_MAX {
        report.push(
            Field::WifiSsid,
            Problem::TooLong {
                len: ssid.len(),
                max: SSID_MAX,
            },
        );
    }
}

fn check_passphrase(pass: &str, report: &mut Report) {
    let field = Field::WifiPassphrase;
    if pass.is_empty() {
        log::info!("no WiFi passphrase, the device will join an open network");
        return;
    }
    if pass.len() < PASSPHRASE_MIN {
        report.push(
            field,
            Problem::TooShort {
                len: pass.len(),
                min: PASSPHRASE_MIN,
            },
        );
    } else if pass.len() > PASSPHRASE_MAX {
        report.push(
            field,
            Problem::TooLong {
                len: pass.len(),
                max: PASSPHRASE_MAX,
            },
        );
    }
    if !pass.bytes().all(|b| (b' '..=b'~').contains(&b)) {
        report.push(field, Problem::NotPrintable);
    }
}

fn check_certificates(
    field: Field,
    text: &str,
    report: &mut Report,
) -> Option<Vec<CertificateDer<'static>>> {
    let blocks = match pem::parse_blocks(text) {
        Ok(blocks) => blocks,
        Err(e) => {
            report.push(field, e);
            return None;
        }
    };

    let mut ok = true;
    for block in blocks.iter().filter(|b| b.label != CERTIFICATE_LABEL) {
        report.push(
            field,
            Problem::UnexpectedLabel {
                line: block.line,
                expected: CERTIFICATE_LABEL,
                found: block.label.clone(),
            },
        );
        ok = false;
    }
    if !ok {
        return None;
    }

    let normalized = pem::normalize(text);
    let certs = match rustls_pemfile::certs(&mut normalized.as_bytes()).collect::<Result<Vec<_>, _>>() {
        Ok(certs) => certs,
        Err(e) => {
            report.push(field, Problem::Decode(e));
            return None;
        }
    };
    if certs.is_empty() || certs.len() != blocks.len() {
        report.push(
            field,
            Problem::Undecoded {
                blocks: blocks.len(),
                decoded: certs.len(),
            },
        );
        return None;
    }

    // a root store parses each certificate the way the TLS stack will
    let mut store = RootCertStore::empty();
    for (index, cert) in certs.iter().enumerate() {
        if let Err(source) = store.add(cert.clone()) {
            report.push(field, Problem::InvalidCertificate { index, source });
            ok = false;
        }
    }
    ok.then_some(certs)
}

fn check_private_key(text: &str, report: &mut Report) -> Option<PrivateKeyDer<'static>> {
    let field = Field::DevicePrivateKeyPem;
    let blocks = match pem::parse_blocks(text) {
        Ok(blocks) => blocks,
        Err(e) => {
            report.push(field, e);
            return None;
        }
    };

    if blocks.iter().any(|b| b.label == ENCRYPTED_KEY_LABEL) {
        report.push(field, Problem::EncryptedKey);
        return None;
    }
    // OpenSSL writes an EC PARAMETERS block ahead of SEC1 keys
    let keys: Vec<_> = blocks
        .iter()
        .filter(|b| KEY_LABELS.contains(&b.label.as_str()))
        .collect();
    match keys.as_slice() {
        [_] => {}
        [] => {
            let block = &blocks[0];
            report.push(
                field,
                Problem::UnexpectedLabel {
                    line: block.line,
                    expected: "PRIVATE KEY",
                    found: block.label.clone(),
                },
            );
            return None;
        }
        _ => {
            report.push(field, Problem::MultipleKeys(keys.len()));
            return None;
        }
    }

    let normalized = pem::normalize(text);
    match rustls_pemfile::private_key(&mut normalized.as_bytes()) {
        Ok(Some(key)) => Some(key),
        Ok(None) => {
            report.push(
                field,
                Problem::Undecoded {
                    blocks: 1,
                    decoded: 0,
                },
            );
            None
        }
        Err(e) => {
            report.push(field, Problem::Decode(e));
            None
        }
    }
}
