//! Assembling a bundle from files on disk

use std::fmt;
use std::path::{Path, PathBuf};

use thing_secrets::{DeviceCredentialBundle, Field};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{field} file not found: {}", path.display())]
    NotFound { field: Field, path: PathBuf },
    #[error("failed to read {field} from {}: {source}", path.display())]
    Io {
        field: Field,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where each value of a bundle comes from
#[derive(Debug, Clone)]
pub struct Sources {
    pub iot_endpoint_host: String,
    pub thing_name: String,
    pub wifi_ssid: String,
    pub wifi_passphrase: String,
    pub root_ca: PathBuf,
    pub device_certificate: PathBuf,
    pub device_private_key: PathBuf,
}

/// Bundle values owned on the host, e.g. the files downloaded when the
/// thing was registered
pub struct OwnedBundle {
    iot_endpoint_host: String,
    thing_name: String,
    wifi_ssid: String,
    wifi_passphrase: String,
    root_ca_pem: String,
    device_certificate_pem: String,
    device_private_key_pem: String,
}

impl OwnedBundle {
    pub fn load(sources: Sources) -> Result<Self, LoadError> {
        Ok(Self {
            root_ca_pem: read_pem(Field::RootCaPem, &sources.root_ca)?,
            device_certificate_pem: read_pem(
                Field::DeviceCertificatePem,
                &sources.device_certificate,
            )?,
            device_private_key_pem: read_pem(
                Field::DevicePrivateKeyPem,
                &sources.device_private_key,
            )?,
            iot_endpoint_host: sources.iot_endpoint_host,
            thing_name: sources.thing_name,
            wifi_ssid: sources.wifi_ssid,
            wifi_passphrase: sources.wifi_passphrase,
        })
    }

    pub fn as_bundle(&self) -> DeviceCredentialBundle<'_> {
        DeviceCredentialBundle::new(
            &self.iot_endpoint_host,
            &self.thing_name,
            &self.wifi_ssid,
            &self.wifi_passphrase,
            &self.root_ca_pem,
            &self.device_certificate_pem,
            &self.device_private_key_pem,
        )
    }
}

impl fmt::Debug for OwnedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_bundle(), f)
    }
}

fn read_pem(field: Field, path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            field,
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        field,
        path: path.to_path_buf(),
        source,
    })
}
