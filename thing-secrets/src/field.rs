//! Field names of the credential bundle

use core::fmt;

/// One of the seven values a [`DeviceCredentialBundle`](crate::DeviceCredentialBundle) carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    IotEndpointHost,
    ThingName,
    WifiSsid,
    WifiPassphrase,
    RootCaPem,
    DeviceCertificatePem,
    DevicePrivateKeyPem,
}

impl Field {
    /// All fields, in declaration order
    pub const ALL: [Field; 7] = [
        Field::IotEndpointHost,
        Field::ThingName,
        Field::WifiSsid,
        Field::WifiPassphrase,
        Field::RootCaPem,
        Field::DeviceCertificatePem,
        Field::DevicePrivateKeyPem,
    ];

    /// Stable snake_case name, used in reports and on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Field::IotEndpointHost => "iot_endpoint_host",
            Field::ThingName => "thing_name",
            Field::WifiSsid => "wifi_ssid",
            Field::WifiPassphrase => "wifi_passphrase",
            Field::RootCaPem => "root_ca_pem",
            Field::DeviceCertificatePem => "device_certificate_pem",
            Field::DevicePrivateKeyPem => "device_private_key_pem",
        }
    }

    /// Whether the field holds PEM text
    pub const fn is_pem(self) -> bool {
        matches!(
            self,
            Field::RootCaPem | Field::DeviceCertificatePem | Field::DevicePrivateKeyPem
        )
    }

    /// Whether the field's value must never be printed or logged
    pub const fn is_secret(self) -> bool {
        matches!(self, Field::WifiPassphrase | Field::DevicePrivateKeyPem)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
