//! The result of checking a bundle, as printed by the CLI

use std::io::{self, Write};

use thing_secrets::DeviceCredentialBundle;

use crate::report::Report;

#[derive(Debug, serde::Serialize)]
pub struct Summary<'a> {
    pub valid: bool,
    pub thing_name: &'a str,
    pub iot_endpoint_host: &'a str,
    pub certificate_id: Option<String>,
    pub root_ca_count: usize,
    pub placeholders: Vec<&'static str>,
    #[serde(flatten)]
    pub report: Report,
}

impl<'a> Summary<'a> {
    pub fn of(bundle: &DeviceCredentialBundle<'a>) -> Self {
        let placeholders = bundle.placeholders().map(|f| f.name()).collect();
        let (certificate_id, root_ca_count, report) = match crate::validate(bundle) {
            Ok(valid) => (
                Some(crate::certificate_id(valid.device_certificate())),
                valid.root_certs.len(),
                Report::default(),
            ),
            Err(report) => (None, 0, report),
        };

        Self {
            valid: report.is_empty(),
            thing_name: bundle.thing_name(),
            iot_endpoint_host: bundle.iot_endpoint_host(),
            certificate_id,
            root_ca_count,
            placeholders,
            report,
        }
    }

    /// Human readable text, or pretty JSON. Never includes key material.
    pub fn write(&self, json: bool, out: &mut impl Write) -> io::Result<()> {
        if json {
            serde_json::to_writer_pretty(&mut *out, self)?;
            return writeln!(out);
        }

        match &self.certificate_id {
            Some(id) if self.valid => {
                writeln!(out, "Bundle for {} is valid", self.thing_name)?;
                writeln!(out, "  endpoint:       {}", self.iot_endpoint_host)?;
                writeln!(out, "  certificate id: {id}")?;
                writeln!(out, "  root CAs:       {}", self.root_ca_count)
            }
            _ => {
                if !self.placeholders.is_empty() {
                    writeln!(out, "Template placeholders remain in: {}", self.placeholders.join(", "))?;
                }
                writeln!(out, "{}", self.report)
            }
        }
    }
}
