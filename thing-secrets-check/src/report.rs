//! Validation outcome

use std::fmt;

use thing_secrets::Field;

use crate::keys::KeyPairError;
use crate::pem::PemError;

/// Why a single field failed
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    #[error("is empty")]
    Empty,
    #[error("must be a bare host name, without scheme or port")]
    NotBareHost,
    #[error("`{0}` is not a DNS name or IP address")]
    InvalidHost(String),
    #[error("is {len} bytes, at most {max} allowed")]
    TooLong { len: usize, max: usize },
    #[error("is {len} bytes, at least {min} required")]
    TooShort { len: usize, min: usize },
    #[error("contains {0:?}, only letters, digits, ':', '_' and '-' are allowed")]
    InvalidCharacter(char),
    #[error("contains characters outside printable ASCII")]
    NotPrintable,
    #[error(transparent)]
    Pem(#[from] PemError),
    #[error("block on line {line} is {found}, expected {expected}")]
    UnexpectedLabel {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("holds {0} private keys, expected exactly one")]
    MultipleKeys(usize),
    #[error("private key is encrypted, the device cannot use it")]
    EncryptedKey,
    #[error("cannot be decoded: {0}")]
    Decode(std::io::Error),
    #[error("{blocks} PEM block(s) found but {decoded} decoded")]
    Undecoded { blocks: usize, decoded: usize },
    #[error("certificate {index} is not valid X.509: {source}")]
    InvalidCertificate {
        index: usize,
        #[source]
        source: rustls::Error,
    },
    #[error(transparent)]
    KeyPair(#[from] KeyPairError),
}

#[derive(Debug, serde::Serialize)]
pub struct Violation {
    #[serde(serialize_with = "serialize_field")]
    pub field: Field,
    #[serde(serialize_with = "serialize_display")]
    pub problem: Problem,
}

/// Every violation found in a bundle
#[derive(Debug, Default, serde::Serialize)]
pub struct Report {
    pub violations: Vec<Violation>,
}

impl Report {
    pub fn push(&mut self, field: Field, problem: impl Into<Problem>) {
        let problem = problem.into();
        log::debug!("{field}: {problem}");
        self.violations.push(Violation { field, problem });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Fields with at least one violation, each listed once
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self.violations.iter().map(|v| v.field).collect();
        fields.sort();
        fields.dedup();
        fields
    }

    pub fn problems(&self, field: Field) -> impl Iterator<Item = &Problem> {
        self.violations
            .iter()
            .filter(move |v| v.field == field)
            .map(|v| &v.problem)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) in credential bundle", self.len())?;
        for v in &self.violations {
            write!(f, "\n  {}: {}", v.field, v.problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for Report {}

fn serialize_field<S: serde::Serializer>(field: &Field, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(field.name())
}

fn serialize_display<S: serde::Serializer>(problem: &Problem, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(problem)
}
