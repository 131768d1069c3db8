//! Thing Secrets Check
//!
//! Host-side checks for a [`thing_secrets::DeviceCredentialBundle`] before
//! it is compiled into a firmware image.
//!
//! # Example
//!
//! ```ignore
//! use thing_secrets_check::{validate, certificate_id};
//!
//! match validate(&thing_secrets::secrets::SECRETS) {
//!     Ok(valid) => println!("certificate {}", certificate_id(valid.device_certificate())),
//!     Err(report) => eprintln!("{report}"),
//! }
//! ```

mod files;
mod fingerprint;
mod keys;
pub mod pem;
mod report;
mod summary;
mod tls;
mod validate;

pub use files::{LoadError, OwnedBundle, Sources};
pub use fingerprint::certificate_id;
pub use keys::{KeyPairError, check_pair, provider};
pub use report::{Problem, Report, Violation};
pub use summary::Summary;
pub use tls::{TlsError, client_config};
pub use validate::{Validated, validate, validate_with};
