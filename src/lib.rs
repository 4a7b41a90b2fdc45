//! # easycert - A Small Certificate Authority Helper
//!
//! easycert creates a self-signed certificate authority, issues RSA leaf
//! certificates signed by it, and inspects certificate/key pairs stored as PEM
//! files. It is built on the RustCrypto libraries and ships as both a library
//! and the `easycert` command line tool.
//!
//! ## Files
//!
//! A pair stored under the name `web` in directory `certs` consists of:
//! - `certs/web.key`: the private key, PKCS#1 `RSA PRIVATE KEY` PEM (mode 0600)
//! - `certs/web.crt`: one or more `CERTIFICATE` PEM blocks, leaf first (mode 0644)
//!
//! ## Quick Start
//!
//! ### Creating a CA and Issuing a Certificate
//!
//! ```rust,no_run
//! use easycert::{
//!     cert::params::CertConfig,
//!     issuer::{issue_leaf, issue_self_signed_ca},
//!     key::KeyPair,
//!     store::CertificateStore,
//! };
//!
//! # fn main() -> Result<(), easycert::error::EasyCertError> {
//! let ca_config = CertConfig::builder()
//!     .common_name("Example CA")
//!     .organization(vec!["Example Corp".to_string()])
//!     .build();
//!
//! let ca_key = KeyPair::generate_rsa(2048)?;
//! let ca_cert = issue_self_signed_ca(&ca_config, &ca_key)?;
//!
//! let server_config = CertConfig::builder()
//!     .common_name("server.example.com")
//!     .dns_names(vec!["server.example.com".to_string()])
//!     .ip_addresses(vec!["10.0.0.10".parse().unwrap()])
//!     .build();
//! let (server_cert, server_key) = issue_leaf(&ca_cert, &ca_key, &server_config)?;
//! server_cert.verify_signed_by(&ca_cert)?;
//!
//! let store = CertificateStore::new("certs");
//! store.write("ca", &[ca_cert.clone()], &ca_key)?;
//! store.write("server", &[server_cert, ca_cert], &server_key)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Parsing Validity Durations
//!
//! ```rust
//! use easycert::duration::parse_duration;
//!
//! assert_eq!(parse_duration("10d").unwrap(), time::Duration::hours(240));
//! assert_eq!(parse_duration("1h30m").unwrap(), time::Duration::minutes(90));
//! assert!(parse_duration("soon").is_err());
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::EasyCertError`]; the [`commands`] layer
//! wraps these in `anyhow::Error` with context.
//!
//! ```rust
//! use easycert::{error::EasyCertError, key::{KeyAlgorithm, KeyPair}};
//!
//! match KeyPair::generate(KeyAlgorithm::Ed25519, 0) {
//!     Err(EasyCertError::UnsupportedAlgorithm(algorithm)) => println!("{algorithm} is not supported"),
//!     Err(e) => println!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: Key generation, PEM import/export and signing
//! - [`cert`]: Certificate parameters, extensions and inspection
//! - [`issuer`]: Self-signed CA and leaf certificate issuance
//! - [`store`]: Reading and writing pairs on disk
//! - [`duration`]: Validity duration parsing
//! - [`config`] / [`cli`]: Settings from flags, environment and YAML
//! - [`commands`]: The `ca`, `cert` and `show` commands
//! - [`error`]: Error types
//! - [`tbs_certificate`]: Low-level certificate structure manipulation

pub mod cert;
pub mod cli;
pub mod commands;
pub mod config;
pub mod duration;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod store;
pub mod tbs_certificate;
