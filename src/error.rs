//! Error types shared by the library and the command line front end.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duration::DurationError;
use crate::key::KeyAlgorithm;

/// Boxed cause attached to load failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Represents errors that can occur while creating, storing or loading certificates.
///
/// Every variant keeps the originating cause so callers can report it.
#[derive(Debug, Error)]
pub enum EasyCertError {
    /// A duration string could not be parsed.
    #[error("invalid duration {input:?}: {source}")]
    InvalidDurationFormat {
        input: String,
        #[source]
        source: DurationError,
    },

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// A private key could not be decoded.
    #[error("Failed to decode key: {0}")]
    KeyDecodeError(String),

    /// The requested key algorithm is recognized but not implemented.
    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(KeyAlgorithm),

    /// Error while assembling, encoding or signing a certificate.
    #[error("Failed to build certificate: {0}")]
    CertificateBuildError(String),

    /// A leaf certificate was requested without a common name.
    #[error("must specify a CommonName")]
    MissingCommonName,

    #[error("failed to write key to {}: {source}", .path.display())]
    KeyWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write certificate to {}: {source}", .path.display())]
    CertWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load certificate from {}: {source}", .path.display())]
    CertLoadError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to load key from {}: {source}", .path.display())]
    KeyLoadError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The key file holds a private key that is not RSA.
    #[error("Unknown key format: {algorithm} key in {}", .path.display())]
    UnknownKeyFormat { path: PathBuf, algorithm: String },
}

impl EasyCertError {
    pub(crate) fn cert_load(path: &Path, source: impl Into<BoxError>) -> Self {
        EasyCertError::CertLoadError {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn key_load(path: &Path, source: impl Into<BoxError>) -> Self {
        EasyCertError::KeyLoadError {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

impl From<der::Error> for EasyCertError {
    /// Converts a `der::Error` raised while assembling a certificate.
    fn from(err: der::Error) -> Self {
        EasyCertError::CertificateBuildError(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for EasyCertError {
    fn from(err: x509_cert::spki::Error) -> Self {
        EasyCertError::CertificateBuildError(err.to_string())
    }
}

impl From<rsa::signature::Error> for EasyCertError {
    fn from(err: rsa::signature::Error) -> Self {
        EasyCertError::CertificateBuildError(err.to_string())
    }
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, EasyCertError>;
