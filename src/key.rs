use std::fmt;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{EasyCertError, Result};

/// Smallest RSA modulus accepted for new keys.
pub const MIN_RSA_BITS: usize = 1024;

/// Key algorithms a caller may ask for.
///
/// Only [`KeyAlgorithm::Rsa`] can be generated; the others are recognized so
/// that requests for them fail loudly instead of silently falling back to RSA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    #[default]
    Rsa,
    Ecdsa,
    Ed25519,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyAlgorithm::Rsa => "rsa",
            KeyAlgorithm::Ecdsa => "ecdsa",
            KeyAlgorithm::Ed25519 => "ed25519",
        };
        f.write_str(name)
    }
}

/// A private/public signing key pair.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
}

/// Public half of a [`KeyPair`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKey {
    Rsa(RsaPublicKey),
}

impl KeyPair {
    /// Generate a key pair for `algorithm`.
    pub fn generate(algorithm: KeyAlgorithm, bits: usize) -> Result<Self> {
        match algorithm {
            KeyAlgorithm::Rsa => Self::generate_rsa(bits),
            other => Err(EasyCertError::UnsupportedAlgorithm(other)),
        }
    }

    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if bits < MIN_RSA_BITS {
            return Err(EasyCertError::KeyGenerationError(format!(
                "{bits} bits is below the minimum of {MIN_RSA_BITS}"
            )));
        }
        tracing::debug!(bits, "generating RSA key");
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| EasyCertError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_rsa(private))
    }

    pub fn from_rsa(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair::Rsa {
            private: Box::new(private),
            public,
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            KeyPair::Rsa { .. } => KeyAlgorithm::Rsa,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Rsa { public, .. } => PublicKey::Rsa(public.clone()),
        }
    }

    /// Subject public key info of this key, as embedded in certificates.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        self.public_key().to_spki()
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key = RsaSigningKey::<Sha256>::new(private.as_ref().clone());
                let signature = signing_key.try_sign(data)?;
                Ok(signature.to_vec())
            }
        }
    }

    /// PEM text of the private key (PKCS#1 `RSA PRIVATE KEY`).
    pub fn to_pem(&self) -> Result<String> {
        match self {
            KeyPair::Rsa { private, .. } => private
                .to_pkcs1_pem(LineEnding::LF)
                .map(|pem| pem.as_str().to_owned())
                .map_err(|e| EasyCertError::KeyGenerationError(e.to_string())),
        }
    }

    /// Imports a PKCS#1 DER encoded RSA private key.
    pub fn import_from_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| EasyCertError::KeyDecodeError(e.to_string()))?;
        Ok(Self::from_rsa(private))
    }

    /// Imports a PKCS#8 DER encoded RSA private key.
    pub fn import_from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| EasyCertError::KeyDecodeError(e.to_string()))?;
        Ok(Self::from_rsa(private))
    }
}

impl PublicKey {
    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        match self {
            PublicKey::Rsa(public) => Ok(SubjectPublicKeyInfoOwned::from_key(public.clone())?),
        }
    }

    /// Decodes an RSA public key out of a certificate's subject public key info.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        use der::Encode;
        use rsa::pkcs8::DecodePublicKey;

        let der = spki.to_der()?;
        match RsaPublicKey::from_public_key_der(&der) {
            Ok(public) => Ok(PublicKey::Rsa(public)),
            Err(_) => Err(EasyCertError::CertificateBuildError(format!(
                "unsupported public key algorithm {}",
                spki.algorithm.oid
            ))),
        }
    }
}
