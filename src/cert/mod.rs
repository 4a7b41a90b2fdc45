pub mod extensions;
pub mod params;

use std::net::IpAddr;

use der::{Decode, Encode};
use extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage, SubjectAltName,
    ToAndFromX509Extension,
};
use params::{DistinguishedName, ExtensionParam};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::serial_number::SerialNumber;

use crate::error::{EasyCertError, Result};
use crate::key::PublicKey;
use crate::pem_utils;
use crate::tbs_certificate::from_x509_time;

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS #1 v1.5).
    Sha256WithRSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            // RFC 4055 requires an explicit NULL parameter for RSA signatures.
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::Any::from(der::AnyRef::NULL)),
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// Wraps the parsed structure and exposes the fields this tool reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| EasyCertError::CertificateBuildError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.to_der()?)
    }

    /// Encodes the certificate as a single `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(
            &self.to_der()?,
            pem_utils::CERTIFICATE_TAG,
        ))
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.tbs_certificate.serial_number
    }

    pub fn not_before(&self) -> OffsetDateTime {
        from_x509_time(&self.inner.tbs_certificate.validity.not_before)
    }

    pub fn not_after(&self) -> OffsetDateTime {
        from_x509_time(&self.inner.tbs_certificate.validity.not_after)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// The raw extensions of the certificate.
    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect()
    }

    /// Finds and decodes the extension of type `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| ext.to_extension::<E>())
            .transpose()
    }

    pub fn subject_alt_names(&self) -> SubjectAltName {
        self.extension::<SubjectAltName>()
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn dns_names(&self) -> Vec<String> {
        self.subject_alt_names().dns_names
    }

    pub fn ip_addresses(&self) -> Vec<IpAddr> {
        self.subject_alt_names().ip_addresses
    }

    /// Whether basic constraints mark this certificate as a CA.
    pub fn is_ca(&self) -> bool {
        self.extension::<BasicConstraints>()
            .ok()
            .flatten()
            .is_some_and(|bc| bc.is_ca)
    }

    pub fn key_usage(&self) -> Option<KeyUsage> {
        self.extension::<KeyUsage>().ok().flatten()
    }

    pub fn extended_key_usage(&self) -> Vec<ExtendedKeyUsageOption> {
        self.extension::<ExtendedKeyUsage>()
            .ok()
            .flatten()
            .map(|eku| eku.usage)
            .unwrap_or_default()
    }

    /// Checks that this certificate was signed by the key of `issuer`.
    pub fn verify_signed_by(&self, issuer: &Certificate) -> Result<()> {
        if self.inner.signature_algorithm.oid != const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION
        {
            return Err(EasyCertError::CertificateBuildError(format!(
                "unsupported signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }

        let PublicKey::Rsa(public) = issuer.public_key()?;
        let verifying_key = VerifyingKey::<Sha256>::new(public);
        let signature = Signature::try_from(self.inner.signature.raw_bytes())?;
        let tbs = self.inner.tbs_certificate.to_der()?;
        verifying_key.verify(&tbs, &signature)?;
        Ok(())
    }
}

/// A certificate together with the private key matching its public key.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: crate::key::KeyPair,
}
