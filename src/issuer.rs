use der::Encode;
use rand::Rng;
use sha1::Sha1;
use x509_cert::certificate::CertificateInner;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, FlagSet,
    KeyUsage, KeyUsages, SubjectAltName, SubjectKeyIdentifier,
};
use crate::cert::params::{CertConfig, ExtensionParam, Validity, now_utc_seconds, offset_by};
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::{EasyCertError, Result};
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Serial number of every self-signed CA.
///
/// One CA is expected per directory; re-issuing overwrites the previous one.
pub const CA_SERIAL_NUMBER: u64 = 0;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the name written into the issuer field of issued certificates.
    fn issuer_name(&self) -> Result<x509_cert::name::Name>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Key identifier of the issuer's public key (SHA-1 over the key bits).
    fn key_identifier(&self) -> Result<Vec<u8>> {
        key_identifier(&self.signing_key().public_key())
    }

    /// Signs `tbs` and assembles the final certificate.
    fn sign(&self, tbs: TbsCertificate) -> Result<Certificate> {
        let tbs_cert_inner = tbs.to_tbs_certificate_inner()?;
        let signature = self.signing_key().sign_data(&tbs_cert_inner.to_der()?)?;

        let cert_inner = CertificateInner {
            signature_algorithm: tbs_cert_inner.signature.clone(),
            tbs_certificate: tbs_cert_inner,
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// SHA-1 of the subject public key bits, as in RFC 5280 section 4.2.1.2 (1).
pub fn key_identifier(public_key: &PublicKey) -> Result<Vec<u8>> {
    let spki = public_key.to_spki()?;
    let digest = <Sha1 as sha1::Digest>::digest(spki.subject_public_key.raw_bytes());
    Ok(digest.to_vec())
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    config: &'a CertConfig,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<x509_cert::name::Name> {
        self.config.subject().as_x509_name()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Result<x509_cert::name::Name> {
        // Copied verbatim so the leaf's issuer matches the CA subject byte for byte.
        Ok(self.cert.inner.tbs_certificate.subject.clone())
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }
}

/// Builds a self-signed CA certificate for `config`, signed with `key`.
///
/// The serial number is always [`CA_SERIAL_NUMBER`]; validity starts now and
/// lasts `config.validity()`.
pub fn issue_self_signed_ca(config: &CertConfig, key: &KeyPair) -> Result<Certificate> {
    let issuer = SelfIssuer { config, key };
    let public_key = key.public_key();

    let extensions = vec![
        ExtensionParam::from_extension(
            KeyUsage(
                KeyUsages::KeyEncipherment | KeyUsages::DigitalSignature | KeyUsages::KeyCertSign,
            ),
            true,
        )?,
        ExtensionParam::from_extension(
            BasicConstraints { is_ca: true },
            true,
        )?,
        ExtensionParam::from_extension(SubjectKeyIdentifier(key_identifier(&public_key)?), false)?,
    ];

    let tbs = TbsCertificate {
        serial_number: CA_SERIAL_NUMBER,
        signature_algorithm: signature_algorithm(key),
        issuer: issuer.issuer_name()?,
        validity: Validity::starting_now(config.validity())?,
        subject: config.subject(),
        subject_public_key: public_key,
        extensions,
    };

    let cert = issuer.sign(tbs)?;
    tracing::debug!(subject = %cert.subject(), "issued self-signed CA certificate");
    Ok(cert)
}

/// Issues a leaf certificate for `config`, signed by the CA pair.
///
/// A fresh key is generated for the leaf. Its validity starts at the CA's
/// not-before rather than at issuance time, and ends `config.validity()`
/// from now.
pub fn issue_leaf(
    ca_certificate: &Certificate,
    ca_key: &KeyPair,
    config: &CertConfig,
) -> Result<(Certificate, KeyPair)> {
    if config.common_name.is_empty() {
        return Err(EasyCertError::MissingCommonName);
    }

    let key = KeyPair::generate(config.algorithm, config.bits)?;
    let serial_number = random_serial_number();

    let issuer = CertificateWithPrivateKey {
        cert: ca_certificate.clone(),
        key: ca_key.clone(),
    };

    let public_key = key.public_key();
    let mut extensions = vec![
        ExtensionParam::from_extension(
            KeyUsage(FlagSet::from(KeyUsages::KeyEncipherment) | KeyUsages::DigitalSignature),
            true,
        )?,
        ExtensionParam::from_extension(
            ExtendedKeyUsage {
                usage: vec![
                    ExtendedKeyUsageOption::ServerAuth,
                    ExtendedKeyUsageOption::ClientAuth,
                ],
            },
            false,
        )?,
        ExtensionParam::from_extension(SubjectKeyIdentifier(key_identifier(&public_key)?), false)?,
        ExtensionParam::from_extension(
            AuthorityKeyIdentifier {
                key_identifier: issuer.key_identifier()?,
            },
            false,
        )?,
    ];

    let san = SubjectAltName {
        dns_names: config.dns_names.clone(),
        ip_addresses: config.ip_addresses.clone(),
    };
    if !san.is_empty() {
        extensions.push(ExtensionParam::from_extension(san, false)?);
    }

    let validity = Validity {
        not_before: ca_certificate.not_before(),
        not_after: offset_by(now_utc_seconds(), config.validity())?,
    };

    let tbs = TbsCertificate {
        serial_number,
        signature_algorithm: signature_algorithm(ca_key),
        issuer: issuer.issuer_name()?,
        validity,
        subject: config.subject(),
        subject_public_key: public_key,
        extensions,
    };

    let cert = issuer.sign(tbs)?;
    tracing::debug!(
        subject = %cert.subject(),
        issuer = %cert.issuer(),
        serial_number,
        "issued leaf certificate"
    );
    Ok((cert, key))
}

/// Uniformly random serial number in `[0, 2^63)`.
fn random_serial_number() -> u64 {
    // ThreadRng is a CSPRNG reseeded from the operating system.
    rand::rng().random::<u64>() >> 1
}

fn signature_algorithm(key: &KeyPair) -> SignatureAlgorithm {
    match key {
        KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRSA,
    }
}
