use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

use crate::error::{EasyCertError, Result};

/// Trait for converting to and from X.509 extensions.
///
/// # Example
/// ```
/// use easycert::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
/// let san = SubjectAltName {
///     dns_names: vec!["example.com".to_string()],
///     ip_addresses: vec!["127.0.0.1".parse().unwrap()],
/// };
/// let encoded = san.to_x509_extension_value().unwrap();
/// let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(san, decoded);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// # Fields
/// * `dns_names` - DNS names the certificate is valid for.
/// * `ip_addresses` - IP addresses the certificate is valid for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltName {
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

impl SubjectAltName {
    pub fn is_empty(&self) -> bool {
        self.dns_names.is_empty() && self.ip_addresses.is_empty()
    }
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let mut names = Vec::with_capacity(self.dns_names.len() + self.ip_addresses.len());
        for name in &self.dns_names {
            let dns = Ia5String::new(name)
                .map_err(|e| EasyCertError::CertificateBuildError(format!("DNS name {name:?}: {e}")))?;
            names.push(GeneralName::DnsName(dns));
        }
        for ip in &self.ip_addresses {
            let octets = match ip {
                IpAddr::V4(v4) => v4.octets().to_vec(),
                IpAddr::V6(v6) => v6.octets().to_vec(),
            };
            names.push(GeneralName::IpAddress(OctetString::new(octets)?));
        }

        Ok(x509_cert::ext::pkix::SubjectAltName(names).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)?;
        let mut decoded = SubjectAltName::default();
        for name in san.0.iter() {
            match name {
                GeneralName::DnsName(dns) => decoded.dns_names.push(dns.to_string()),
                GeneralName::IpAddress(octets) => {
                    let ip = match octets.as_bytes() {
                        [a, b, c, d] => IpAddr::from([*a, *b, *c, *d]),
                        bytes => <[u8; 16]>::try_from(bytes)
                            .map(IpAddr::from)
                            .map_err(|_| {
                                EasyCertError::CertificateBuildError(format!(
                                    "IP address of {} bytes",
                                    bytes.len()
                                ))
                            })?,
                    };
                    decoded.ip_addresses.push(ip);
                }
                // Other name forms (email, URI, ...) are not surfaced.
                _ => {}
            }
        }
        Ok(decoded)
    }
}

/// Represents the Basic Constraints extension.
///
/// Path length constraints are neither written nor surfaced.
#[derive(Debug, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: None,
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self { is_ca: bc.ca })
    }
}

/// Represents the Key Usage extension.
///
/// This extension defines the purpose of the key contained in the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    pub fn contains(&self, usage: KeyUsages) -> bool {
        self.0.contains(usage)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ku = X509KeyUsage(self.0);
        Ok(ku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ku = X509KeyUsage::from_der(extension)?;
        Ok(Self(ku.0))
    }
}

/// Represents the Extended Key Usage extension.
///
/// This extension indicates purposes for which the public key may be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub usage: Vec<ExtendedKeyUsageOption>,
}

impl ToAndFromX509Extension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::ExtendedKeyUsage::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let oids: Vec<ObjectIdentifier> = self.usage.iter().map(|v| (*v).into()).collect();
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage(oids);
        Ok(eku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(extension)?;
        // Purposes this crate has no name for are skipped rather than rejected.
        let usage = eku
            .0
            .iter()
            .filter_map(|oid| ExtendedKeyUsageOption::from_oid(*oid))
            .collect();
        Ok(Self { usage })
    }
}

/// Represents an option for the Extended Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtendedKeyUsageOption {
    ServerAuth,
    ClientAuth,
}

impl ExtendedKeyUsageOption {
    fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        match oid {
            const_oid::db::rfc5912::ID_KP_SERVER_AUTH => Some(ExtendedKeyUsageOption::ServerAuth),
            const_oid::db::rfc5912::ID_KP_CLIENT_AUTH => Some(ExtendedKeyUsageOption::ClientAuth),
            _ => None,
        }
    }
}

impl From<ExtendedKeyUsageOption> for ObjectIdentifier {
    fn from(value: ExtendedKeyUsageOption) -> Self {
        match value {
            ExtendedKeyUsageOption::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
        }
    }
}

/// Represents the Subject Key Identifier (SKI) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.0.as_slice())?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self(ski.0.as_bytes().to_vec()))
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// Only the key identifier form is produced; it links a leaf to the
/// subject key identifier of the CA that signed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.as_slice())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };

        Ok(aki.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: aki
                .key_identifier
                .map(|id| id.as_bytes().to_vec())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_constraints_encoding_decoding() {
        let original = BasicConstraints { is_ca: true };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = BasicConstraints::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original.is_ca, decoded.is_ca);
    }

    #[test]
    fn test_subject_alt_name_mixed_entries() {
        let original = SubjectAltName {
            dns_names: vec!["leaf.example.com".to_string(), "*.example.com".to_string()],
            ip_addresses: vec!["127.0.0.1".parse().unwrap(), "::1".parse().unwrap()],
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_subject_alt_name_rejects_non_ascii_dns() {
        let san = SubjectAltName {
            dns_names: vec!["bücher.example".to_string()],
            ip_addresses: vec![],
        };
        assert!(matches!(
            san.to_x509_extension_value(),
            Err(EasyCertError::CertificateBuildError(_))
        ));
    }

    #[test]
    fn test_key_usage_encoding_decoding() {
        let original = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment);
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = KeyUsage::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
        assert!(decoded.contains(KeyUsages::KeyEncipherment));
        assert!(!decoded.contains(KeyUsages::KeyCertSign));
    }

    #[test]
    fn test_extended_key_usage_encoding_decoding() {
        let original = ExtendedKeyUsage {
            usage: vec![
                ExtendedKeyUsageOption::ServerAuth,
                ExtendedKeyUsageOption::ClientAuth,
            ],
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = ExtendedKeyUsage::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original.usage, decoded.usage);
    }

    #[test]
    fn test_extended_key_usage_skips_unknown_purposes() {
        let encoded = x509_cert::ext::pkix::ExtendedKeyUsage(vec![
            const_oid::db::rfc5912::ID_KP_CODE_SIGNING,
            const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
        ])
        .to_der()
        .unwrap();
        let decoded = ExtendedKeyUsage::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded.usage, vec![ExtendedKeyUsageOption::ClientAuth]);
    }

    #[test]
    fn test_authority_key_identifier_encoding_decoding() {
        let original = AuthorityKeyIdentifier {
            key_identifier: vec![1, 2, 3, 4, 5],
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = AuthorityKeyIdentifier::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }
}
