use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::SetOfVec;
use der::{Any, Tag, Tagged};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::{EasyCertError, Result};
use crate::key::KeyAlgorithm;

/// Validity used when none (or a zero span) is configured.
pub const DEFAULT_VALIDITY: Duration = Duration::days(365);

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Everything needed to issue a certificate and store it.
///
/// Built once and passed by reference into the issuing and storing calls.
///
/// ```
/// use easycert::cert::params::CertConfig;
///
/// let config = CertConfig::builder()
///     .common_name("leaf.example.com")
///     .dns_names(vec!["leaf.example.com".to_string()])
///     .build();
/// assert_eq!(config.bits, 2048);
/// assert_eq!(config.organization, vec!["easycert".to_string()]);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CertConfig {
    #[builder(into, default = "easycert".to_string())]
    pub common_name: String,
    #[builder(default = vec!["easycert".to_string()])]
    pub organization: Vec<String>,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub ip_addresses: Vec<IpAddr>,
    #[builder(default)]
    pub algorithm: KeyAlgorithm,
    #[builder(default = 2048)]
    pub bits: usize,
    /// Zero or unset means [`DEFAULT_VALIDITY`].
    pub valid_for: Option<Duration>,
    /// Base file name (without extension) used by the store.
    #[builder(into, default = "ca".to_string())]
    pub name: String,
    #[builder(into, default = PathBuf::from("."))]
    pub dir: PathBuf,
}

impl CertConfig {
    /// The validity span to apply to newly issued certificates.
    pub fn validity(&self) -> Duration {
        self.valid_for
            .filter(|span| !span.is_zero())
            .unwrap_or(DEFAULT_VALIDITY)
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName {
            common_name: self.common_name.clone(),
            organization: self.organization.clone(),
        }
    }
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// This struct represents the subject or issuer name in a certificate.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `organization` - The organizations (O), in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct DistinguishedName {
    #[builder(into)]
    pub common_name: String,
    #[builder(default)]
    pub organization: Vec<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 name.
    ///
    /// Organizations are encoded before the common name so that the RFC 4514
    /// rendering reads `CN=...,O=...`.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::Name> {
        let mut rdns = Vec::with_capacity(self.organization.len() + 1);
        for org in &self.organization {
            rdns.push(single_attribute(ORGANIZATION, org)?);
        }
        if !self.common_name.is_empty() {
            rdns.push(single_attribute(COMMON_NAME, &self.common_name)?);
        }
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509 name, keeping CN and O attributes.
    pub fn from_x509_name(x509dn: &x509_cert::name::Name) -> Self {
        let mut common_name = String::new();
        let mut organization = Vec::new();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = attribute_string(&attr.value) else {
                    continue;
                };
                if attr.oid == COMMON_NAME {
                    common_name = value;
                } else if attr.oid == ORGANIZATION {
                    organization.push(value);
                }
            }
        }

        DistinguishedName {
            common_name,
            organization,
        }
    }
}

/// Renders the name in RFC 4514 order, e.g. `CN=leaf.example.com,O=easycert`.
impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.organization.len() + 1);
        if !self.common_name.is_empty() {
            parts.push(format!("CN={}", escape_rfc4514(&self.common_name)));
        }
        for org in self.organization.iter().rev() {
            parts.push(format!("O={}", escape_rfc4514(org)));
        }
        f.write_str(&parts.join(","))
    }
}

fn single_attribute(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    let atv = AttributeTypeAndValue {
        oid,
        value: Any::new(Tag::Utf8String, value.as_bytes())?,
    };
    Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
}

fn attribute_string(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
            Some(String::from_utf8_lossy(value.value()).into_owned())
        }
        _ => None,
    }
}

fn escape_rfc4514(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let leading = i == 0 && (c == ' ' || c == '#');
        let trailing = i + 1 == value.chars().count() && c == ' ';
        if leading || trailing || matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now (whole seconds, UTC) and lasting `span`.
    pub fn starting_now(span: Duration) -> Result<Self> {
        let not_before = now_utc_seconds();
        Ok(Self {
            not_before,
            not_after: offset_by(not_before, span)?,
        })
    }
}

/// `at + span`, failing instead of overflowing the representable date range.
pub fn offset_by(at: OffsetDateTime, span: Duration) -> Result<OffsetDateTime> {
    at.checked_add(span).ok_or_else(|| {
        EasyCertError::CertificateBuildError(format!("validity of {span} from {at} is out of range"))
    })
}

/// Current UTC time truncated to whole seconds, the precision X.509 times carry.
pub fn now_utc_seconds() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        let value = extension.to_x509_extension_value()?;
        Ok(Self {
            oid: E::OID,
            critical,
            value,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        if self.oid != E::OID {
            return Err(EasyCertError::CertificateBuildError(format!(
                "extension {} is not {}",
                self.oid,
                E::OID
            )));
        }
        E::from_x509_extension_value(&self.value)
    }
}
