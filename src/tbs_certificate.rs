use std::time::SystemTime;

use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use der::{DateTime, Encode};
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::error::Result;
use crate::key::PublicKey;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - Big-endian serial number of the certificate.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The not-before / not-after window.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: u64,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: x509_cert::name::Name,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial_number.to_be_bytes())?,
            signature: self.signature_algorithm.clone().into(),
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }

    /// Encodes the `TbsCertificate` into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.to_tbs_certificate_inner()?.to_der()?)
    }
}

/// RFC 5280: UTCTime through 2049, GeneralizedTime from 2050 on.
pub(crate) fn to_x509_time(at: OffsetDateTime) -> Result<x509_cert::time::Time> {
    let date_time = DateTime::from_system_time(SystemTime::from(at))?;
    if date_time.year() < 2050 {
        Ok(x509_cert::time::Time::UtcTime(UtcTime::from_date_time(
            date_time,
        )?))
    } else {
        Ok(x509_cert::time::Time::GeneralTime(
            GeneralizedTime::from_date_time(date_time),
        ))
    }
}

pub(crate) fn from_x509_time(at: &x509_cert::time::Time) -> OffsetDateTime {
    OffsetDateTime::from(at.to_system_time())
}
