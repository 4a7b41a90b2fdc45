/// PEM label of an X.509 certificate block.
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Contents of the first block labelled `label` in `data`, if any.
///
/// Blocks with other labels, and any later blocks with the same label, are skipped.
pub fn first_block(data: &[u8], label: &str) -> Result<Option<Vec<u8>>, pem::PemError> {
    let blocks = pem::parse_many(data)?;
    Ok(blocks
        .into_iter()
        .find(|block| block.tag() == label)
        .map(|block| block.into_contents()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_block_skips_other_labels() {
        let chain = format!(
            "{}{}{}",
            der_to_pem(b"key", "RSA PRIVATE KEY"),
            der_to_pem(b"leaf", CERTIFICATE_TAG),
            der_to_pem(b"root", CERTIFICATE_TAG),
        );

        let first = first_block(chain.as_bytes(), CERTIFICATE_TAG).unwrap();
        assert_eq!(first.as_deref(), Some(&b"leaf"[..]));
        assert_eq!(first_block(chain.as_bytes(), "PUBLIC KEY").unwrap(), None);
    }

    #[test]
    fn test_der_to_pem_uses_lf() {
        let encoded = der_to_pem(&[0u8; 100], CERTIFICATE_TAG);
        assert!(encoded.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(!encoded.contains('\r'));
    }
}
