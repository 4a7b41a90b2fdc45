//! The `ca`, `cert` and `show` commands.

use std::io::Write;

use anyhow::Context;
use time::format_description::well_known::Rfc3339;

use crate::cert::params::CertConfig;
use crate::issuer::{issue_leaf, issue_self_signed_ca};
use crate::key::KeyPair;
use crate::store::CertificateStore;

/// Generates a self-signed CA and writes it to `{dir}/{name}.{key,crt}`.
pub fn create_ca(config: &CertConfig) -> anyhow::Result<()> {
    let key = KeyPair::generate(config.algorithm, config.bits)?;
    let cert = issue_self_signed_ca(config, &key)?;

    CertificateStore::new(&config.dir).write(&config.name, &[cert], &key)?;
    tracing::info!(name = %config.name, "created CA");
    Ok(())
}

/// Issues a certificate and writes it, followed by its CA, under `config.name`.
///
/// With `ca_name` the CA is loaded from `config.dir`; otherwise a CA is
/// generated from `config` and never written on its own.
pub fn create_cert(config: &CertConfig, ca_name: Option<&str>) -> anyhow::Result<()> {
    let store = CertificateStore::new(&config.dir);

    let (ca_cert, ca_key) = match ca_name {
        Some(ca_name) => store
            .load(ca_name)
            .with_context(|| format!("loading CA {ca_name:?}"))?,
        None => {
            tracing::debug!("no CA given, generating a temporary one");
            let key = KeyPair::generate(config.algorithm, config.bits)?;
            let cert = issue_self_signed_ca(config, &key)?;
            (cert, key)
        }
    };

    let (cert, key) = issue_leaf(&ca_cert, &ca_key, config)?;
    store.write(&config.name, &[cert, ca_cert], &key)?;
    tracing::info!(name = %config.name, "created certificate");
    Ok(())
}

/// Prints a summary of the certificate stored under `config.name` to `out`.
pub fn show(config: &CertConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let (cert, _) = CertificateStore::new(&config.dir).load(&config.name)?;

    let ip_addresses = cert
        .ip_addresses()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out, "Subject: {}", cert.subject())?;
    writeln!(out, "DNSNames: {}", cert.dns_names().join(", "))?;
    writeln!(out, "IPAddresses: {ip_addresses}")?;
    writeln!(out, "NotBefore: {}", cert.not_before().format(&Rfc3339)?)?;
    writeln!(out, "NotAfter: {}", cert.not_after().format(&Rfc3339)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path, name: &str, cn: &str) -> CertConfig {
        CertConfig::builder()
            .common_name(cn)
            .name(name)
            .dir(dir)
            .bits(1024)
            .build()
    }

    #[test]
    fn test_show_prints_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "test", "test");
        config.dns_names = vec!["example.com".to_string()];
        config.ip_addresses = vec!["127.0.0.1".parse().unwrap(), "::1".parse().unwrap()];
        create_cert(&config, None).unwrap();

        let mut out = Vec::new();
        show(&config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Subject: CN=test,O=easycert");
        assert_eq!(lines[1], "DNSNames: example.com");
        assert_eq!(lines[2], "IPAddresses: 127.0.0.1, ::1");
        assert!(lines[3].starts_with("NotBefore: ") && lines[3].ends_with('Z'));
        assert!(lines[4].starts_with("NotAfter: ") && lines[4].ends_with('Z'));
    }

    #[test]
    fn test_cert_without_ca_bundles_generated_ca() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "svc", "svc.local");
        create_cert(&config, None).unwrap();

        let store = CertificateStore::new(dir.path());
        let chain = std::fs::read_to_string(store.cert_path("svc")).unwrap();
        assert_eq!(chain.matches("BEGIN CERTIFICATE").count(), 2);
        assert!(!store.cert_path("ca").exists());
    }

    #[test]
    fn test_cert_with_missing_ca() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "svc", "svc.local");
        let err = create_cert(&config, Some("nope")).unwrap_err();
        assert!(format!("{err:#}").contains("loading CA \"nope\""));
        assert!(!CertificateStore::new(dir.path()).key_path("svc").exists());
    }

    #[test]
    fn test_show_missing_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "absent", "absent");
        assert!(show(&config, &mut Vec::new()).is_err());
    }
}
