use std::path::Path;

use easycert::cert::CertificateWithPrivateKey;
use easycert::cert::params::CertConfig;
use easycert::issuer::issue_self_signed_ca;
use easycert::key::KeyPair;

pub fn cert_config(dir: &Path, name: &str, common_name: &str) -> CertConfig {
    CertConfig::builder()
        .common_name(common_name)
        .name(name)
        .dir(dir)
        .bits(1024)
        .build()
}

pub fn generate_ca_cert() -> CertificateWithPrivateKey {
    let ca_key = KeyPair::generate_rsa(1024).unwrap();

    let ca_config = CertConfig::builder()
        .common_name("myca.local")
        .organization(vec!["My CA".to_string()])
        .build();

    CertificateWithPrivateKey {
        cert: issue_self_signed_ca(&ca_config, &ca_key).unwrap(),
        key: ca_key,
    }
}
