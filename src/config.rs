//! Settings resolution.
//!
//! Values are merged from, lowest to highest precedence: built-in defaults,
//! a YAML file, `EASYCERT_*` environment variables and command-line flags.
//!
//! ```yaml
//! name: web
//! dir: ./certs
//! cn: web.internal
//! orgs: [Example Org]
//! dns: [web.internal, localhost]
//! ip: [127.0.0.1]
//! bits: 4096
//! valid_for: 90d
//! ```

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cert::params::CertConfig;
use crate::cli::GlobalArgs;
use crate::duration::parse_duration;
use crate::key::KeyAlgorithm;

/// File looked up in `$HOME` when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".easycert.yaml";

const ENV_PREFIX: &str = "EASYCERT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub dir: PathBuf,
    pub cn: String,
    #[serde(deserialize_with = "list_deser")]
    pub orgs: Vec<String>,
    #[serde(deserialize_with = "list_deser")]
    pub dns: Vec<String>,
    #[serde(deserialize_with = "list_deser")]
    pub ip: Vec<IpAddr>,
    pub bits: usize,
    pub valid_for: Option<String>,
    pub algorithm: KeyAlgorithm,
    pub log_level: String,
    /// The YAML file the settings were read from, if any.
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            name: "ca".to_string(),
            dir: PathBuf::from("."),
            cn: "easycert".to_string(),
            orgs: vec!["easycert".to_string()],
            dns: vec![],
            ip: vec![],
            bits: 2048,
            valid_for: None,
            algorithm: KeyAlgorithm::Rsa,
            log_level: "info".to_string(),
            config_file: None,
        }
    }
}

impl Settings {
    /// Builds the issuance parameters, parsing the validity duration.
    pub fn to_cert_config(&self) -> crate::error::Result<CertConfig> {
        let valid_for = match self.valid_for.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(parse_duration(text)?),
            _ => None,
        };

        Ok(CertConfig::builder()
            .common_name(self.cn.clone())
            .organization(self.orgs.clone())
            .dns_names(self.dns.clone())
            .ip_addresses(self.ip.clone())
            .algorithm(self.algorithm)
            .bits(self.bits)
            .maybe_valid_for(valid_for)
            .name(self.name.clone())
            .dir(self.dir.clone())
            .build())
    }
}

/// Resolves settings for a run with the given command-line flags.
///
/// An explicit `--config` file must exist; the default file in `$HOME` is
/// only read when present.
pub fn load(args: &GlobalArgs) -> Result<Settings, figment::Error> {
    let config_file = match &args.config {
        Some(path) => {
            if !path.is_file() {
                return Err(figment::Error::from(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path.clone())
        }
        None => default_config_file(),
    };

    load_from(config_file.as_deref(), args)
}

fn default_config_file() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    let path = Path::new(&home).join(DEFAULT_CONFIG_FILE);
    path.is_file().then_some(path)
}

pub(crate) fn load_from(
    config_file: Option<&Path>,
    args: &GlobalArgs,
) -> Result<Settings, figment::Error> {
    let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

    if let Some(path) = config_file {
        figment = figment.merge(Yaml::file(path));
    }

    let mut settings: Settings = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(args))
        .extract()?;
    settings.config_file = config_file.map(Path::to_path_buf);

    validate(&settings).map_err(figment::Error::from)?;

    Ok(settings)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListValue<T> {
    Items(Vec<T>),
    Joined(String),
}

/// Deserialize a list given either as a sequence or as one comma separated
/// string, the form environment variables take.
fn list_deser<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match ListValue::<T>::deserialize(deserializer)? {
        ListValue::Items(items) => Ok(items),
        ListValue::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.parse().map_err(serde::de::Error::custom))
            .collect(),
    }
}

fn validate(settings: &Settings) -> Result<(), String> {
    if settings.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(())
}
