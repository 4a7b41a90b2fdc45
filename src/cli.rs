use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::key::KeyAlgorithm;

/// Create a self-signed CA, issue certificates signed by it and inspect them.
#[derive(Debug, Parser)]
#[command(name = "easycert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a self-signed CA certificate and key.
    Ca,

    /// Generate a certificate and key signed by a CA.
    ///
    /// Without `--ca` a throwaway CA is generated in memory and bundled into
    /// the written chain.
    Cert {
        /// Name of an existing CA in the output directory to sign with.
        #[arg(long = "ca", value_name = "CA_NAME")]
        ca: Option<String>,
    },

    /// Print a summary of a stored certificate.
    Show,
}

/// Options shared by every command.
///
/// Every field is optional: only flags given on the command line override
/// values coming from the config file or the environment.
#[derive(Debug, Default, Clone, Serialize, Args)]
pub struct GlobalArgs {
    /// Base name of the `.key` / `.crt` files.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Directory the files are written to and read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Subject common name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true)]
    pub cn: Option<String>,

    /// Subject organizations, comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true, value_delimiter = ',')]
    pub orgs: Option<Vec<String>>,

    /// DNS subject alternative names, comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true, value_delimiter = ',')]
    pub dns: Option<Vec<String>>,

    /// IP subject alternative names, comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true, value_delimiter = ',')]
    pub ip: Option<Vec<IpAddr>>,

    /// RSA key size in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long = "b", visible_alias = "bits", global = true)]
    pub bits: Option<usize>,

    /// How long the certificate is valid, e.g. `1y`, `90d` or `720h`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true)]
    pub valid_for: Option<String>,

    /// Key algorithm of generated keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true, value_enum)]
    pub algorithm: Option<KeyAlgorithm>,

    /// YAML config file (default: `$HOME/.easycert.yaml` when present).
    #[serde(skip)]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `easycert=debug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}
