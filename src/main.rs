use std::process::ExitCode;

use clap::Parser;
use easycert::cli::{Cli, Command};
use easycert::{commands, config};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Loads configuration from defaults, YAML, environment and command-line flags
    let settings = config::load(&cli.global)?;

    // Logs go to stderr so `show` output stays clean
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &settings.config_file {
        tracing::debug!(path = %path.display(), "read config file");
    }

    let cert_config = settings.to_cert_config()?;

    match cli.command {
        Command::Ca => commands::create_ca(&cert_config),
        Command::Cert { ca } => commands::create_cert(&cert_config, ca.as_deref()),
        Command::Show => commands::show(&cert_config, &mut std::io::stdout().lock()),
    }
}
