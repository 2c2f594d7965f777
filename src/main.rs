use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

// Use modules from the library
use sysdash::commands;
use sysdash::core::config::Config;
use sysdash::ui;

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config = load_config(&matches)?;

    if let Err(e) = sysdash::init_logging(&config.log_file) {
        ui::warn(&format!(
            "Could not open log file {}: {}",
            config.log_file.display(),
            e
        ));
    }
    if let Some(source) = &config.source {
        log::info!("Loaded configuration from {}", source.display());
    }

    match matches.subcommand() {
        Some(("snapshot", sub_matches)) => commands::snapshot(&config, sub_matches),
        _ => commands::monitor(&config),
    }
}

fn cli() -> Command {
    Command::new("sysdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard for system metrics, service health and error logs")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to ./sysdash.toml, then the user config dir)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("refresh-rate")
                .short('r')
                .long("refresh-rate")
                .value_name("SECONDS")
                .help("Seconds between refreshes")
                .value_parser(clap::value_parser!(f64))
                .global(true),
        )
        .arg(
            Arg::new("log-limit")
                .short('n')
                .long("log-limit")
                .value_name("COUNT")
                .help("Error records shown per log panel")
                .value_parser(clap::value_parser!(usize))
                .global(true),
        )
        .subcommand(Command::new("monitor").about("Run the live dashboard (default)"))
        .subcommand(
            Command::new("snapshot")
                .about("Collect one report and print it as JSON")
                .arg(
                    Arg::new("pretty")
                        .short('p')
                        .long("pretty")
                        .help("Pretty-print the JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let path = matches.get_one::<PathBuf>("config");
    let config = Config::load(path.map(PathBuf::as_path)).context("Failed to load configuration")?;

    config
        .with_overrides(
            matches.get_one::<f64>("refresh-rate").copied(),
            matches.get_one::<usize>("log-limit").copied(),
        )
        .context("Invalid command line option")
}
