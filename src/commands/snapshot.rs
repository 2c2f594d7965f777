//! One-shot report as JSON, for scripting.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::Config;
use crate::platform;

/// Execute the snapshot command
pub fn execute(config: &Config, matches: &ArgMatches) -> Result<()> {
    let pretty = matches.get_flag("pretty");

    let mut builder =
        platform::report_builder(config).context("Failed to set up report collection")?;
    let report = builder.build(config.log_limit);

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
