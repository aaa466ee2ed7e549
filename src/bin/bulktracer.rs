//! Bulktracer CLI Binary
//!
//! Command-line interface for bulk probing and capture conversion.

use anyhow::Context;
use bulktracer::logging::init_logging;
use bulktracer::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut context =
        CliContext::new(cli.config.clone()).context("Error loading configuration")?;
    cli.apply_overrides(context.config_mut());
    init_logging(Some(&context.config().logging), cli.log_file.as_deref())
        .context("Error initializing logging")?;

    let output = context.execute(cli)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
